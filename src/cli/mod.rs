//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod calc;
pub mod config;
pub mod link;
pub mod rate;

pub use calc::{handle_calc_command, CalcArgs, OutputFormat};
pub use config::{handle_config_command, ConfigCommands};
pub use link::{handle_link_command, LinkCommands};
pub use rate::{handle_rate_command, RateArgs};
