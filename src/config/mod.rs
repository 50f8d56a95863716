//! Configuration module for Residual
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence and version reconciliation

pub mod paths;
pub mod settings;

pub use paths::ResidualPaths;
pub use settings::{CopyFormat, ImageHostKind, ImageHostSettings, Settings, Theme};
