//! Residual - remaining-value calculator for prepaid VPS subscriptions
//!
//! Given a renewal price in some currency, its exchange rate to CNY, the
//! billing cycle and the expiry date, this library works out how much of the
//! prepaid service is left on a transaction date. It also provides the toast
//! notification queue used by the terminal UI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths and persisted settings
//! - `error`: Custom error types
//! - `logging`: File-backed tracing setup
//! - `models`: Currencies, billing cycles, valuation inputs and results
//! - `services`: Valuation engine, exchange-rate client, share links
//! - `notify`: Toast notification queue
//! - `cli` / `display`: Command handlers and their text output
//! - `tui`: Interactive calculator
//!
//! # Example
//!
//! ```rust,ignore
//! use residual::models::{CycleLength, Currency, ValuationInput};
//! use residual::services::ValuationEngine;
//!
//! let input = ValuationInput::new(Currency::Usd, 10.0, 7.2, CycleLength::Annual, expiry, today)?;
//! let valuation = ValuationEngine::default().evaluate(&input)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod tui;

pub use error::{ResidualError, ResidualResult};
