//! Core data models for Residual
//!
//! This module contains the data structures of the valuation domain:
//! currencies, cycle lengths, valuation inputs and results, and IDs.

pub mod currency;
pub mod cycle;
pub mod ids;
pub mod valuation;

pub use currency::Currency;
pub use cycle::CycleLength;
pub use ids::ToastId;
pub use valuation::{Valuation, ValuationInput, ValuationResult};
