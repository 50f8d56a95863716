//! Display formatting for terminal output
//!
//! Plain-text renderings of valuations, rate quotes, and share links for
//! the command-line interface.

pub mod link;
pub mod rate;
pub mod valuation;

pub use link::format_decoded_link;
pub use rate::format_rate_quote;
pub use valuation::{format_valuation_details, ValuationReport};
