//! Service layer for Residual
//!
//! The valuation engine is pure and synchronous. The exchange-rate client is
//! the only part that talks to the network.

pub mod exchange_rate;
pub mod share_link;
pub mod valuation;

pub use exchange_rate::{FetchTicket, RateClient, RateOutcome, RateQuote, RateTracker};
pub use share_link::{DecodedLink, ShareParams};
pub use valuation::{ValuationEngine, DEFAULT_HIGH_VALUE_THRESHOLD};
