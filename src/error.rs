//! Custom error types for Residual
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for Residual operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResidualError {
    /// Malformed or out-of-range user input (price, rate, cycle, date)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The billing cycle collapsed to a zero-length window
    #[error("Invalid cycle window: cycle starting {cycle_start} ends on {expiry}")]
    InvalidCycleWindow {
        cycle_start: NaiveDate,
        expiry: NaiveDate,
    },

    /// The transaction date is on or after the expiry date
    #[error("Transaction date {transaction} is not before expiry date {expiry}")]
    ExpiredOrInvalidDate {
        transaction: NaiveDate,
        expiry: NaiveDate,
    },

    /// The exchange-rate request exceeded its time bound
    #[error("Exchange-rate request timed out after {secs}s")]
    NetworkTimeout { secs: u64 },

    /// Any other fetch or payload failure
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl ResidualError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this came from the exchange-rate source
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::NetworkTimeout { .. })
    }

    /// Check if this was raised by the valuation engine itself
    pub fn is_valuation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCycleWindow { .. } | Self::ExpiredOrInvalidDate { .. }
        )
    }

    /// Short text suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::InvalidCycleWindow { .. } => {
                "Billing cycle has no days; check the expiry date and cycle".to_string()
            }
            Self::ExpiredOrInvalidDate { .. } => {
                "No days remain; the transaction date must be before the expiry date".to_string()
            }
            Self::NetworkTimeout { .. } => {
                "Exchange-rate request timed out; check the network connection".to_string()
            }
            Self::Network(_) => "Failed to fetch the exchange rate; try again later".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ResidualError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ResidualError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for ResidualError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for Residual operations
pub type ResidualResult<T> = Result<T, ResidualError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResidualError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_expired_error_display() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let err = ResidualError::ExpiredOrInvalidDate {
            transaction: date,
            expiry: date,
        };
        assert_eq!(
            err.to_string(),
            "Transaction date 2025-12-31 is not before expiry date 2025-12-31"
        );
        assert!(err.is_valuation());
        assert!(!err.is_network());
    }

    #[test]
    fn test_timeout_is_distinct_from_network_error() {
        let timeout = ResidualError::NetworkTimeout { secs: 10 };
        let failure = ResidualError::Network("connection refused".into());
        assert!(timeout.is_network());
        assert!(failure.is_network());
        assert_ne!(timeout.user_message(), failure.user_message());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ResidualError = io_err.into();
        assert!(matches!(err, ResidualError::Io(_)));
    }
}
