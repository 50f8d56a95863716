//! Billing currencies
//!
//! The set of foreign currencies a subscription can be billed in. Values are
//! always converted into the local currency, CNY.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ResidualError;

/// A supported billing currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Aud,
    Cad,
    Cny,
    Eur,
    Gbp,
    Hkd,
    Jpy,
    Krw,
    Sgd,
    Twd,
}

impl Currency {
    /// Every supported currency, in selector order
    pub const ALL: [Currency; 11] = [
        Self::Usd,
        Self::Aud,
        Self::Cad,
        Self::Cny,
        Self::Eur,
        Self::Gbp,
        Self::Hkd,
        Self::Jpy,
        Self::Krw,
        Self::Sgd,
        Self::Twd,
    ];

    /// The currency every valuation is expressed in
    pub const LOCAL: Currency = Self::Cny;

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Cny => "CNY",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Hkd => "HKD",
            Self::Jpy => "JPY",
            Self::Krw => "KRW",
            Self::Sgd => "SGD",
            Self::Twd => "TWD",
        }
    }

    /// Parse a currency code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Whether this is the local currency
    pub fn is_local(&self) -> bool {
        *self == Self::LOCAL
    }

    /// Next currency in selector order (wraps)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous currency in selector order (wraps)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            ResidualError::validation(format!(
                "Unsupported currency: '{}'. Valid currencies: {}",
                s,
                Self::ALL.map(|c| c.code()).join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Currency::parse("usd"), Some(Currency::Usd));
        assert_eq!(Currency::parse(" JPY "), Some(Currency::Jpy));
        assert_eq!(Currency::parse("XYZ"), None);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "BTC".parse::<Currency>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_selector_wraps() {
        assert_eq!(Currency::Twd.next(), Currency::Usd);
        assert_eq!(Currency::Usd.prev(), Currency::Twd);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::Hkd).unwrap();
        assert_eq!(json, "\"HKD\"");
        let back: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(back, Currency::Eur);
    }
}
