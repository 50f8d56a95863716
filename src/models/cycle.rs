//! Renewal cycle lengths
//!
//! Subscriptions renew every 1, 3, 6, 12, 24, 36, 48 or 60 months. No other
//! length is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ResidualError;

/// Length of one billing cycle, in months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum CycleLength {
    Monthly,
    Quarterly,
    SemiAnnual,
    #[default]
    Annual,
    Biennial,
    Triennial,
    Quadrennial,
    Quinquennial,
}

impl CycleLength {
    /// All cycle lengths, shortest first
    pub const ALL: [CycleLength; 8] = [
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnual,
        Self::Annual,
        Self::Biennial,
        Self::Triennial,
        Self::Quadrennial,
        Self::Quinquennial,
    ];

    /// Number of months in the cycle
    pub const fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::SemiAnnual => 6,
            Self::Annual => 12,
            Self::Biennial => 24,
            Self::Triennial => 36,
            Self::Quadrennial => 48,
            Self::Quinquennial => 60,
        }
    }

    /// Look up a cycle by its month count
    pub fn from_months(months: u32) -> Result<Self, ResidualError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.months() == months)
            .ok_or_else(|| {
                ResidualError::validation(format!(
                    "Invalid cycle: {} months. Valid cycles: 1, 3, 6, 12, 24, 36, 48, 60",
                    months
                ))
            })
    }

    /// Display label shown next to prices (e.g. "72.00 CNY/年")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "月",
            Self::Quarterly => "季度",
            Self::SemiAnnual => "半年",
            Self::Annual => "年",
            Self::Biennial => "两年",
            Self::Triennial => "三年",
            Self::Quadrennial => "四年",
            Self::Quinquennial => "五年",
        }
    }

    /// Next longer cycle (wraps)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Next shorter cycle (wraps)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl TryFrom<u32> for CycleLength {
    type Error = ResidualError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        Self::from_months(months)
    }
}

impl From<CycleLength> for u32 {
    fn from(cycle: CycleLength) -> Self {
        cycle.months()
    }
}

impl FromStr for CycleLength {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months: u32 = s.trim().parse().map_err(|_| {
            ResidualError::validation(format!("Invalid cycle: '{}' is not a month count", s))
        })?;
        Self::from_months(months)
    }
}

impl fmt::Display for CycleLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}m)", self.label(), self.months())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enumerated_lengths_are_valid() {
        for months in [1, 3, 6, 12, 24, 36, 48, 60] {
            assert_eq!(CycleLength::from_months(months).unwrap().months(), months);
        }
        for months in [0, 2, 7, 13, 61, 120] {
            assert!(CycleLength::from_months(months).unwrap_err().is_validation());
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(CycleLength::Monthly.label(), "月");
        assert_eq!(CycleLength::Annual.label(), "年");
        assert_eq!(CycleLength::Quinquennial.label(), "五年");
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("24".parse::<CycleLength>().unwrap(), CycleLength::Biennial);
        assert!("year".parse::<CycleLength>().is_err());
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&CycleLength::SemiAnnual).unwrap(), "6");
        let cycle: CycleLength = serde_json::from_str("36").unwrap();
        assert_eq!(cycle, CycleLength::Triennial);
        assert!(serde_json::from_str::<CycleLength>("5").is_err());
    }
}
