//! Valuation inputs and results
//!
//! A `ValuationInput` describes one prepaid subscription as seen on a given
//! transaction date. A `ValuationResult` is computed fresh from it and is
//! never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CycleLength, Currency};
use crate::error::{ResidualError, ResidualResult};

/// Everything needed to price the unused part of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    /// Billing currency of `foreign_amount` (display and share links only)
    #[serde(default)]
    pub currency: Currency,

    /// Renewal price in the billing currency
    pub foreign_amount: f64,

    /// Local units per one foreign unit
    pub exchange_rate: f64,

    /// Billing cycle length
    pub cycle: CycleLength,

    /// Last day covered by the current payment
    pub expiry_date: NaiveDate,

    /// Day the remaining value is assessed on
    pub transaction_date: NaiveDate,
}

impl ValuationInput {
    /// Create a validated input
    pub fn new(
        currency: Currency,
        foreign_amount: f64,
        exchange_rate: f64,
        cycle: CycleLength,
        expiry_date: NaiveDate,
        transaction_date: NaiveDate,
    ) -> ResidualResult<Self> {
        let input = Self {
            currency,
            foreign_amount,
            exchange_rate,
            cycle,
            expiry_date,
            transaction_date,
        };
        input.validate()?;
        Ok(input)
    }

    /// Check the numeric invariants
    ///
    /// Date ordering is left to the engine, which reports it as
    /// `ExpiredOrInvalidDate`.
    pub fn validate(&self) -> ResidualResult<()> {
        if !self.foreign_amount.is_finite() || self.foreign_amount <= 0.0 {
            return Err(ResidualError::validation(format!(
                "Renewal amount must be a positive number, got {}",
                self.foreign_amount
            )));
        }

        if !self.exchange_rate.is_finite() || self.exchange_rate <= 0.0 {
            return Err(ResidualError::validation(format!(
                "Exchange rate must be a positive number, got {}",
                self.exchange_rate
            )));
        }

        Ok(())
    }
}

/// The computed remaining value of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Renewal price converted to the local currency
    pub local_amount: f64,

    /// First day of the current billing cycle
    pub cycle_start: NaiveDate,

    /// Length of the cycle window in days
    pub cycle_total_days: u32,

    /// Days from the transaction date to expiry
    pub remaining_days: u32,

    /// Pro-rated value of the remaining days, rounded to cents
    pub remaining_value: f64,
}

impl ValuationResult {
    /// Local value of one day of service (unrounded)
    pub fn daily_value(&self) -> f64 {
        self.local_amount / f64::from(self.cycle_total_days)
    }
}

/// A result together with its high-value classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub result: ValuationResult,
    pub high_value: bool,
}
