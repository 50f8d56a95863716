//! Remaining-value engine
//!
//! Derives the current billing-cycle window from an expiry date and a cycle
//! length, then pro-rates the renewal price over the days left. Everything in
//! here is a pure function of its arguments.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeZone};
use tracing::debug;

use crate::error::{ResidualError, ResidualResult};
use crate::models::{CycleLength, Valuation, ValuationInput, ValuationResult};

/// Default cut-off for flagging a result as high value (local currency units)
pub const DEFAULT_HIGH_VALUE_THRESHOLD: f64 = 1000.0;

/// Anything that can be reduced to a calendar day
///
/// Time-of-day is discarded so that day counts are never fractional.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// First day of the billing cycle that ends on `expiry_date`
///
/// Month subtraction clamps to the last day of the target month when the
/// original day does not exist there: 2025-03-31 minus one month is
/// 2025-02-28.
pub fn cycle_start_date(expiry_date: NaiveDate, cycle: CycleLength) -> NaiveDate {
    expiry_date
        .checked_sub_months(Months::new(cycle.months()))
        .unwrap_or(expiry_date)
}

/// Whole days from `earlier` to `later`, or 0 when `later` is not after `earlier`
pub fn days_between(later: impl CalendarDay, earlier: impl CalendarDay) -> u32 {
    let days = (later.calendar_day() - earlier.calendar_day()).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Round to cents, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether a remaining value reaches the high-value threshold (inclusive)
pub fn is_high_value(remaining_value: f64, threshold: f64) -> bool {
    remaining_value >= threshold
}

/// Compute the pro-rated remaining value of a subscription
pub fn compute_remaining_value(input: &ValuationInput) -> ResidualResult<ValuationResult> {
    input.validate()?;

    let cycle_start = cycle_start_date(input.expiry_date, input.cycle);
    let cycle_total_days = days_between(input.expiry_date, cycle_start);
    if cycle_total_days == 0 {
        return Err(ResidualError::InvalidCycleWindow {
            cycle_start,
            expiry: input.expiry_date,
        });
    }

    let remaining_days = days_between(input.expiry_date, input.transaction_date);
    if remaining_days == 0 {
        return Err(ResidualError::ExpiredOrInvalidDate {
            transaction: input.transaction_date,
            expiry: input.expiry_date,
        });
    }

    let local_amount = input.foreign_amount * input.exchange_rate;
    let daily_value = local_amount / f64::from(cycle_total_days);
    let remaining_value = round2(daily_value * f64::from(remaining_days));

    Ok(ValuationResult {
        local_amount,
        cycle_start,
        cycle_total_days,
        remaining_days,
        remaining_value,
    })
}

/// Parse a `YYYY-MM-DD` date as typed into the form
pub fn parse_date(s: &str) -> ResidualResult<NaiveDate> {
    let s = s.trim();
    let well_formed = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ResidualError::validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD",
            s
        )));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ResidualError::validation(format!("Invalid date: '{}' does not exist", s)))
}

/// Valuation engine carrying the high-value policy
#[derive(Debug, Clone, Copy)]
pub struct ValuationEngine {
    high_value_threshold: f64,
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_VALUE_THRESHOLD)
    }
}

impl ValuationEngine {
    /// Create an engine with the given high-value threshold
    pub fn new(high_value_threshold: f64) -> Self {
        Self {
            high_value_threshold,
        }
    }

    /// The configured threshold
    pub fn high_value_threshold(&self) -> f64 {
        self.high_value_threshold
    }

    /// Compute the remaining value and classify it
    pub fn evaluate(&self, input: &ValuationInput) -> ResidualResult<Valuation> {
        let result = compute_remaining_value(input)?;
        let high_value = is_high_value(result.remaining_value, self.high_value_threshold);

        debug!(
            currency = %input.currency,
            cycle_months = input.cycle.months(),
            total_days = result.cycle_total_days,
            remaining_days = result.remaining_days,
            remaining_value = result.remaining_value,
            high_value,
            "valuation computed"
        );

        Ok(Valuation { result, high_value })
    }
}
