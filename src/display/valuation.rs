//! Valuation display formatting
//!
//! Formats valuation results for terminal output, plus a serializable report
//! for `--format json|yaml`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Currency, CycleLength, Valuation, ValuationInput};

/// Flat, serializable view of one calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub currency: Currency,
    pub foreign_amount: f64,
    pub exchange_rate: f64,
    pub local_currency: Currency,
    pub local_amount: f64,
    pub cycle_months: u32,
    pub cycle_start: NaiveDate,
    pub expiry_date: NaiveDate,
    pub transaction_date: NaiveDate,
    pub cycle_total_days: u32,
    pub remaining_days: u32,
    pub remaining_value: f64,
    pub high_value: bool,
}

impl ValuationReport {
    pub fn new(input: &ValuationInput, valuation: &Valuation) -> Self {
        let result = &valuation.result;
        Self {
            currency: input.currency,
            foreign_amount: input.foreign_amount,
            exchange_rate: input.exchange_rate,
            local_currency: Currency::LOCAL,
            local_amount: result.local_amount,
            cycle_months: input.cycle.months(),
            cycle_start: result.cycle_start,
            expiry_date: input.expiry_date,
            transaction_date: input.transaction_date,
            cycle_total_days: result.cycle_total_days,
            remaining_days: result.remaining_days,
            remaining_value: result.remaining_value,
            high_value: valuation.high_value,
        }
    }
}

/// Format a valuation as a detail block
pub fn format_valuation_details(
    input: &ValuationInput,
    valuation: &Valuation,
    threshold: f64,
) -> String {
    let result = &valuation.result;
    let local = Currency::LOCAL;

    let mut output = String::new();

    output.push_str(&format!(
        "Remaining value: {:.2} {}\n",
        result.remaining_value, local
    ));
    output.push_str(&format!(
        "  Price:          {} {} x {:.3} = {:.2} {}\n",
        input.foreign_amount, input.currency, input.exchange_rate, result.local_amount, local
    ));
    output.push_str(&format!("  Cycle:          {}\n", format_cycle(input.cycle)));
    output.push_str(&format!(
        "  Window:         {} to {} ({} days)\n",
        result.cycle_start, input.expiry_date, result.cycle_total_days
    ));
    output.push_str(&format!("  Transaction:    {}\n", input.transaction_date));
    output.push_str(&format!("  Remaining:      {} days\n", result.remaining_days));
    output.push_str(&format!(
        "  Daily value:    {:.4} {}\n",
        result.daily_value(),
        local
    ));

    if valuation.high_value {
        output.push_str(&format!(
            "\n*** High value! At least {:.2} {} remains ***\n",
            threshold, local
        ));
    }

    output
}

fn format_cycle(cycle: CycleLength) -> String {
    match cycle.months() {
        1 => format!("{} (1 month)", cycle.label()),
        m => format!("{} ({} months)", cycle.label(), m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ValuationEngine;

    fn sample() -> (ValuationInput, Valuation) {
        let input = ValuationInput {
            currency: Currency::Usd,
            foreign_amount: 10.0,
            exchange_rate: 7.2,
            cycle: CycleLength::Annual,
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        };
        let valuation = ValuationEngine::default().evaluate(&input).unwrap();
        (input, valuation)
    }

    #[test]
    fn test_details_contain_key_figures() {
        let (input, valuation) = sample();
        let text = format_valuation_details(&input, &valuation, 1000.0);
        assert!(text.starts_with("Remaining value: 36.30 CNY"));
        assert!(text.contains("10 USD x 7.200 = 72.00 CNY"));
        assert!(text.contains("(365 days)"));
        assert!(text.contains("184 days"));
        assert!(!text.contains("High value"));
    }

    #[test]
    fn test_high_value_marker() {
        let (input, mut valuation) = sample();
        valuation.high_value = true;
        let text = format_valuation_details(&input, &valuation, 30.0);
        assert!(text.contains("High value! At least 30.00 CNY"));
    }

    #[test]
    fn test_report_serializes() {
        let (input, valuation) = sample();
        let report = ValuationReport::new(&input, &valuation);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["cycle_months"], 12);
        assert_eq!(json["remaining_days"], 184);
        assert_eq!(json["cycle_start"], "2024-12-31");
    }
}
