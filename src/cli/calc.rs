//! Calculate CLI command
//!
//! Gathers inputs from flags and an optional share link, fetches the rate
//! when none is given, and prints the valuation.

use chrono::Local;
use clap::{Args, ValueEnum};
use tracing::{info, warn};

use super::rate::fetch_quote_blocking;
use crate::config::Settings;
use crate::display::{format_valuation_details, ValuationReport};
use crate::error::{ResidualError, ResidualResult};
use crate::models::{CycleLength, Currency, ValuationInput};
use crate::services::share_link::{self, ShareParams};
use crate::services::valuation::parse_date;
use crate::services::ValuationEngine;

/// Output format options
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON report
    Json,
    /// YAML report
    Yaml,
}

#[derive(Args, Debug, Default)]
pub struct CalcArgs {
    /// Billing currency (defaults to the configured currency)
    #[arg(short, long)]
    pub currency: Option<String>,

    /// Renewal price in the billing currency
    #[arg(short, long)]
    pub amount: Option<f64>,

    /// Billing cycle in months (1, 3, 6, 12, 24, 36, 48, 60)
    #[arg(short = 'y', long)]
    pub cycle: Option<u32>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiry: Option<String>,

    /// Transaction date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Exchange rate in CNY per unit; fetched when omitted
    #[arg(short, long)]
    pub rate: Option<f64>,

    /// Share link or query string supplying any missing fields
    #[arg(short, long)]
    pub link: Option<String>,

    /// High-value threshold (defaults to the configured value)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl CalcArgs {
    /// Fields given explicitly on the command line
    fn explicit_params(&self) -> ResidualResult<ShareParams> {
        Ok(ShareParams {
            currency: self
                .currency
                .as_deref()
                .map(str::parse::<Currency>)
                .transpose()?,
            price: self.amount,
            cycle: self.cycle.map(CycleLength::from_months).transpose()?,
            expiry_date: self.expiry.as_deref().map(parse_date).transpose()?,
            transaction_date: self.date.as_deref().map(parse_date).transpose()?,
            rate: self.rate,
        })
    }
}

/// Handle `residual calc`
pub fn handle_calc_command(args: CalcArgs, settings: &Settings) -> ResidualResult<()> {
    let input = resolve_input(&args, settings)?;
    let threshold = args.threshold.unwrap_or(settings.high_value_threshold);
    let valuation = ValuationEngine::new(threshold).evaluate(&input)?;

    info!(
        remaining_value = valuation.result.remaining_value,
        high_value = valuation.high_value,
        "calculated from command line"
    );

    match args.format {
        OutputFormat::Text => {
            print!("{}", format_valuation_details(&input, &valuation, threshold));
        }
        OutputFormat::Json => {
            let report = ValuationReport::new(&input, &valuation);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Yaml => {
            let report = ValuationReport::new(&input, &valuation);
            let yaml = serde_yaml::to_string(&report)
                .map_err(|e| ResidualError::Config(format!("Failed to render YAML: {}", e)))?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

/// Merge flags, link, and defaults into a complete input
fn resolve_input(args: &CalcArgs, settings: &Settings) -> ResidualResult<ValuationInput> {
    let mut params = args.explicit_params()?;

    if let Some(link) = &args.link {
        let decoded = share_link::decode(link);
        if !decoded.rejected.is_empty() {
            warn!(rejected = ?decoded.rejected, "share link carried invalid fields");
            eprintln!(
                "Ignoring invalid link parameters: {}",
                decoded.rejected.join(", ")
            );
        }
        params = params.or(decoded.params);
    }

    let currency = params.currency.unwrap_or(settings.default_currency);
    params.currency = Some(currency);
    params.transaction_date = params
        .transaction_date
        .or_else(|| Some(Local::now().date_naive()));

    if params.rate.is_none() {
        params.rate = Some(default_rate(currency)?);
    }

    params.to_input()
}

fn default_rate(currency: Currency) -> ResidualResult<f64> {
    if currency.is_local() {
        return Ok(1.0);
    }
    let quote = fetch_quote_blocking(currency)?;
    eprintln!(
        "Using fetched rate {} (updated {} UTC+8)",
        quote.rate_label(),
        quote.updated_label()
    );
    Ok(quote.rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args() -> CalcArgs {
        CalcArgs {
            currency: Some("usd".into()),
            amount: Some(10.0),
            cycle: Some(12),
            expiry: Some("2025-12-31".into()),
            date: Some("2025-06-30".into()),
            rate: Some(7.2),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_from_flags() {
        let input = resolve_input(&args(), &Settings::default()).unwrap();
        assert_eq!(input.currency, Currency::Usd);
        assert_eq!(input.cycle, CycleLength::Annual);
        assert_eq!(
            input.transaction_date,
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_flags_override_link() {
        let args = CalcArgs {
            amount: Some(20.0),
            link: Some("?c=EUR&p=5&y=1&d=20251231&t=20251201&r=8".into()),
            ..Default::default()
        };
        let input = resolve_input(&args, &Settings::default()).unwrap();
        assert_eq!(input.currency, Currency::Eur);
        assert_eq!(input.foreign_amount, 20.0);
        assert_eq!(input.exchange_rate, 8.0);
        assert_eq!(input.cycle, CycleLength::Monthly);
    }

    #[test]
    fn test_local_currency_needs_no_rate() {
        let args = CalcArgs {
            currency: Some("CNY".into()),
            rate: None,
            ..args()
        };
        let input = resolve_input(&args, &Settings::default()).unwrap();
        assert_eq!(input.exchange_rate, 1.0);
    }

    #[test]
    fn test_invalid_cycle_is_rejected() {
        let args = CalcArgs {
            cycle: Some(7),
            ..args()
        };
        let err = resolve_input(&args, &Settings::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_expiry_is_rejected() {
        let args = CalcArgs {
            expiry: None,
            ..args()
        };
        let err = resolve_input(&args, &Settings::default()).unwrap_err();
        assert!(err.is_validation());
    }
}
