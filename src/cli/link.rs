//! Share link CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_decoded_link;
use crate::error::{ResidualError, ResidualResult};
use crate::models::{CycleLength, Currency};
use crate::services::share_link::{self, ShareParams};
use crate::services::valuation::parse_date;

/// Link subcommands
#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Build a share link from the given fields
    Encode {
        #[arg(short, long)]
        currency: Option<String>,
        #[arg(short, long)]
        amount: Option<f64>,
        /// Cycle in months
        #[arg(short = 'y', long)]
        cycle: Option<u32>,
        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: Option<String>,
        /// Transaction date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        rate: Option<f64>,
        /// Base URL to prefix (defaults to the configured one)
        #[arg(long)]
        base: Option<String>,
    },
    /// Show the fields carried by a link or query string
    Decode {
        /// Full URL or query string
        link: String,
    },
}

/// Handle a link command
pub fn handle_link_command(cmd: LinkCommands, settings: &Settings) -> ResidualResult<()> {
    match cmd {
        LinkCommands::Encode {
            currency,
            amount,
            cycle,
            expiry,
            date,
            rate,
            base,
        } => {
            let params = ShareParams {
                currency: currency
                    .as_deref()
                    .map(str::parse::<Currency>)
                    .transpose()?,
                price: positive("amount", amount)?,
                cycle: cycle.map(CycleLength::from_months).transpose()?,
                expiry_date: expiry.as_deref().map(parse_date).transpose()?,
                transaction_date: date.as_deref().map(parse_date).transpose()?,
                rate: positive("rate", rate)?,
            };
            if params.is_empty() {
                return Err(ResidualError::validation(
                    "Nothing to encode; pass at least one field",
                ));
            }

            let base = base.or_else(|| settings.share_base_url.clone());
            println!("{}", share_link::encode_link(&params, base.as_deref())?);
        }

        LinkCommands::Decode { link } => {
            let decoded = share_link::decode(&link);
            println!("Share link:");
            print!("{}", format_decoded_link(&decoded));
        }
    }

    Ok(())
}

fn positive(name: &str, value: Option<f64>) -> ResidualResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(ResidualError::validation(format!(
            "{} must be a positive number, got {}",
            name, v
        ))),
        other => Ok(other),
    }
}
