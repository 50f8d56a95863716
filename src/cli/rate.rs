//! Exchange-rate CLI command

use clap::Args;
use tracing::error;

use crate::display::format_rate_quote;
use crate::error::{ResidualError, ResidualResult};
use crate::models::Currency;
use crate::services::{RateClient, RateQuote};

#[derive(Args, Debug)]
pub struct RateArgs {
    /// Currency code (USD, EUR, JPY, ...)
    pub currency: String,
}

/// Handle `residual rate`
pub fn handle_rate_command(args: RateArgs) -> ResidualResult<()> {
    let currency: Currency = args.currency.parse()?;
    let quote = fetch_quote_blocking(currency)?;
    println!("{}", format_rate_quote(&quote));
    Ok(())
}

/// Fetch a quote from synchronous code on a short-lived runtime
pub fn fetch_quote_blocking(currency: Currency) -> ResidualResult<RateQuote> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ResidualError::Io(format!("Failed to start async runtime: {}", e)))?;

    let client = RateClient::from_env()?;
    runtime
        .block_on(client.fetch_quote(currency))
        .inspect_err(|err| error!(%currency, %err, "exchange-rate fetch failed"))
}
