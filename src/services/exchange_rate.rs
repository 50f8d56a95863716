//! Exchange-rate client
//!
//! Fetches the latest rate table and converts it to "local units per one
//! foreign unit". Requests are bounded by a timeout that is reported
//! separately from other failures. `RateTracker` makes sure only the most
//! recently started fetch can update the current quote.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ResidualError, ResidualResult};
use crate::models::Currency;

pub const RATE_ENDPOINT: &str = "https://throbbing-sun-9eb6.b7483311.workers.dev";
pub const RATE_TIMEOUT: Duration = Duration::from_secs(10);
/// Environment variable that overrides the rate endpoint
pub const ENDPOINT_ENV: &str = "RESIDUAL_RATE_ENDPOINT";
const USER_AGENT: &str = concat!("residual/", env!("CARGO_PKG_VERSION"));

/// Update times are shown in UTC+8
const DISPLAY_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Raw response body of the rate source
#[derive(Debug, Clone, Deserialize)]
pub struct RatesPayload {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// A resolved exchange rate for one currency
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    pub currency: Currency,
    /// Local units per one unit of `currency`
    pub rate: f64,
    pub updated_at: DateTime<FixedOffset>,
}

impl RateQuote {
    /// Resolve `currency` against a rate table
    pub fn from_payload(currency: Currency, payload: &RatesPayload) -> ResidualResult<Self> {
        let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS)
            .ok_or_else(|| ResidualError::Network("invalid display offset".into()))?;
        let updated_at = DateTime::<Utc>::from_timestamp_millis(payload.timestamp)
            .ok_or_else(|| malformed("timestamp out of range"))?
            .with_timezone(&offset);

        let rate = if currency.is_local() {
            1.0
        } else {
            let local = lookup(&payload.rates, Currency::LOCAL)?;
            let foreign = lookup(&payload.rates, currency)?;
            local / foreign
        };

        Ok(Self {
            currency,
            rate,
            updated_at,
        })
    }

    /// Update time as `YYYY/MM/DD HH:MM` in UTC+8
    pub fn updated_label(&self) -> String {
        self.updated_at.format("%Y/%m/%d %H:%M").to_string()
    }

    /// Rate as it is entered into the form (three decimals)
    pub fn rate_label(&self) -> String {
        format!("{:.3}", self.rate)
    }
}

fn lookup(rates: &HashMap<String, f64>, currency: Currency) -> ResidualResult<f64> {
    rates
        .get(currency.code())
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| malformed(&format!("no usable rate for {}", currency.code())))
}

fn malformed(detail: &str) -> ResidualError {
    ResidualError::Network(format!("malformed payload: {}", detail))
}

/// HTTP client for the rate source
#[derive(Debug, Clone)]
pub struct RateClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RateClient {
    pub fn new() -> ResidualResult<Self> {
        Self::with_endpoint(RATE_ENDPOINT)
    }

    /// Use `RESIDUAL_RATE_ENDPOINT` when set, else the default endpoint
    pub fn from_env() -> ResidualResult<Self> {
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self::with_endpoint(endpoint.trim()),
            _ => Self::new(),
        }
    }

    pub fn with_endpoint(endpoint: &str) -> ResidualResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ResidualError::Config(format!("Invalid rate endpoint '{}': {}", endpoint, e))
        })?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            endpoint,
            timeout: RATE_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the current rate for `currency`
    pub async fn fetch_quote(&self, currency: Currency) -> ResidualResult<RateQuote> {
        debug!(%currency, endpoint = %self.endpoint, "fetching exchange rate");

        let payload = match tokio::time::timeout(self.timeout, self.fetch_payload()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(%currency, "exchange-rate request timed out");
                return Err(ResidualError::NetworkTimeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        RateQuote::from_payload(currency, &payload)
    }

    async fn fetch_payload(&self) -> ResidualResult<RatesPayload> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Identifies one fetch; only the latest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    currency: Currency,
}

impl FetchTicket {
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    Applied(RateQuote),
    /// A newer fetch was started or the fetch was cancelled
    Stale,
    Failed(ResidualError),
}

/// Current quote plus a generation guard against out-of-order completions
#[derive(Debug, Default)]
pub struct RateTracker {
    generation: u64,
    pending: Option<FetchTicket>,
    current: Option<RateQuote>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding any in flight
    pub fn begin(&mut self, currency: Currency) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            currency,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Invalidate the fetch in flight, if any
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current(&self) -> Option<&RateQuote> {
        self.current.as_ref()
    }

    /// Apply a completed fetch; stale tickets never touch the current quote
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: ResidualResult<RateQuote>,
    ) -> RateOutcome {
        if self.pending != Some(ticket) {
            debug!(currency = %ticket.currency, "discarding stale exchange-rate result");
            return RateOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(quote) => {
                self.current = Some(quote);
                RateOutcome::Applied(quote)
            }
            Err(err) => RateOutcome::Failed(err),
        }
    }
}
