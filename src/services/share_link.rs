//! Shareable calculator links
//!
//! Valuation inputs travel as URL query parameters with short keys:
//!
//! | key | field              | legacy key    |
//! |-----|--------------------|---------------|
//! | `c` | currency           | `currency`    |
//! | `p` | price              | `price`       |
//! | `y` | cycle (months)     | `cycle`       |
//! | `d` | expiry `YYYYMMDD`  | `due`         |
//! | `t` | transaction date   | `transaction` |
//! | `r` | custom rate        | `rate`        |
//!
//! Short keys win when both are present. Every field is validated the same
//! way form entry is; invalid fields are dropped, never applied.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::error::{ResidualError, ResidualResult};
use crate::models::{CycleLength, Currency, ValuationInput};

const LINK_DATE_FORMAT: &str = "%Y%m%d";

/// Query parameters of a share link; every field is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShareParams {
    pub currency: Option<Currency>,
    pub price: Option<f64>,
    pub cycle: Option<CycleLength>,
    pub expiry_date: Option<NaiveDate>,
    pub transaction_date: Option<NaiveDate>,
    pub rate: Option<f64>,
}

/// Result of decoding a link: the accepted fields plus the keys that were rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLink {
    pub params: ShareParams,
    pub rejected: Vec<String>,
}

impl From<&ValuationInput> for ShareParams {
    fn from(input: &ValuationInput) -> Self {
        Self {
            currency: Some(input.currency),
            price: Some(input.foreign_amount),
            cycle: Some(input.cycle),
            expiry_date: Some(input.expiry_date),
            transaction_date: Some(input.transaction_date),
            rate: Some(input.exchange_rate),
        }
    }
}

impl ShareParams {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: ShareParams) -> ShareParams {
        ShareParams {
            currency: self.currency.or(other.currency),
            price: self.price.or(other.price),
            cycle: self.cycle.or(other.cycle),
            expiry_date: self.expiry_date.or(other.expiry_date),
            transaction_date: self.transaction_date.or(other.transaction_date),
            rate: self.rate.or(other.rate),
        }
    }

    /// Build a complete valuation input; every field must be present
    pub fn to_input(&self) -> ResidualResult<ValuationInput> {
        let missing = |name: &str| ResidualError::validation(format!("Missing {}", name));

        ValuationInput::new(
            self.currency.unwrap_or_default(),
            self.price.ok_or_else(|| missing("price"))?,
            self.rate.ok_or_else(|| missing("exchange rate"))?,
            self.cycle.ok_or_else(|| missing("cycle"))?,
            self.expiry_date.ok_or_else(|| missing("expiry date"))?,
            self.transaction_date
                .ok_or_else(|| missing("transaction date"))?,
        )
    }
}

/// Encode parameters as a query string (without the leading `?`)
pub fn encode_query(params: &ShareParams) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(currency) = params.currency {
        query.append_pair("c", currency.code());
    }
    if let Some(price) = params.price {
        query.append_pair("p", &price.to_string());
    }
    if let Some(cycle) = params.cycle {
        query.append_pair("y", &cycle.months().to_string());
    }
    if let Some(expiry) = params.expiry_date {
        query.append_pair("d", &expiry.format(LINK_DATE_FORMAT).to_string());
    }
    if let Some(transaction) = params.transaction_date {
        query.append_pair("t", &transaction.format(LINK_DATE_FORMAT).to_string());
    }
    if let Some(rate) = params.rate {
        query.append_pair("r", &rate.to_string());
    }

    query.finish()
}

/// Build a full link on `base_url`, or a bare `?query` when there is no base
pub fn encode_link(params: &ShareParams, base_url: Option<&str>) -> ResidualResult<String> {
    let query = encode_query(params);

    match base_url {
        Some(base) => {
            let mut url = Url::parse(base).map_err(|e| {
                ResidualError::Config(format!("Invalid share base URL '{}': {}", base, e))
            })?;
            url.set_query(if query.is_empty() { None } else { Some(&query) });
            Ok(url.to_string())
        }
        None => Ok(format!("?{}", query)),
    }
}

/// Decode a full URL or a bare query string
pub fn decode(link: &str) -> DecodedLink {
    let link = link.trim();
    let query = match Url::parse(link) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => link.trim_start_matches('?').to_string(),
    };

    let pairs: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .fold(HashMap::new(), |mut acc, (key, value)| {
            // First occurrence wins, like URLSearchParams::get
            acc.entry(key).or_insert(value);
            acc
        });

    let mut decoded = DecodedLink::default();
    let take = |short: &str, long: &str| -> Option<(String, String)> {
        pairs
            .get(short)
            .filter(|v| !v.is_empty())
            .map(|v| (short.to_string(), v.clone()))
            .or_else(|| {
                pairs
                    .get(long)
                    .filter(|v| !v.is_empty())
                    .map(|v| (long.to_string(), v.clone()))
            })
    };

    let currency = take("c", "currency");
    let price = take("p", "price");
    let cycle = take("y", "cycle");
    let expiry = take("d", "due");
    let transaction = take("t", "transaction");
    let rate = take("r", "rate");

    decoded.params.currency = accept(currency, &mut decoded.rejected, |v| {
        Currency::ALL.iter().copied().find(|c| c.code() == v)
    });
    decoded.params.price = accept(price, &mut decoded.rejected, parse_positive);
    decoded.params.cycle = accept(cycle, &mut decoded.rejected, |v| {
        v.parse::<u32>()
            .ok()
            .and_then(|m| CycleLength::from_months(m).ok())
    });
    decoded.params.expiry_date = accept(expiry, &mut decoded.rejected, parse_link_date);
    decoded.params.transaction_date =
        accept(transaction, &mut decoded.rejected, parse_link_date);
    decoded.params.rate = accept(rate, &mut decoded.rejected, parse_positive);

    decoded
}

fn accept<T>(
    field: Option<(String, String)>,
    rejected: &mut Vec<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let (key, value) = field?;
    let parsed = parse(&value);
    if parsed.is_none() {
        rejected.push(key);
    }
    parsed
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_link_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, LINK_DATE_FORMAT).ok()
}
