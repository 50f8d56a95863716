//! Exchange-rate display formatting

use crate::models::Currency;
use crate::services::RateQuote;

/// One-line summary of a quote
pub fn format_rate_quote(quote: &RateQuote) -> String {
    format!(
        "1 {} = {} {} (updated {} UTC+8)",
        quote.currency,
        quote.rate_label(),
        Currency::LOCAL,
        quote.updated_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exchange_rate::RatesPayload;

    #[test]
    fn test_format_rate_quote() {
        let payload = RatesPayload {
            rates: [("CNY".to_string(), 7.2), ("USD".to_string(), 1.0)]
                .into_iter()
                .collect(),
            timestamp: 1_751_301_000_000,
        };
        let quote = RateQuote::from_payload(Currency::Usd, &payload).unwrap();
        assert_eq!(
            format_rate_quote(&quote),
            "1 USD = 7.200 CNY (updated 2025/07/01 00:30 UTC+8)"
        );
    }
}
