//! Share link display formatting

use crate::services::share_link::DecodedLink;

/// List the fields a link carries, one per line
pub fn format_decoded_link(decoded: &DecodedLink) -> String {
    let params = &decoded.params;
    let mut output = String::new();

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    output.push_str(&format!(
        "  Currency:       {}\n",
        show(params.currency.map(|c| c.to_string()))
    ));
    output.push_str(&format!(
        "  Price:          {}\n",
        show(params.price.map(|p| p.to_string()))
    ));
    output.push_str(&format!(
        "  Cycle:          {}\n",
        show(params.cycle.map(|c| c.to_string()))
    ));
    output.push_str(&format!(
        "  Expiry:         {}\n",
        show(params.expiry_date.map(|d| d.to_string()))
    ));
    output.push_str(&format!(
        "  Transaction:    {}\n",
        show(params.transaction_date.map(|d| d.to_string()))
    ));
    output.push_str(&format!(
        "  Rate:           {}\n",
        show(params.rate.map(|r| r.to_string()))
    ));

    if !decoded.rejected.is_empty() {
        output.push_str(&format!(
            "Ignored invalid parameters: {}\n",
            decoded.rejected.join(", ")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::share_link::decode;

    #[test]
    fn test_format_decoded_link() {
        let text = format_decoded_link(&decode("c=EUR&p=12.5&y=bad"));
        assert!(text.contains("Currency:       EUR"));
        assert!(text.contains("Price:          12.5"));
        assert!(text.contains("Expiry:         -"));
        assert!(text.contains("Ignored invalid parameters: y"));
    }
}
