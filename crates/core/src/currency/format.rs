//! Currency display formatting.
//!
//! Amounts are rendered as `"USD 1,234.56"` for user-facing messages:
//! currency code, thousands separators, two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with its currency code for display.
#[must_use]
pub fn format_amount(code: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{f:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{code} {sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "USD 0.00")]
    #[case(dec!(600), "USD 600.00")]
    #[case(dec!(1000), "USD 1,000.00")]
    #[case(dec!(1234567.5), "USD 1,234,567.50")]
    #[case(dec!(0.125), "USD 0.12")]
    #[case(dec!(-42.1), "USD -42.10")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount("USD", amount), expected);
    }

    #[test]
    fn test_format_other_codes() {
        assert_eq!(format_amount("EUR", dec!(90)), "EUR 90.00");
        assert_eq!(format_amount("NGN", dec!(415000.75)), "NGN 415,000.75");
    }
}
