//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Use banker's rounding (round half to even)
//! - Store both the debit and credit legs, never recompute one from the other

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places carried for converted amounts.
pub const CONVERSION_SCALE: u32 = 2;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Decimal {
    (amount * rate).round_dp_with_strategy(CONVERSION_SCALE, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_amount() {
        // 100 USD at 0.9 = 90 EUR
        assert_eq!(convert_amount(dec!(100), dec!(0.9)), dec!(90.00));
    }

    #[test]
    fn test_convert_same_currency() {
        assert_eq!(convert_amount(dec!(100.50), Decimal::ONE), dec!(100.50));
    }

    #[test]
    fn test_convert_rounds_to_two_decimals() {
        // 100 * 1.23456 = 123.456 -> 123.46
        assert_eq!(convert_amount(dec!(100), dec!(1.23456)), dec!(123.46));
    }

    #[test]
    fn test_bankers_rounding() {
        // Round half to even: 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(convert_amount(dec!(1), dec!(0.125)), dec!(0.12));
        assert_eq!(convert_amount(dec!(1), dec!(0.135)), dec!(0.14));
    }
}
