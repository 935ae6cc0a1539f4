//! Shared helpers for quote calculations.

use rust_decimal::Decimal;

/// Rounds a value to whole euros, half away from zero.
///
/// Indicative estimates are displayed without cents, and midpoints round
/// up (121.5 € becomes 122 €).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::round_to_euro;
///
/// assert_eq!(round_to_euro(dec!(54.0)), dec!(54));
/// assert_eq!(round_to_euro(dec!(121.5)), dec!(122));
/// assert_eq!(round_to_euro(dec!(121.49)), dec!(121));
/// ```
pub fn round_to_euro(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_to_euro_rounds_down_below_midpoint() {
        assert_eq!(round_to_euro(dec!(81.4)), dec!(81));
    }

    #[test]
    fn round_to_euro_rounds_up_at_midpoint() {
        assert_eq!(round_to_euro(dec!(81.5)), dec!(82));
    }

    #[test]
    fn round_to_euro_preserves_whole_values() {
        assert_eq!(round_to_euro(dec!(540)), dec!(540));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(50), dec!(42)), dec!(50));
        assert_eq!(max(dec!(42), dec!(50)), dec!(50));
        assert_eq!(max(dec!(50), dec!(50)), dec!(50));
    }
}
