//! Shared helpers for the calculation engines.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (midpoint away from zero), the standard convention for money.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use luna_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value to zero when negative.
///
/// The parsing utilities never clamp; wherever the domain forbids negative
/// money or percentages, the engine applies this at its own boundary.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use luna_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-12.50)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(12.50)), dec!(12.50));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(10.344));

        assert_eq!(result, dec!(10.34));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(10.345));

        assert_eq!(result, dec!(10.35));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-10.345));

        assert_eq!(result, dec!(-10.35)); // Away from zero
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        let result = round_half_up(dec!(10.34));

        assert_eq!(result, dec!(10.34));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0.00));

        assert_eq!(result, dec!(0.00));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // floor_at_zero tests
    // =========================================================================

    #[test]
    fn floor_at_zero_passes_positive_values_through() {
        let result = floor_at_zero(dec!(150.25));

        assert_eq!(result, dec!(150.25));
    }

    #[test]
    fn floor_at_zero_clamps_negative_values() {
        let result = floor_at_zero(dec!(-150.25));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn floor_at_zero_keeps_zero() {
        let result = floor_at_zero(dec!(0));

        assert_eq!(result, dec!(0));
    }
}
