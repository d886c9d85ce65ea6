//! Decimal rounding helpers
//!
//! Every derived value is rounded to three decimal places on its own. The
//! rounding is correctly rounded half-to-even on the exact binary value of the
//! double, then converted back to the nearest double. That is what the float
//! formatter does for `{:.N}` and what the original sheets were printed with,
//! so going through the formatter reproduces the printed digits exactly.

/// Decimal places kept on every measurement and derived value
pub const DECIMAL_PLACES: usize = 3;

/// Round `value` to `places` decimal places (half-to-even on the exact value).
///
/// Non-finite values are returned unchanged.
pub fn round_dp(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // A finite value always formats to a parseable decimal string.
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Round to [`DECIMAL_PLACES`]
#[inline]
pub fn round3(value: f64) -> f64 {
    round_dp(value, DECIMAL_PLACES)
}

/// Format a value the way the preview table and the report print it:
/// shortest round-trip representation, always with a fractional part
/// (`7.75`, `20.0`, `0.0`). From 1e16 up the exponent form is used, with a
/// signed exponent of at least two digits (`1e+16`, `2.5e-05`).
pub fn display_value(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_keeps_three_places() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(2.0), 2.0);
        assert_eq!(round3(0.0004), 0.0);
        assert_eq!(round3(-1.23456), -1.235);
    }

    #[test]
    fn test_round_half_even_on_exact_ties() {
        // 0.0625 and 0.1875 are exactly representable ties at three places
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(0.1875), 0.188);
        assert_eq!(round_dp(0.125, 2), 0.12);
        assert_eq!(round_dp(0.375, 2), 0.38);
    }

    #[test]
    fn test_round_uses_binary_value_not_decimal_literal() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(round_dp(2.675, 2), 2.67);
    }

    #[test]
    fn test_round_removes_float_noise() {
        assert_eq!(round3(0.1 + 0.2), 0.3);
        assert_eq!(round3(0.001 * 3.0), 0.003);
    }

    #[test]
    fn test_round_non_finite_passthrough() {
        assert!(round3(f64::NAN).is_nan());
        assert_eq!(round3(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(7.75), "7.75");
        assert_eq!(display_value(20.0), "20.0");
        assert_eq!(display_value(0.0), "0.0");
        assert_eq!(display_value(0.125), "0.125");
        assert_eq!(display_value(-3.5), "-3.5");
    }

    #[test]
    fn test_display_value_exponent_form() {
        assert_eq!(display_value(1e15), "1000000000000000.0");
        assert_eq!(display_value(1e16), "1e+16");
        assert_eq!(display_value(1.5e17), "1.5e+17");
        assert_eq!(display_value(-2e20), "-2e+20");
        assert_eq!(display_value(1e100), "1e+100");
        assert_eq!(display_value(2.5e-5), "2.5e-05");
    }
}
