//! CSS Values & Units Level 4 — §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-4/#numbers>

use crate::ValueError;

/// Largest accepted precision bit width.
const MAX_BIT: u32 = 16;
/// Bit widths below this keep 4 significant digits, the rest up to 16 keep 5.
const DEC_BIT: u32 = 10;

/// Round `value` to the number of significant digits implied by `bit`.
///
/// `0` rounds to an integer, `1..=9` keeps 4 significant digits,
/// `10..=15` keeps 5 and `16` keeps 6.
///
/// # Errors
/// [`ValueError::NotFinite`] for NaN or infinite input and
/// [`ValueError::OutOfRange`] when `bit` is above 16.
pub fn round_to_precision(value: f64, bit: u32) -> Result<f64, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::NotFinite(value));
    }
    if bit > MAX_BIT {
        return Err(ValueError::OutOfRange(bit));
    }
    if bit == 0 {
        return Ok(value.round());
    }
    let digits = if bit == MAX_BIT {
        6
    } else if bit < DEC_BIT {
        4
    } else {
        5
    };
    let text = format!("{:.*e}", digits - 1, value);
    Ok(text.parse::<f64>().unwrap_or(value))
}

/// Shortest text for `value`, with negative zero printed as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bit_rounds_to_integer() {
        assert_eq!(round_to_precision(2.5, 0), Ok(3.0));
        assert_eq!(round_to_precision(-0.4, 0).map(format_number).as_deref(), Ok("0"));
    }

    #[test]
    fn significant_digits_by_bit_width() {
        assert_eq!(round_to_precision(0.123_456_78, 8), Ok(0.1235));
        assert_eq!(round_to_precision(0.123_456_78, 10), Ok(0.123_46));
        assert_eq!(round_to_precision(0.123_456_78, 16), Ok(0.123_457));
        assert_eq!(round_to_precision(123_456.0, 8), Ok(123_500.0));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(round_to_precision(f64::NAN, 8), Err(ValueError::NotFinite(_))));
        assert_eq!(
            round_to_precision(f64::INFINITY, 8),
            Err(ValueError::NotFinite(f64::INFINITY))
        );
        assert_eq!(round_to_precision(1.0, 17), Err(ValueError::OutOfRange(17)));
    }

    #[test]
    fn numbers_print_shortest() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(255.0), "255");
    }
}
