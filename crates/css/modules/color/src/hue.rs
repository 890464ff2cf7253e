//! CSS Color Module Level 4 — §12.4 Hue interpolation
//! Spec: <https://www.w3.org/TR/css-color-4/#hue-interpolation>

use crate::ColorError;
use css_values_units::ValueError;

const DEG: f64 = 360.0;
const DEG_HALF: f64 = 180.0;

/// Arc taken between two hues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HueArc {
    #[default]
    Shorter,
    Longer,
    Increasing,
    Decreasing,
}

impl HueArc {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shorter" => Some(Self::Shorter),
            "longer" => Some(Self::Longer),
            "increasing" => Some(Self::Increasing),
            "decreasing" => Some(Self::Decreasing),
            _ => None,
        }
    }
}

/// Adjust a pair of hues so that linear interpolation between them follows
/// `arc`. One of the hues may be raised by 360.
///
/// # Errors
/// [`ColorError::Value`] when either hue is NaN or infinite.
pub fn interpolate_hue(hue_a: f64, hue_b: f64, arc: HueArc) -> Result<(f64, f64), ColorError> {
    if !hue_a.is_finite() {
        return Err(ValueError::NotFinite(hue_a).into());
    }
    if !hue_b.is_finite() {
        return Err(ValueError::NotFinite(hue_b).into());
    }
    let (mut from, mut to) = (hue_a, hue_b);
    match arc {
        HueArc::Decreasing => {
            if to > from {
                from += DEG;
            }
        }
        HueArc::Increasing => {
            if to < from {
                to += DEG;
            }
        }
        HueArc::Longer => {
            if to > from && to < from + DEG_HALF {
                from += DEG;
            } else if to > from - DEG_HALF && to <= from {
                to += DEG;
            }
        }
        HueArc::Shorter => {
            if to > from + DEG_HALF {
                from += DEG;
            } else if to < from - DEG_HALF {
                to += DEG;
            }
        }
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(hue_a: f64, hue_b: f64, arc: HueArc) -> f64 {
        interpolate_hue(hue_a, hue_b, arc).map_or(f64::NAN, |(from, to)| to - from)
    }

    #[test]
    fn shorter_never_exceeds_half_turn() {
        for (hue_a, hue_b) in [(10.0, 350.0), (350.0, 10.0), (0.0, 180.0), (90.0, 270.0), (30.0, 60.0)] {
            assert!(span(hue_a, hue_b, HueArc::Shorter).abs() <= 180.0, "{hue_a} {hue_b}");
        }
        assert_eq!(interpolate_hue(10.0, 350.0, HueArc::Shorter), Ok((370.0, 350.0)));
    }

    #[test]
    fn longer_takes_the_far_side() {
        for (hue_a, hue_b) in [(10.0, 350.0), (350.0, 10.0), (30.0, 60.0), (60.0, 30.0)] {
            assert!(span(hue_a, hue_b, HueArc::Longer).abs() > 180.0, "{hue_a} {hue_b}");
        }
        assert_eq!(interpolate_hue(10.0, 350.0, HueArc::Longer), Ok((10.0, 350.0)));
        assert_eq!(interpolate_hue(30.0, 60.0, HueArc::Longer), Ok((390.0, 60.0)));
    }

    #[test]
    fn directional_arcs() {
        for (hue_a, hue_b) in [(10.0, 350.0), (350.0, 10.0), (30.0, 30.0)] {
            assert!(span(hue_a, hue_b, HueArc::Increasing) >= 0.0);
            assert!(span(hue_a, hue_b, HueArc::Decreasing) <= 0.0);
        }
    }

    #[test]
    fn non_finite_hues_are_rejected() {
        assert_eq!(
            interpolate_hue(10.0, f64::INFINITY, HueArc::Longer),
            Err(ColorError::Value(ValueError::NotFinite(f64::INFINITY)))
        );
        assert!(span(f64::NAN, 10.0, HueArc::Shorter).is_nan());
    }

    #[test]
    fn arc_names() {
        assert_eq!(HueArc::from_name("Longer"), Some(HueArc::Longer));
        assert_eq!(HueArc::from_name("widest"), None);
    }
}
