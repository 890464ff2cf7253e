//! CSS Images Module Level 3 — §3 Gradients: line and color-stop grammars
//! Spec: <https://www.w3.org/TR/css-images-3/#gradients>

use crate::gradient::GradientKind;
use css_color::grammar::{HUE_ARC, POLAR_MIX_SPACES, RECTANGULAR_MIX_SPACES};
use css_values_units::grammar::{ANGLE, LENGTH, NUM, NUM_POSITIVE, PCT, compile_regex, is_match};
use once_cell::sync::Lazy;
use regex::Regex;

const SIDE_X: &str = "left|right";
const SIDE_Y: &str = "top|bottom";
const AXIS_X: &str = "left|center|right|x-(?:start|end)";
const AXIS_Y: &str = "top|center|bottom|y-(?:start|end)";
const AXIS_BLOCK: &str = "block-(?:start|end)|center";
const AXIS_INLINE: &str = "inline-(?:start|end)|center";
const AXIS_LOGICAL: &str = "start|end|center";
const RADIAL_SHAPE: &str = "circle|ellipse";
const RADIAL_EXTENT: &str = "closest-corner|closest-side|farthest-corner|farthest-side";

/// `<angle>`; a bare `0` is allowed.
fn angle() -> String {
    format!("(?:{NUM}(?:{ANGLE})|0)")
}

/// `<length-percentage>`; a bare `0` is allowed.
fn length_percentage() -> String {
    format!("(?:{NUM}(?:{LENGTH})|{PCT}|0)")
}

/// `<angle-percentage>`.
fn angle_percentage() -> String {
    format!("(?:{NUM}(?:{ANGLE})|{PCT}|0)")
}

/// `<position>` in its 1-, 2- and 4-value forms.
fn position() -> String {
    let lp = length_percentage();
    let one = format!(
        "(?:{AXIS_X}|{AXIS_Y}|{AXIS_BLOCK}|{AXIS_INLINE}|{AXIS_LOGICAL}|{lp})"
    );
    let two = [
        format!(r"(?:{AXIS_X}|{lp})\s+(?:{AXIS_Y}|{lp})"),
        format!(r"(?:{AXIS_Y})\s+(?:{AXIS_X})"),
        format!(r"(?:{AXIS_BLOCK})\s+(?:{AXIS_INLINE})"),
        format!(r"(?:{AXIS_INLINE})\s+(?:{AXIS_BLOCK})"),
        format!(r"(?:{AXIS_LOGICAL})\s+(?:{AXIS_LOGICAL})"),
    ]
    .join("|");
    let four = [
        format!(r"(?:left|right|x-start|x-end)\s+{lp}\s+(?:top|bottom|y-start|y-end)\s+{lp}"),
        format!(r"(?:top|bottom|y-start|y-end)\s+{lp}\s+(?:left|right|x-start|x-end)\s+{lp}"),
        format!(r"block-(?:start|end)\s+{lp}\s+inline-(?:start|end)\s+{lp}"),
        format!(r"inline-(?:start|end)\s+{lp}\s+block-(?:start|end)\s+{lp}"),
        format!(r"(?:start|end)\s+{lp}\s+(?:start|end)\s+{lp}"),
    ]
    .join("|");
    format!("(?:{four}|{two}|{one})")
}

/// `in <color-space> [<arc> hue]?`
fn interpolation() -> String {
    format!(
        r"in\s+(?:{RECTANGULAR_MIX_SPACES}|(?:{POLAR_MIX_SPACES})(?:\s+(?:{HUE_ARC})\s+hue)?)"
    )
}

/// A gradient line: the type-specific part, an interpolation clause, or both in either order.
fn with_interpolation(line: &str) -> String {
    let method = interpolation();
    format!(r"^(?:(?:{line})(?:\s+{method})?|{method}(?:\s+(?:{line}))?)$")
}

fn linear_line() -> String {
    let side_or_corner = format!(
        r"(?:{SIDE_X})(?:\s+(?:{SIDE_Y}))?|(?:{SIDE_Y})(?:\s+(?:{SIDE_X}))?"
    );
    format!(r"{}|to\s+(?:{side_or_corner})", angle())
}

fn radial_line() -> String {
    let lp = length_percentage();
    let size = format!(r"{RADIAL_EXTENT}|{NUM_POSITIVE}(?:{LENGTH})|0|{lp}\s+{lp}");
    let shape_size = format!(
        r"(?:{RADIAL_SHAPE})(?:\s+(?:{size}))?|(?:{size})(?:\s+(?:{RADIAL_SHAPE}))?"
    );
    let at = format!(r"at\s+{}", position());
    format!(r"(?:{shape_size})(?:\s+{at})?|{at}")
}

fn conic_line() -> String {
    let at = format!(r"at\s+{}", position());
    format!(r"from\s+{}(?:\s+{at})?|{at}", angle())
}

static REG_LINEAR: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&with_interpolation(&linear_line())));
static REG_RADIAL: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&with_interpolation(&radial_line())));
static REG_CONIC: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&with_interpolation(&conic_line())));

static REG_HINT_LENGTH: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!("^{}$", length_percentage())));
static REG_HINT_ANGLE: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!("^{}$", angle_percentage())));
static REG_STOP_LENGTH: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!(r"(?:\s+{}){{1,2}}$", length_percentage())));
static REG_STOP_ANGLE: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!(r"(?:\s+{}){{1,2}}$", angle_percentage())));

static REG_STOP_CLASSES: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex("^color(?:,(?:hint,)?color)+$"));

/// Whether `value` is a complete gradient line for `kind`.
pub fn is_gradient_line(value: &str, kind: GradientKind) -> bool {
    let regex = match kind {
        GradientKind::Linear => &REG_LINEAR,
        GradientKind::Radial => &REG_RADIAL,
        GradientKind::Conic => &REG_CONIC,
    };
    is_match(regex.as_ref(), value)
}

/// Whether `value` is a color hint for `kind`.
///
/// Conic gradients take angles, the others lengths.
pub fn is_color_hint(value: &str, kind: GradientKind) -> bool {
    let regex = match kind {
        GradientKind::Conic => &REG_HINT_ANGLE,
        GradientKind::Linear | GradientKind::Radial => &REG_HINT_LENGTH,
    };
    is_match(regex.as_ref(), value)
}

/// Split a color stop into its color and its trailing positions.
///
/// The positions come back as one space-separated string, empty when the
/// stop has none.
pub fn split_stop_positions(value: &str, kind: GradientKind) -> (&str, String) {
    let regex = match kind {
        GradientKind::Conic => &REG_STOP_ANGLE,
        GradientKind::Linear | GradientKind::Radial => &REG_STOP_LENGTH,
    };
    regex
        .as_ref()
        .and_then(|compiled| compiled.find(value))
        .map_or((value, String::new()), |found| {
            let positions = found.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            (value[..found.start()].trim_end(), positions)
        })
}

/// Whether a comma-joined list of stop classes is `color(,(hint,)?color)+`.
pub fn is_stop_sequence(classes: &str) -> bool {
    is_match(REG_STOP_CLASSES.as_ref(), classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_lines() {
        for line in [
            "to right",
            "to top left",
            "45deg",
            "-0.25turn",
            "0",
            "in oklab",
            "to bottom in oklch longer hue",
            "in hsl shorter hue 90deg",
        ] {
            assert!(is_gradient_line(line, GradientKind::Linear), "{line}");
        }
        for line in ["to middle", "to left right", "45", "in srgb longer hue", "red"] {
            assert!(!is_gradient_line(line, GradientKind::Linear), "{line}");
        }
    }

    #[test]
    fn radial_lines() {
        for line in [
            "circle",
            "ellipse farthest-corner",
            "closest-side circle",
            "circle 10px",
            "10px 20%",
            "at center",
            "circle at left top",
            "ellipse at 10px 20%",
            "at left 10px bottom 5%",
            "at block-start inline-end",
            "circle in srgb",
        ] {
            assert!(is_gradient_line(line, GradientKind::Radial), "{line}");
        }
        for line in ["to right", "square", "at", "circle at middle"] {
            assert!(!is_gradient_line(line, GradientKind::Radial), "{line}");
        }
    }

    #[test]
    fn conic_lines() {
        for line in ["from 90deg", "from 0.5turn at 25% 75%", "at center", "in lch from 0"] {
            assert!(is_gradient_line(line, GradientKind::Conic), "{line}");
        }
        for line in ["from 10px", "to right", "from"] {
            assert!(!is_gradient_line(line, GradientKind::Conic), "{line}");
        }
    }

    #[test]
    fn hints_follow_the_gradient_kind() {
        assert!(is_color_hint("10px", GradientKind::Linear));
        assert!(is_color_hint("50%", GradientKind::Radial));
        assert!(!is_color_hint("10deg", GradientKind::Linear));
        assert!(is_color_hint("10deg", GradientKind::Conic));
        assert!(!is_color_hint("10px", GradientKind::Conic));
    }

    #[test]
    fn stop_positions() {
        assert_eq!(
            split_stop_positions("red  10px 20%", GradientKind::Linear),
            ("red", "10px 20%".to_owned())
        );
        assert_eq!(
            split_stop_positions("rgb(0 0 0) 0", GradientKind::Linear),
            ("rgb(0 0 0)", "0".to_owned())
        );
        assert_eq!(
            split_stop_positions("blue", GradientKind::Linear),
            ("blue", String::new())
        );
        assert_eq!(
            split_stop_positions("blue 90deg", GradientKind::Conic),
            ("blue", "90deg".to_owned())
        );
    }

    #[test]
    fn stop_sequences() {
        assert!(is_stop_sequence("color,color"));
        assert!(is_stop_sequence("color,hint,color,color"));
        assert!(!is_stop_sequence("color"));
        assert!(!is_stop_sequence("hint,color,color"));
        assert!(!is_stop_sequence("color,hint,hint,color"));
        assert!(!is_stop_sequence("color,color,hint"));
    }
}
