//! Color value grammars as regular expressions.
//!
//! These are fast paths. A value that does not match is not necessarily
//! invalid; callers fall back to the full parser.

use css_values_units::grammar::{ANGLE, NUM, PCT, compile_regex, is_match};
use once_cell::sync::Lazy;
use regex::Regex;

const HEX: &str = r"#(?:[\da-f]{8}|[\da-f]{6}|[\da-f]{3,4})";
const PREDEFINED_SPACES: &str =
    "srgb(?:-linear)?|display-p3|a98-rgb|prophoto-rgb|rec2020|xyz(?:-d(?:50|65))?";
/// Rectangular color spaces accepted by an interpolation method.
pub const RECTANGULAR_MIX_SPACES: &str =
    "srgb(?:-linear)?|display-p3|a98-rgb|prophoto-rgb|rec2020|xyz(?:-d(?:50|65))?|(?:ok)?lab";
/// Polar color spaces accepted by an interpolation method.
pub const POLAR_MIX_SPACES: &str = "hsl|hwb|(?:ok)?lch";
/// `<hue-interpolation-method>` arcs.
pub const HUE_ARC: &str = "shorter|longer|increasing|decreasing";

fn num_or_pct() -> String {
    format!("(?:{NUM}|{PCT}|none)")
}

fn hue() -> String {
    format!("(?:{NUM}(?:{ANGLE})?|none)")
}

fn alpha_clause() -> String {
    format!(r"(?:\s*/\s*{})?", num_or_pct())
}

fn legacy_functions() -> String {
    let alpha = format!(r"(?:\s*,\s*(?:{NUM}|{PCT}))?");
    let rgb = format!(
        r"rgba?\(\s*(?:{NUM}\s*,\s*{NUM}\s*,\s*{NUM}|{PCT}\s*,\s*{PCT}\s*,\s*{PCT}){alpha}\s*\)"
    );
    let hsl = format!(r"hsla?\(\s*{NUM}(?:{ANGLE})?\s*,\s*{PCT}\s*,\s*{PCT}{alpha}\s*\)");
    format!("{rgb}|{hsl}")
}

fn modern_functions() -> String {
    let channel = num_or_pct();
    let hue = hue();
    let alpha = alpha_clause();
    let rectangular = format!(
        r"(?:rgba?|(?:ok)?lab)\(\s*{channel}\s+{channel}\s+{channel}{alpha}\s*\)"
    );
    let hsl = format!(r"(?:hsla?|hwb)\(\s*{hue}\s+{channel}\s+{channel}{alpha}\s*\)");
    let lch = format!(r"(?:ok)?lch\(\s*{channel}\s+{channel}\s+{hue}{alpha}\s*\)");
    let predefined = format!(
        r"color\(\s*(?:{PREDEFINED_SPACES})\s+{channel}\s+{channel}\s+{channel}{alpha}\s*\)"
    );
    format!("{rectangular}|{hsl}|{lch}|{predefined}")
}

/// A hex color or an absolute color function without named colors.
fn absolute_color() -> String {
    format!("{HEX}|{}|{}", legacy_functions(), modern_functions())
}

static REG_COLOR: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!("^(?:{})$", absolute_color())));

static REG_MIX: Lazy<Option<Regex>> = Lazy::new(|| {
    let color = absolute_color();
    let part = format!(r"(?:{PCT}\s+)?(?:{color})(?:\s+{PCT})?");
    compile_regex(&format!(
        r"^color-mix\(\s*in\s+(?:(?:{RECTANGULAR_MIX_SPACES})|(?:{POLAR_MIX_SPACES})(?:\s+(?:{HUE_ARC})\s+hue)?)\s*,\s*{part}\s*,\s*{part}\s*\)$"
    ))
});

static REG_FN_COLOR: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(r"^(?:(?:ok)?l(?:ab|ch)|color(?:-mix)?|hsla?|hwb|rgba?|var)\("));

static REG_FN_REL: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(r"^(?:(?:ok)?l(?:ab|ch)|color|hsla?|hwb|rgba?)\(\s*from\s+"));

/// Whether a lowercase `value` is a hex color or an absolute color function.
#[inline]
pub fn is_absolute_color(value: &str) -> bool {
    is_match(REG_COLOR.as_ref(), value)
}

/// Whether a lowercase `value` is `color-mix()` of absolute colors.
#[inline]
pub fn is_color_mix_syntax(value: &str) -> bool {
    is_match(REG_MIX.as_ref(), value)
}

/// Whether a lowercase `value` starts with a function that may produce a color.
#[inline]
pub fn has_color_function_prefix(value: &str) -> bool {
    is_match(REG_FN_COLOR.as_ref(), value)
}

/// Whether a lowercase `value` is relative color syntax (`rgb(from …)`).
#[inline]
pub fn is_relative_color(value: &str) -> bool {
    is_match(REG_FN_REL.as_ref(), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_colors() {
        for ok in [
            "#fff",
            "#ff000080",
            "rgb(255, 0, 0)",
            "rgba(100%, 0%, 0%, 0.5)",
            "rgb(255 0 0 / 50%)",
            "hsl(120deg 50% 50%)",
            "hsla(120, 50%, 50%, 1)",
            "hwb(0 0% 0%)",
            "lab(50 20 -30)",
            "oklch(0.7 0.1 200)",
            "color(display-p3 1 0 none)",
        ] {
            assert!(is_absolute_color(ok), "{ok}");
        }
        for bad in ["#ff", "red", "rgb(1 2)", "color(cmyk 0 0 0)", "rgb(10deg 0 0)"] {
            assert!(!is_absolute_color(bad), "{bad}");
        }
    }

    #[test]
    fn mixes() {
        assert!(is_color_mix_syntax("color-mix(in srgb, #f00, #00f)"));
        assert!(is_color_mix_syntax(
            "color-mix(in oklch longer hue, rgb(255 0 0) 30%, 70% #00f)"
        ));
        assert!(!is_color_mix_syntax("color-mix(in srgb longer hue, #f00, #00f)"));
    }

    #[test]
    fn prefixes() {
        assert!(has_color_function_prefix("color-mix(in srgb, red, blue)"));
        assert!(has_color_function_prefix("var(--a)"));
        assert!(!has_color_function_prefix("calc(1px)"));
        assert!(is_relative_color("rgb(from red r g b)"));
        assert!(is_relative_color("color( from red srgb r g b)"));
        assert!(!is_relative_color("rgb(255 0 0)"));
    }
}
