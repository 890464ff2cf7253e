//! CSS Color Module Level 4 — §15 Serializing `<color>` values
//! Spec: <https://www.w3.org/TR/css-color-4/#serializing-color-values>

use crate::parse::ColorData;
use crate::space::ColorSpace;
use css_values_units::{format_number, round_to_precision};

/// Computed value of an unresolvable color.
pub const TRANSPARENT_RGBA: &str = "rgba(0, 0, 0, 0)";

/// Precision of alpha values.
const ALPHA_BIT: u32 = 8;
/// Precision of channels in computed values and of CIE channels.
const CHANNEL_BIT: u32 = 16;
/// Precision of channels of relative colors outside the CIE spaces.
const RELATIVE_BIT: u32 = 10;

fn rounded(value: f64, bit: u32) -> f64 {
    round_to_precision(value, bit).unwrap_or(0.0)
}

fn channel_text(value: f64, bit: u32, has_none: bool) -> String {
    if value.is_nan() {
        let missing = if has_none { "none" } else { "0" };
        return missing.to_owned();
    }
    format_number(rounded(value, bit))
}

/// ` / <alpha>`, or nothing for an opaque color.
fn alpha_suffix(alpha: f64, has_none: bool) -> String {
    if alpha.is_nan() {
        return format!(" / {}", if has_none { "none" } else { "0" });
    }
    let alpha = rounded(alpha, ALPHA_BIT);
    if alpha == 1.0 {
        String::new()
    } else {
        format!(" / {}", format_number(alpha))
    }
}

fn modern(space: ColorSpace, channels: [f64; 3], alpha: f64, bit: u32, has_none: bool) -> String {
    let body = channels
        .map(|channel| channel_text(channel, bit, has_none))
        .join(" ");
    let alpha = alpha_suffix(alpha, has_none);
    if space.is_cie() {
        format!("{}({body}{alpha})", space.name())
    } else {
        format!("color({} {body}{alpha})", space.name())
    }
}

/// Computed value of a color.
///
/// Colors written as named, hex, `rgb()`, `hsl()` or `hwb()` serialize as
/// `rgb()`/`rgba()` with 8-bit channels. CIE colors keep their function,
/// anything else uses `color()`.
pub fn serialize_computed(color: &ColorData) -> String {
    let legacy = matches!(
        color.space,
        ColorSpace::Srgb | ColorSpace::Hsl | ColorSpace::Hwb
    ) && !color.predefined;
    if legacy {
        let [red, green, blue] = color.to_rgb8();
        let alpha = rounded(color.resolved_alpha(), ALPHA_BIT);
        return if alpha == 1.0 {
            format!("rgb({red}, {green}, {blue})")
        } else {
            format!("rgba({red}, {green}, {blue}, {})", format_number(alpha))
        };
    }
    modern(
        color.space,
        color.channels,
        color.alpha,
        CHANNEL_BIT,
        color.has_none(),
    )
}

/// Serialization of a resolved relative color.
///
/// `hsl` and `hwb` results are converted to `color(srgb …)`. Missing
/// components print as `none` when the color was written with `none`,
/// otherwise as `0`.
pub fn serialize_relative(color: &ColorData) -> String {
    let has_none = color.has_none();
    match color.space {
        ColorSpace::Hsl | ColorSpace::Hwb => {
            let srgb = color.to_space(ColorSpace::Srgb);
            modern(ColorSpace::Srgb, srgb.channels, color.alpha, RELATIVE_BIT, has_none)
        }
        space if space.is_cie() => modern(space, color.channels, color.alpha, CHANNEL_BIT, has_none),
        space => modern(space, color.channels, color.alpha, RELATIVE_BIT, has_none),
    }
}

/// `#rrggbb`, or `#rrggbbaa` when `with_alpha` is set.
///
/// Without alpha, fully transparent colors have no hex form.
pub fn to_hex(color: &ColorData, with_alpha: bool) -> Option<String> {
    let [red, green, blue] = color.to_rgb8();
    if !with_alpha {
        return (color.resolved_alpha() > 0.0).then(|| format!("#{red:02x}{green:02x}{blue:02x}"));
    }
    let alpha = (color.resolved_alpha().clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(format!("#{red:02x}{green:02x}{blue:02x}{alpha:02x}"))
}

/// Drop the `a` of legacy `rgba(`/`hsla(` prefixes.
pub fn normalize_legacy_prefix(value: &str) -> String {
    if let Some(rest) = value.strip_prefix("rgba(") {
        format!("rgb({rest}")
    } else if let Some(rest) = value.strip_prefix("hsla(") {
        format!("hsl({rest}")
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srgb(channels: [f64; 3], alpha: f64) -> ColorData {
        ColorData::new(ColorSpace::Srgb, channels, alpha)
    }

    #[test]
    fn legacy_colors_compute_to_rgb() {
        assert_eq!(serialize_computed(&srgb([1.0, 0.0, 0.0], 1.0)), "rgb(255, 0, 0)");
        assert_eq!(serialize_computed(&srgb([0.0, 0.0, 1.0], 0.5)), "rgba(0, 0, 255, 0.5)");
        let hsl = ColorData::new(ColorSpace::Hsl, [120.0, 100.0, 50.0], 1.0);
        assert_eq!(serialize_computed(&hsl), "rgb(0, 255, 0)");
    }

    #[test]
    fn modern_colors_keep_their_space() {
        let mut predefined = srgb([0.5, 0.0, 0.5], 1.0);
        predefined.predefined = true;
        assert_eq!(serialize_computed(&predefined), "color(srgb 0.5 0 0.5)");
        let lab = ColorData::new(ColorSpace::Lab, [50.0, f64::NAN, 10.0], 0.25);
        assert_eq!(serialize_computed(&lab), "lab(50 none 10 / 0.25)");
    }

    #[test]
    fn relative_rounding_and_alpha() {
        let almost_red = ColorData::new(ColorSpace::Srgb, [1.000_000_2, 0.0, 0.0], 1.0);
        assert_eq!(serialize_relative(&almost_red), "color(srgb 1 0 0)");
        let hsl = ColorData::new(ColorSpace::Hsl, [0.0, 100.0, 50.0], 0.5);
        assert_eq!(serialize_relative(&hsl), "color(srgb 1 0 0 / 0.5)");
        let missing_alpha = ColorData::new(ColorSpace::Srgb, [1.0, 0.0, 0.0], f64::NAN);
        assert_eq!(serialize_relative(&missing_alpha), "color(srgb 1 0 0 / none)");
    }

    #[test]
    fn hex_forms() {
        let red = srgb([1.0, 0.0, 0.0], 1.0);
        assert_eq!(to_hex(&red, false).as_deref(), Some("#ff0000"));
        assert_eq!(to_hex(&red, true).as_deref(), Some("#ff0000ff"));
        assert_eq!(to_hex(&ColorData::transparent(), false), None);
        assert_eq!(to_hex(&ColorData::transparent(), true).as_deref(), Some("#00000000"));
    }

    #[test]
    fn legacy_prefixes() {
        assert_eq!(normalize_legacy_prefix("rgba(from red r g b)"), "rgb(from red r g b)");
        assert_eq!(normalize_legacy_prefix("hsla(0 0% 0%)"), "hsl(0 0% 0%)");
        assert_eq!(normalize_legacy_prefix("lab(0 0 0)"), "lab(0 0 0)");
    }
}
