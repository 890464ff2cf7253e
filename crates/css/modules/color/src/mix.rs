//! CSS Color Module Level 5 — §3 Mixing colors: the `color-mix()` function
//! Spec: <https://www.w3.org/TR/css-color-5/#color-mix>

use crate::hue::{HueArc, interpolate_hue};
use crate::parse::ColorData;
use crate::resolver::ColorResolver;
use crate::space::ColorSpace;
use css_syntax::{Delimiter, SplitOptions};
use css_values_units::ResolveOptions;
use log::debug;

/// Interpolation method of a mix: `in <space> [<arc> hue]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interpolation {
    pub space: ColorSpace,
    pub arc: HueArc,
}

impl Interpolation {
    /// Parse the words of an interpolation method.
    pub fn parse(words: &[String]) -> Option<Self> {
        let (keyword, rest) = words.split_first()?;
        if keyword != "in" {
            return None;
        }
        let (space_name, arc_words) = rest.split_first()?;
        let space = ColorSpace::from_name(space_name)?;
        let arc = match arc_words {
            [] => HueArc::default(),
            [arc, hue] if hue == "hue" && space.hue_index().is_some() => HueArc::from_name(arc)?,
            _ => return None,
        };
        Some(Self { space, arc })
    }
}

fn parse_percentage(word: &str) -> Option<f64> {
    let percent = word.strip_suffix('%')?.parse::<f64>().ok()?;
    (0.0..=100.0).contains(&percent).then_some(percent)
}

/// Weights of the two colors and the alpha multiplier.
///
/// Omitted percentages complete each other to 100%. Sums other than 100%
/// are scaled back, and a sum below 100% also scales the resulting alpha.
pub fn normalize_weights(first: Option<f64>, second: Option<f64>) -> Option<(f64, f64, f64)> {
    let (first, second) = match (first, second) {
        (None, None) => (50.0, 50.0),
        (Some(first), None) => (first, 100.0 - first),
        (None, Some(second)) => (100.0 - second, second),
        (Some(first), Some(second)) => (first, second),
    };
    let sum = first + second;
    if sum <= 0.0 {
        return None;
    }
    let multiplier = if sum < 100.0 { sum / 100.0 } else { 1.0 };
    Some((first / sum, second / sum, multiplier))
}

/// Fill a missing component from the other color.
fn carry(first: f64, second: f64) -> (f64, f64) {
    match (first.is_nan(), second.is_nan()) {
        (true, false) => (second, second),
        (false, true) => (first, first),
        _ => (first, second),
    }
}

/// Mix two colors with the given weights (summing to 1).
///
/// Interpolation uses premultiplied alpha; hues follow the arc of
/// `method`. Results in `hsl` and `hwb` are converted to sRGB.
pub fn mix_colors(
    first: &ColorData,
    second: &ColorData,
    weights: (f64, f64),
    method: Interpolation,
) -> Option<ColorData> {
    let (weight_a, weight_b) = weights;
    let color_a = first.to_space(method.space);
    let color_b = second.to_space(method.space);
    let (alpha_a, alpha_b) = carry(color_a.alpha, color_b.alpha);
    let alpha = if alpha_a.is_nan() {
        f64::NAN
    } else {
        alpha_a * weight_a + alpha_b * weight_b
    };
    let premultiply_a = if alpha_a.is_nan() { 1.0 } else { alpha_a };
    let premultiply_b = if alpha_b.is_nan() { 1.0 } else { alpha_b };
    let hue_index = method.space.hue_index();

    let mut channels = [0.0; 3];
    for (index, channel) in channels.iter_mut().enumerate() {
        let (value_a, value_b) = carry(color_a.channels[index], color_b.channels[index]);
        if value_a.is_nan() {
            *channel = f64::NAN;
        } else if hue_index == Some(index) {
            let (hue_a, hue_b) = interpolate_hue(
                value_a.rem_euclid(360.0),
                value_b.rem_euclid(360.0),
                method.arc,
            )
            .ok()?;
            *channel = (hue_a * weight_a + hue_b * weight_b).rem_euclid(360.0);
        } else {
            let mixed = value_a * premultiply_a * weight_a + value_b * premultiply_b * weight_b;
            *channel = if alpha.is_nan() || alpha == 0.0 {
                value_a * weight_a + value_b * weight_b
            } else {
                mixed / alpha
            };
        }
    }

    let mut mixed = ColorData::new(method.space, channels, alpha);
    mixed.predefined = !method.space.is_cie();
    if matches!(method.space, ColorSpace::Hsl | ColorSpace::Hwb) {
        mixed = mixed.to_space(ColorSpace::Srgb);
    }
    Some(mixed)
}

impl ColorResolver {
    /// Split one `<color> [<percentage>]` argument.
    fn mix_argument(&mut self, argument: &str) -> Option<(String, Option<f64>)> {
        let words = self.split_value(argument, SplitOptions::new(Delimiter::Space));
        let (color, percentage) = match words.as_slice() {
            [color] => (color.clone(), None),
            [first, second] => match (parse_percentage(first), parse_percentage(second)) {
                (Some(percentage), None) => (second.clone(), Some(percentage)),
                (None, Some(percentage)) => (first.clone(), Some(percentage)),
                _ => return None,
            },
            _ => return None,
        };
        Some((color, percentage))
    }

    /// Resolve `color-mix()` to color data.
    pub(crate) fn resolve_color_mix(&mut self, value: &str, opts: &ResolveOptions) -> Option<ColorData> {
        let inner = value
            .trim()
            .strip_prefix("color-mix(")?
            .strip_suffix(')')?;
        let arguments = self.split_value(inner, SplitOptions::new(Delimiter::Comma));
        let [method, first, second] = arguments.as_slice() else {
            debug!("[MIX] expected three arguments in {value}");
            return None;
        };
        let words = self.split_value(method, SplitOptions::new(Delimiter::Space));
        let method = Interpolation::parse(&words)?;
        let (first, weight_a) = self.mix_argument(first)?;
        let (second, weight_b) = self.mix_argument(second)?;
        let (weight_a, weight_b, multiplier) = normalize_weights(weight_a, weight_b)?;
        let color_a = self.resolve_color_data(&first, opts)?;
        let color_b = self.resolve_color_data(&second, opts)?;
        let mut mixed = mix_colors(&color_a, &color_b, (weight_a, weight_b), method)?;
        if !mixed.alpha.is_nan() {
            mixed.alpha *= multiplier;
        }
        Some(mixed)
    }
}
