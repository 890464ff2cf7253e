//! CSS Color Module Level 4 — §4.1 `<color>` syntax
//! Spec: <https://www.w3.org/TR/css-color-4/#color-syntax>
//!
//! Absolute colors are parsed into [`ColorData`]: channels in the color's own
//! space plus alpha. Missing components (`none`) are kept as NaN so that
//! mixing can carry them forward.

use crate::space::{ColorSpace, convert};
use csscolorparser::Color;
use css_syntax::{TokenKind, TokenQueue, Tokenize};
use css_values_units::{
    Bindings, Quantity, QuantityUnit, ResolveOptions, angle_to_degrees, evaluate_function,
    is_math_function, take_block,
};
use log::trace;

/// A color in its own color space.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorData {
    pub space: ColorSpace,
    /// NaN marks a missing component.
    pub channels: [f64; 3],
    /// NaN marks a missing alpha.
    pub alpha: f64,
    /// Serialized with `color()` rather than a legacy or CIE function.
    pub predefined: bool,
}

impl ColorData {
    #[inline]
    pub const fn new(space: ColorSpace, channels: [f64; 3], alpha: f64) -> Self {
        Self {
            space,
            channels,
            alpha,
            predefined: false,
        }
    }

    /// Transparent black.
    #[inline]
    pub const fn transparent() -> Self {
        Self::new(ColorSpace::Srgb, [0.0; 3], 0.0)
    }

    /// Whether any component is missing.
    pub fn has_none(&self) -> bool {
        self.alpha.is_nan() || self.channels.iter().any(|channel| channel.is_nan())
    }

    /// Channels with missing components resolved to zero.
    pub fn resolved_channels(&self) -> [f64; 3] {
        self.channels
            .map(|channel| if channel.is_nan() { 0.0 } else { channel })
    }

    /// Alpha with a missing value resolved to zero.
    #[inline]
    pub fn resolved_alpha(&self) -> f64 {
        if self.alpha.is_nan() { 0.0 } else { self.alpha }
    }

    /// The same color in `space`. Missing components survive only when the
    /// space does not change.
    #[must_use]
    pub fn to_space(&self, space: ColorSpace) -> Self {
        if space == self.space {
            return self.clone();
        }
        Self {
            space,
            channels: convert(self.resolved_channels(), self.space, space),
            alpha: self.alpha,
            predefined: self.predefined,
        }
    }

    /// 8-bit sRGB channels, gamut clipped.
    pub fn to_rgb8(&self) -> [u8; 3] {
        self.to_space(ColorSpace::Srgb)
            .resolved_channels()
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Functional notation a color was written in. Decides how percentages and
/// channel keywords map onto the channels of the underlying space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    Rgb,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
    /// `color(<space> …)`.
    Color(ColorSpace),
}

impl Notation {
    /// Notation of a color function other than `color()`.
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "rgb" | "rgba" => Some(Self::Rgb),
            "hsl" | "hsla" => Some(Self::Hsl),
            "hwb" => Some(Self::Hwb),
            "lab" => Some(Self::Lab),
            "lch" => Some(Self::Lch),
            "oklab" => Some(Self::Oklab),
            "oklch" => Some(Self::Oklch),
            _ => None,
        }
    }

    /// Notation of `color()` with the given space name.
    pub fn from_predefined(name: &str) -> Option<Self> {
        ColorSpace::from_name(name)
            .filter(|space| space.is_predefined())
            .map(Self::Color)
    }

    pub const fn space(self) -> ColorSpace {
        match self {
            Self::Rgb => ColorSpace::Srgb,
            Self::Hsl => ColorSpace::Hsl,
            Self::Hwb => ColorSpace::Hwb,
            Self::Lab => ColorSpace::Lab,
            Self::Lch => ColorSpace::Lch,
            Self::Oklab => ColorSpace::Oklab,
            Self::Oklch => ColorSpace::Oklch,
            Self::Color(space) => space,
        }
    }

    /// Channel value of `component` at `index`, or `None` when the
    /// component type is not allowed there.
    fn channel_value(self, index: usize, component: Component) -> Option<f64> {
        let is_hue = self.space().hue_index() == Some(index);
        match component {
            Component::None => Some(f64::NAN),
            Component::Angle(degrees) => is_hue.then_some(degrees),
            Component::Number(number) => Some(match self {
                Self::Rgb => number / 255.0,
                Self::Hsl
                | Self::Hwb
                | Self::Lab
                | Self::Lch
                | Self::Oklab
                | Self::Oklch
                | Self::Color(_) => number,
            }),
            Component::Percent(percent) => {
                if is_hue {
                    return None;
                }
                let reference = match (self, index) {
                    (Self::Rgb | Self::Color(_), _) | (Self::Oklab | Self::Oklch, 0) => 1.0,
                    (Self::Hsl | Self::Hwb, _) | (Self::Lab | Self::Lch, 0) => 100.0,
                    (Self::Lab, _) => 125.0,
                    (Self::Lch, _) => 150.0,
                    (Self::Oklab | Self::Oklch, _) => 0.4,
                };
                Some(percent / 100.0 * reference)
            }
        }
    }

    /// Channel keywords of `color` for relative color syntax, in the
    /// notation's reference ranges.
    pub fn bindings(self, color: &ColorData) -> Bindings {
        let mut bindings = Bindings::new();
        let names = self.space().channel_names();
        for (name, channel) in names.iter().zip(color.resolved_channels()) {
            let value = if self == Self::Rgb {
                channel * 255.0
            } else {
                channel
            };
            bindings.insert((*name).to_owned(), value);
        }
        bindings.insert("alpha".to_owned(), color.resolved_alpha());
        bindings
    }

    /// Build a color from parsed components.
    pub fn build(self, list: &ComponentList) -> Option<ColorData> {
        let [first, second, third] = list.channels.as_slice() else {
            return None;
        };
        let channels = [
            self.channel_value(0, *first)?,
            self.channel_value(1, *second)?,
            self.channel_value(2, *third)?,
        ];
        let alpha = match list.alpha {
            None => 1.0,
            Some(Component::None) => f64::NAN,
            Some(Component::Number(number)) => number.clamp(0.0, 1.0),
            Some(Component::Percent(percent)) => (percent / 100.0).clamp(0.0, 1.0),
            Some(Component::Angle(_)) => return None,
        };
        let mut color = ColorData::new(self.space(), channels, alpha);
        color.predefined = matches!(self, Self::Color(_));
        Some(color)
    }
}

/// One channel or alpha value as written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Component {
    Number(f64),
    /// The number before `%`.
    Percent(f64),
    /// Degrees.
    Angle(f64),
    None,
}

impl Component {
    fn from_quantity(quantity: &Quantity) -> Option<Self> {
        match &quantity.unit {
            QuantityUnit::Number => Some(Self::Number(quantity.value)),
            QuantityUnit::Percent => Some(Self::Percent(quantity.value)),
            QuantityUnit::Dimension(unit) => {
                angle_to_degrees(quantity.value, unit).map(Self::Angle)
            }
        }
    }
}

/// Components of a color function, split at `/`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentList {
    pub channels: Vec<Component>,
    pub alpha: Option<Component>,
}

/// Read components up to the `)` closing the color function.
///
/// Identifiers resolve through `bindings`, math functions are evaluated.
/// Legacy comma-separated lists are accepted, with a fourth value taken as
/// alpha.
pub fn read_components(
    queue: &mut TokenQueue,
    opts: &ResolveOptions,
    bindings: &Bindings,
) -> Option<ComponentList> {
    let mut list = ComponentList::default();
    let mut legacy = false;
    let mut after_slash = false;
    while let Some(token) = queue.next() {
        let component = match token.kind {
            TokenKind::Whitespace | TokenKind::Comment => continue,
            TokenKind::ParenClose | TokenKind::EndOfInput => break,
            TokenKind::Comma => {
                legacy = true;
                continue;
            }
            TokenKind::Delim if token.text == "/" && !after_slash => {
                after_slash = true;
                continue;
            }
            TokenKind::Number => Component::Number(token.value()?),
            TokenKind::Percentage => Component::Percent(token.value()?),
            TokenKind::Dimension => {
                Component::Angle(angle_to_degrees(token.value()?, token.unit()?)?)
            }
            TokenKind::Ident => {
                let name = token.text.to_ascii_lowercase();
                if name == "none" {
                    Component::None
                } else {
                    Component::Number(*bindings.get(&name)?)
                }
            }
            TokenKind::Function => {
                let name = token.function_name()?;
                if !is_math_function(&name) {
                    return None;
                }
                let block = take_block(queue);
                let quantity = evaluate_function(&name, &block, opts, bindings)?;
                Component::from_quantity(&quantity)?
            }
            TokenKind::ParenOpen
            | TokenKind::Delim
            | TokenKind::Hash
            | TokenKind::Str
            | TokenKind::Other => return None,
        };
        if after_slash {
            if list.alpha.is_some() {
                return None;
            }
            list.alpha = Some(component);
        } else {
            list.channels.push(component);
        }
    }
    if legacy && list.alpha.is_none() && list.channels.len() == 4 {
        list.alpha = list.channels.pop();
    }
    Some(list)
}

fn parse_hex(digits: &str) -> Option<ColorData> {
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|digit| [digit, digit]).collect(),
        6 | 8 => digits.to_owned(),
        _ => return None,
    };
    let mut bytes = Vec::with_capacity(4);
    for start in (0..expanded.len()).step_by(2) {
        let pair = expanded.get(start..start + 2)?;
        bytes.push(f64::from(u8::from_str_radix(pair, 16).ok()?) / 255.0);
    }
    let &[red, green, blue, ref rest @ ..] = bytes.as_slice() else {
        return None;
    };
    let alpha = rest.first().copied().unwrap_or(1.0);
    Some(ColorData::new(ColorSpace::Srgb, [red, green, blue], alpha))
}

/// Whether `name` is a named color or `transparent`.
pub fn is_named_color(name: &str) -> bool {
    name.bytes().all(|byte| byte.is_ascii_alphabetic()) && name.parse::<Color>().is_ok()
}

fn parse_named(name: &str) -> Option<ColorData> {
    if !name.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return None;
    }
    let parsed: Color = name.parse().ok()?;
    let [red, green, blue, alpha] = parsed.to_rgba8().map(|byte| f64::from(byte) / 255.0);
    Some(ColorData::new(ColorSpace::Srgb, [red, green, blue], alpha))
}

/// Parse an absolute color: a named color, a hex color or a color function
/// without `var()`, relative syntax or `color-mix()`.
pub fn parse_color(tokenizer: &dyn Tokenize, value: &str, opts: &ResolveOptions) -> Option<ColorData> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(digits) = value.strip_prefix('#') {
        return parse_hex(digits);
    }
    if let Some(named) = parse_named(&value) {
        return Some(named);
    }
    let mut queue = tokenizer.tokenize(&value);
    queue.skip_whitespace();
    let head = queue.next()?;
    let name = head.function_name()?;
    let notation = if name == "color" {
        queue.skip_whitespace();
        let space = queue.next()?;
        if space.kind != TokenKind::Ident {
            return None;
        }
        Notation::from_predefined(&space.text)?
    } else {
        Notation::from_function(&name)?
    };
    let list = read_components(&mut queue, opts, &Bindings::new())?;
    queue.skip_whitespace();
    if queue
        .peek()
        .is_some_and(|token| token.kind != TokenKind::EndOfInput)
    {
        trace!("[COLOR] trailing input after {name}()");
        return None;
    }
    notation.build(&list)
}
