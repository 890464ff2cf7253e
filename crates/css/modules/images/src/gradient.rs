//! CSS Images Module Level 3 — §3 Gradients
//! Spec: <https://www.w3.org/TR/css-images-3/#gradients>
//! Spec: <https://www.w3.org/TR/css-images-4/#conic-gradients>

use crate::grammar::{is_color_hint, is_gradient_line, is_stop_sequence, split_stop_positions};
use core::fmt;
use css_color::ColorResolver;
use css_syntax::{Delimiter, SplitOptions};
use css_values_units::grammar::{compile_regex, is_match};
use css_values_units::{ResolveOptions, ValueFormat};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use value_cache::{KeyData, create_cache_key};

const NAMESPACE: &str = "css-gradient";

static REG_GRADIENT_TYPE: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(r"^(repeating-)?(conic|linear|radial)-gradient\("));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

/// A gradient function: its kind and whether it repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GradientType {
    pub kind: GradientKind,
    pub repeating: bool,
}

impl GradientType {
    /// Look up a function name such as `repeating-linear-gradient`.
    pub fn from_name(name: &str) -> Option<Self> {
        let (repeating, rest) = name
            .strip_prefix("repeating-")
            .map_or((false, name), |rest| (true, rest));
        let kind = match rest {
            "linear-gradient" => GradientKind::Linear,
            "radial-gradient" => GradientKind::Radial,
            "conic-gradient" => GradientKind::Conic,
            _ => return None,
        };
        Some(Self { kind, repeating })
    }

    /// The function name.
    pub const fn as_str(self) -> &'static str {
        match (self.kind, self.repeating) {
            (GradientKind::Linear, false) => "linear-gradient",
            (GradientKind::Linear, true) => "repeating-linear-gradient",
            (GradientKind::Radial, false) => "radial-gradient",
            (GradientKind::Radial, true) => "repeating-radial-gradient",
            (GradientKind::Conic, false) => "conic-gradient",
            (GradientKind::Conic, true) => "repeating-conic-gradient",
        }
    }
}

impl fmt::Display for GradientType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for GradientType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A parsed gradient.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// The trimmed, lower-cased source text.
    pub value: String,
    #[serde(rename = "type")]
    pub gradient_type: GradientType,
    /// Everything before the first color stop, when present.
    pub gradient_line: Option<String>,
    /// Color stops and hints in source order.
    pub color_stop_list: Vec<String>,
}

/// The gradient function `value` starts with.
pub fn get_gradient_type(value: &str) -> Option<GradientType> {
    let captures = REG_GRADIENT_TYPE.as_ref()?.captures(value.trim())?;
    let name = captures.get(0)?.as_str().strip_suffix('(')?;
    GradientType::from_name(name)
}

/// Whether `value` is a valid gradient line for `gradient_type`.
#[inline]
pub fn validate_gradient_line(value: &str, gradient_type: GradientType) -> bool {
    is_gradient_line(value.trim(), gradient_type.kind)
}

/// A stop whose positions have been stripped is a color.
fn is_color_stop(
    resolver: &mut ColorResolver,
    value: &str,
    kind: GradientKind,
    opts: &ResolveOptions,
) -> bool {
    let (color, _) = split_stop_positions(value, kind);
    resolver.is_color(color, opts)
}

/// Whether `list` is a valid color-stop list for `gradient_type`.
///
/// Each entry is a hint or a color with up to two positions. Hints may only
/// sit between two colors and never follow each other.
pub fn validate_color_stop_list(
    resolver: &mut ColorResolver,
    list: &[String],
    gradient_type: GradientType,
    opts: &ResolveOptions,
) -> bool {
    if list.len() < 2 {
        return false;
    }
    let mut classes = Vec::with_capacity(list.len());
    for entry in list {
        if is_color_hint(entry, gradient_type.kind) {
            classes.push("hint");
        } else if is_color_stop(resolver, entry, gradient_type.kind, opts) {
            classes.push("color");
        } else {
            debug!("[GRADIENT] {entry} is neither a color stop nor a hint");
            return false;
        }
    }
    is_stop_sequence(&classes.join(","))
}

/// Parse a gradient function.
///
/// Results, failures included, are cached.
pub fn parse_gradient(
    resolver: &mut ColorResolver,
    value: &str,
    opts: &ResolveOptions,
) -> Option<Gradient> {
    let value = value.trim().to_ascii_lowercase();
    let gradient_type = get_gradient_type(&value)?;
    let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "parseGradient", &value), opts);
    if let Some(cached) = resolver.value_cache_mut().get(cache_key.as_ref()) {
        return cached.item::<Gradient>().cloned();
    }
    let mark = resolver.value_cache().truncation_mark();
    let gradient = parse_gradient_uncached(resolver, &value, gradient_type, opts);
    resolver
        .value_cache_mut()
        .set_since(mark, cache_key.as_ref(), gradient.clone());
    gradient
}

fn parse_gradient_uncached(
    resolver: &mut ColorResolver,
    value: &str,
    gradient_type: GradientType,
    opts: &ResolveOptions,
) -> Option<Gradient> {
    let inner = value
        .strip_prefix(gradient_type.as_str())?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut segments = resolver.split_value(inner, SplitOptions::new(Delimiter::Comma));
    let first = segments.first()?;
    let gradient_line = if is_color_stop(resolver, first, gradient_type.kind, opts) {
        None
    } else {
        let line = segments.remove(0);
        if segments.len() < 2 || !validate_gradient_line(&line, gradient_type) {
            debug!("[GRADIENT] invalid gradient line {line} in {value}");
            return None;
        }
        Some(line)
    };
    if !validate_color_stop_list(resolver, &segments, gradient_type, opts) {
        return None;
    }
    Some(Gradient {
        value: value.to_owned(),
        gradient_type,
        gradient_line,
        color_stop_list: segments,
    })
}

/// Whether `value` parses as a gradient.
#[inline]
pub fn is_gradient(resolver: &mut ColorResolver, value: &str, opts: &ResolveOptions) -> bool {
    parse_gradient(resolver, value, opts).is_some()
}

/// Words of a gradient line without the parts that only restate defaults.
fn drop_default_line_parts(line: &str, kind: GradientKind) -> String {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let (head, position) = words
        .iter()
        .position(|word| *word == "at")
        .map_or((words.as_slice(), None), |index| {
            let (head, tail) = words.split_at(index);
            (head, tail.get(1..))
        });
    let mut kept = Vec::new();
    match kind {
        GradientKind::Linear => {
            if head != ["to", "bottom"] {
                kept.extend_from_slice(head);
            }
        }
        GradientKind::Radial => kept.extend(
            head.iter()
                .filter(|word| !matches!(**word, "ellipse" | "farthest-corner")),
        ),
        GradientKind::Conic => kept.extend_from_slice(head),
    }
    if let Some(position) = position
        && position != ["center"]
        && position != ["center", "center"]
    {
        kept.push("at");
        kept.extend_from_slice(position);
    }
    kept.join(" ")
}

/// Drop the default parts of a gradient line; an interpolation clause
/// moves to the end.
fn resolve_gradient_line(line: &str, kind: GradientKind) -> String {
    match line.find(" in ").or_else(|| line.starts_with("in ").then_some(0)) {
        Some(index) => {
            let (shape, method) = line.split_at(index);
            let method = method.trim();
            let (method, rest) = split_interpolation(method);
            let resolved = drop_default_line_parts(&format!("{shape} {rest}"), kind);
            if resolved.is_empty() {
                method.to_owned()
            } else {
                format!("{resolved} {method}")
            }
        }
        None => drop_default_line_parts(line, kind),
    }
}

/// Split `in <space> [<arc> hue]? <rest>` into the clause and the rest.
fn split_interpolation(text: &str) -> (String, String) {
    let words = text.split_whitespace().collect::<Vec<_>>();
    let clause_len = if words.get(3) == Some(&"hue") { 4 } else { 2 };
    let clause_len = clause_len.min(words.len());
    let (clause, rest) = words.split_at(clause_len);
    (clause.join(" "), rest.join(" "))
}

/// Resolve every color of a gradient in the format of `opts`.
///
/// In computed format the default parts of the gradient line are dropped.
/// `None` when the gradient is invalid or a stop color does not resolve.
pub fn resolve_gradient(
    resolver: &mut ColorResolver,
    value: &str,
    opts: &ResolveOptions,
) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();
    let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "resolveGradient", &value), opts);
    if let Some(cached) = resolver.value_cache_mut().get(cache_key.as_ref()) {
        return cached.item::<String>().cloned();
    }
    let mark = resolver.value_cache().truncation_mark();
    let resolved = resolve_gradient_uncached(resolver, &value, opts);
    resolver
        .value_cache_mut()
        .set_since(mark, cache_key.as_ref(), resolved.clone());
    resolved
}

fn resolve_gradient_uncached(
    resolver: &mut ColorResolver,
    value: &str,
    opts: &ResolveOptions,
) -> Option<String> {
    let Gradient {
        gradient_type,
        gradient_line,
        color_stop_list,
        ..
    } = parse_gradient(resolver, value, opts)?;
    let kind = gradient_type.kind;
    let mut parts = Vec::with_capacity(color_stop_list.len() + 1);
    if let Some(line) = gradient_line {
        let line = if opts.format == ValueFormat::Computed {
            resolve_gradient_line(&line, kind)
        } else {
            line.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        if !line.is_empty() {
            parts.push(line);
        }
    }
    for stop in &color_stop_list {
        if is_color_hint(stop, kind) {
            parts.push(stop.clone());
            continue;
        }
        let (color, positions) = split_stop_positions(stop, kind);
        let Some(color) = resolver.resolve_color(color, opts) else {
            debug!("[GRADIENT] color stop {stop} did not resolve");
            return None;
        };
        if positions.is_empty() {
            parts.push(color);
        } else {
            parts.push(format!("{color} {positions}"));
        }
    }
    Some(format!("{gradient_type}({})", parts.join(", ")))
}

/// Whether `value` starts like a gradient function.
#[inline]
pub fn has_gradient_prefix(value: &str) -> bool {
    is_match(REG_GRADIENT_TYPE.as_ref(), value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().copied().map(str::to_owned).collect()
    }

    const LINEAR: GradientType = GradientType {
        kind: GradientKind::Linear,
        repeating: false,
    };
    const CONIC: GradientType = GradientType {
        kind: GradientKind::Conic,
        repeating: false,
    };

    #[test]
    fn gradient_types() {
        assert_eq!(
            get_gradient_type("radial-gradient(circle, red, blue)").map(GradientType::as_str),
            Some("radial-gradient")
        );
        assert_eq!(
            get_gradient_type("  repeating-conic-gradient(red, blue)").map(GradientType::as_str),
            Some("repeating-conic-gradient")
        );
        assert_eq!(get_gradient_type("not-a-gradient(...)"), None);
        assert_eq!(get_gradient_type("linear-gradient"), None);
        assert!(has_gradient_prefix("linear-gradient(red, blue)"));
    }

    #[test]
    fn color_stop_lists() {
        let mut resolver = ColorResolver::default();
        let opts = ResolveOptions::default();
        let mut check = |list: &[&str], gradient_type| {
            validate_color_stop_list(&mut resolver, &strings(list), gradient_type, &opts)
        };
        assert!(check(&["red", "10px", "blue"], LINEAR));
        assert!(!check(&["10px", "red", "blue"], LINEAR));
        assert!(!check(&["red", "10px", "20px", "blue"], LINEAR));
        assert!(check(&["red 10px 20px", "blue"], LINEAR));
        assert!(!check(&["red"], LINEAR));
        assert!(!check(&["red", "foo", "blue"], LINEAR));
        assert!(check(&["red 0deg", "25%", "blue 90deg"], CONIC));
        assert!(!check(&["red", "10px", "blue"], CONIC));
    }

    #[test]
    fn default_line_parts() {
        assert_eq!(resolve_gradient_line("to bottom", GradientKind::Linear), "");
        assert_eq!(resolve_gradient_line("to right", GradientKind::Linear), "to right");
        assert_eq!(
            resolve_gradient_line("ellipse farthest-corner at center", GradientKind::Radial),
            ""
        );
        assert_eq!(
            resolve_gradient_line("circle farthest-corner at left top", GradientKind::Radial),
            "circle at left top"
        );
        assert_eq!(
            resolve_gradient_line("from 90deg at center", GradientKind::Conic),
            "from 90deg"
        );
        assert_eq!(
            resolve_gradient_line("to bottom in oklch longer hue", GradientKind::Linear),
            "in oklch longer hue"
        );
        assert_eq!(
            resolve_gradient_line("in srgb circle at 10px 20px", GradientKind::Radial),
            "circle at 10px 20px in srgb"
        );
    }
}
