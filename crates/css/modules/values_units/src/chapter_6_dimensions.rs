//! CSS Values & Units Level 4 — §6 Distance and angle units
//! Spec: <https://www.w3.org/TR/css-values-4/#lengths>

use crate::chapter_4_numbers::format_number;
use crate::options::ResolveOptions;
use css_syntax::{Token, TokenKind};

/// Pixels per absolute length unit (§6.2).
fn absolute_px(unit: &str) -> Option<f64> {
    match unit {
        "px" => Some(1.0),
        "in" => Some(96.0),
        "cm" => Some(96.0 / 2.54),
        "mm" => Some(96.0 / 25.4),
        "q" => Some(96.0 / 101.6),
        "pt" => Some(96.0 / 72.0),
        "pc" => Some(16.0),
        _ => None,
    }
}

/// Resolve `value` in `unit` to pixels.
///
/// Absolute units convert directly; any other unit is looked up in the
/// caller's dimension table and then its callback.
pub fn resolve_dimension(value: f64, unit: &str, opts: &ResolveOptions) -> Option<f64> {
    let unit = unit.to_ascii_lowercase();
    let px = absolute_px(&unit).or_else(|| opts.lookup_dimension(&unit))?;
    let resolved = value * px;
    resolved.is_finite().then_some(resolved)
}

/// Resolve a dimension token to `<n>px` text.
pub fn resolve_dimension_token(token: &Token, opts: &ResolveOptions) -> Option<String> {
    if token.kind != TokenKind::Dimension {
        return None;
    }
    let px = resolve_dimension(token.value()?, token.unit()?, opts)?;
    Some(format!("{}px", format_number(px)))
}

/// Convert an `<angle>` to degrees (§6.3).
pub fn angle_to_degrees(value: f64, unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "deg" => Some(value),
        "grad" => Some(value * 360.0 / 400.0),
        "rad" => Some(value.to_degrees()),
        "turn" => Some(value * 360.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_syntax::tokenize;

    #[test]
    fn absolute_units_need_no_table() {
        let opts = ResolveOptions::default();
        assert_eq!(resolve_dimension(2.0, "px", &opts), Some(2.0));
        assert_eq!(resolve_dimension(1.0, "in", &opts), Some(96.0));
        assert_eq!(resolve_dimension(3.0, "pc", &opts), Some(48.0));
        assert_eq!(resolve_dimension(1.0, "em", &opts), None);
    }

    #[test]
    fn relative_units_use_table_then_callback() {
        let opts = ResolveOptions::default()
            .with_dimension("em", 16.0)
            .with_dimension_callback(|unit| (unit == "vw").then_some(12.0));
        assert_eq!(resolve_dimension(2.0, "em", &opts), Some(32.0));
        assert_eq!(resolve_dimension(0.5, "VW", &opts), Some(6.0));
        assert_eq!(resolve_dimension(1.0, "vh", &opts), None);
    }

    #[test]
    fn dimension_tokens_resolve_to_px_text() {
        let opts = ResolveOptions::default().with_dimension("rem", 10.0);
        let token = tokenize("1.5rem").next().unwrap();
        assert_eq!(resolve_dimension_token(&token, &opts).as_deref(), Some("15px"));
        let number = tokenize("3").next().unwrap();
        assert_eq!(resolve_dimension_token(&number, &opts), None);
    }

    #[test]
    fn angles_convert_to_degrees() {
        assert_eq!(angle_to_degrees(0.5, "turn"), Some(180.0));
        assert_eq!(angle_to_degrees(100.0, "grad"), Some(90.0));
        assert_eq!(angle_to_degrees(1.0, "px"), None);
    }
}
