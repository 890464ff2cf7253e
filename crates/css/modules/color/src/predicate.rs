//! CSS Color Module Level 4 — `<color>` recognition
//! Spec: <https://www.w3.org/TR/css-color-4/#typedef-color>

use crate::grammar::{has_color_function_prefix, is_absolute_color, is_color_mix_syntax};
use crate::parse::is_named_color;
use crate::resolver::ColorResolver;
use css_values_units::{ResolveOptions, ValueFormat};

impl ColorResolver {
    /// Whether `value` is a color.
    ///
    /// Keywords are checked against the named colors, then the absolute
    /// color and `color-mix()` grammars are tried. Anything else that
    /// starts like a color function is resolved in specified form.
    pub fn is_color(&mut self, value: &str, opts: &ResolveOptions) -> bool {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return false;
        }
        if value.bytes().all(|byte| byte.is_ascii_alphabetic()) {
            return value == "currentcolor" || value == "transparent" || is_named_color(&value);
        }
        if is_absolute_color(&value) || is_color_mix_syntax(&value) {
            return true;
        }
        if !has_color_function_prefix(&value) {
            return false;
        }
        let specified = opts
            .clone()
            .with_format(ValueFormat::Specified)
            .with_nullable(true);
        self.resolve_color(&value, &specified)
            .is_some_and(|resolved| !resolved.is_empty())
    }
}
