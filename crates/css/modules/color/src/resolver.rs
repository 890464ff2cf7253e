//! Color value resolution.
//!
//! [`ColorResolver`] owns the value cache and the tokenizer shared by every
//! resolver stage, and supplies the services `var()` resolution needs.

use crate::grammar::is_relative_color;
use crate::parse::{ColorData, parse_color};
use crate::serialize::{TRANSPARENT_RGBA, normalize_legacy_prefix, serialize_computed, to_hex};
use core::fmt;
use css_syntax::{CssTokenizer, SplitOptions, Token, TokenQueue, Tokenize, split_value};
use css_values_units::{ResolveOptions, ValueFormat, css_calc, serialize_tokens};
use css_variables::{VarContext, contains_var, css_var, resolve_var};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use value_cache::{DEFAULT_CAPACITY, KeyData, ValueCache, create_cache_key};

const NAMESPACE: &str = "resolve";
const DEFAULT_MAX_DEPTH: usize = 32;

/// Construction parameters of a [`ColorResolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Entries kept by the value cache.
    pub cache_capacity: usize,
    /// Nesting limit for `var()` substitution and nested relative colors.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Resolves color values, custom properties and math functions.
pub struct ColorResolver {
    cache: ValueCache,
    tokenizer: Box<dyn Tokenize>,
    depth: usize,
    max_depth: usize,
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ColorResolver")
            .field("cache", &self.cache)
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl ColorResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_tokenizer(config, Box::new(CssTokenizer))
    }

    /// A resolver that tokenizes through `tokenizer`.
    pub fn with_tokenizer(config: ResolverConfig, tokenizer: Box<dyn Tokenize>) -> Self {
        Self {
            cache: ValueCache::new(config.cache_capacity),
            tokenizer,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    #[inline]
    pub const fn value_cache(&self) -> &ValueCache {
        &self.cache
    }

    #[inline]
    pub fn value_cache_mut(&mut self) -> &mut ValueCache {
        &mut self.cache
    }

    #[inline]
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[inline]
    pub fn tokenizer(&self) -> &dyn Tokenize {
        self.tokenizer.as_ref()
    }

    /// Canonical text of `value`: whitespace collapsed, comments dropped.
    pub(crate) fn canonical_text(&self, value: &str) -> String {
        let tokens: Vec<Token> = self.tokenizer.tokenize(value).collect();
        serialize_tokens(&tokens)
    }

    /// Split `value` at top-level delimiters.
    pub fn split_value(&mut self, value: &str, opts: SplitOptions) -> Vec<String> {
        split_value(&mut self.cache, self.tokenizer.as_ref(), value, opts)
    }

    /// Substitute every `var()` in `value`. `None` when a reference cannot
    /// be resolved.
    pub fn resolve_var(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        resolve_var(self, value, opts)
    }

    /// [`Self::resolve_var`] with failure mapped to the empty string.
    pub fn css_var(&mut self, value: &str, opts: &ResolveOptions) -> String {
        css_var(self, value, opts)
    }

    /// Evaluate math functions in `value`, substituting `var()` first.
    /// Returns the empty string when a reference cannot be resolved.
    pub fn css_calc(&mut self, value: &str, opts: &ResolveOptions) -> String {
        if contains_var(value) {
            if opts.format == ValueFormat::Specified {
                return value.trim().to_owned();
            }
            let Some(substituted) = self.resolve_var(value, opts) else {
                return String::new();
            };
            return css_calc(&mut self.cache, self.tokenizer.as_ref(), &substituted, opts);
        }
        css_calc(&mut self.cache, self.tokenizer.as_ref(), value, opts)
    }

    /// Resolve a color value in the requested format.
    ///
    /// Returns `None` when the value is not a color, when a hex format is
    /// requested for a color without a hex form, and when `var()` cannot be
    /// resolved and the options are nullable. Otherwise an unresolvable
    /// `var()` computes to transparent black.
    pub fn resolve_color(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        let value = value.trim();
        let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "resolveColor", value), opts);
        if let Some(cached) = self.cache.get(cache_key.as_ref()) {
            return cached.item::<String>().cloned();
        }
        let mark = self.cache.truncation_mark();
        let resolved = self.resolve_color_uncached(value, opts);
        self.cache.set_since(mark, cache_key.as_ref(), resolved.clone());
        resolved
    }

    /// [`Self::resolve_color`] with nullable turned off, so that an
    /// unresolvable `var()` computes to transparent black.
    pub fn resolve(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        if opts.nullable {
            let strict = opts.clone().with_nullable(false);
            return self.resolve_color(value, &strict);
        }
        self.resolve_color(value, opts)
    }

    fn resolve_color_uncached(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        let format = opts.format;
        let mut value = value.to_owned();
        if contains_var(&value) {
            if format == ValueFormat::Specified {
                return Some(value);
            }
            match self.resolve_var(&value, opts) {
                Some(substituted) => value = substituted,
                None => {
                    debug!("[COLOR] unresolved var() in {value}");
                    return (!format.is_hex() && !opts.nullable).then(|| TRANSPARENT_RGBA.to_owned());
                }
            }
        }
        let mut value = value.to_ascii_lowercase();
        if is_relative_color(&value) {
            let resolved = self.resolve_relative_color(&value, opts).unwrap_or_else(|err| {
                warn!("[COLOR] {err}");
                None
            });
            match format {
                ValueFormat::Computed => {
                    return resolved
                        .or_else(|| (!opts.nullable).then(|| TRANSPARENT_RGBA.to_owned()));
                }
                ValueFormat::Specified => return resolved,
                ValueFormat::Hex | ValueFormat::HexAlpha => value = resolved?,
            }
        }
        match value.as_str() {
            "transparent" => {
                return match format {
                    ValueFormat::Specified => Some("transparent".to_owned()),
                    ValueFormat::Hex => None,
                    ValueFormat::HexAlpha => Some("#00000000".to_owned()),
                    ValueFormat::Computed => Some(TRANSPARENT_RGBA.to_owned()),
                };
            }
            "currentcolor" => {
                if format == ValueFormat::Specified {
                    return Some("currentcolor".to_owned());
                }
                let Some(current) = opts.current_color.clone() else {
                    return (format == ValueFormat::Computed).then(|| TRANSPARENT_RGBA.to_owned());
                };
                let inner = ResolveOptions {
                    current_color: None,
                    ..opts.clone()
                };
                return self.resolve_color(&current, &inner);
            }
            _ => {}
        }
        if format == ValueFormat::Specified {
            return self.resolve_specified(&value, opts);
        }
        let color = self.resolve_color_data(&value, opts)?;
        match format {
            ValueFormat::Hex => to_hex(&color, false),
            ValueFormat::HexAlpha => to_hex(&color, true),
            ValueFormat::Computed | ValueFormat::Specified => Some(serialize_computed(&color)),
        }
    }

    /// Validate `value` and return its normalized specified text.
    fn resolve_specified(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        if value.starts_with("color-mix(") {
            let computed = opts.clone().with_format(ValueFormat::Computed);
            self.resolve_color_mix(value, &computed)?;
        } else {
            parse_color(self.tokenizer.as_ref(), value, opts)?;
        }
        Some(normalize_legacy_prefix(&self.canonical_text(value)))
    }

    /// Resolve `value` to color data with computed-value semantics.
    pub(crate) fn resolve_color_data(
        &mut self,
        value: &str,
        opts: &ResolveOptions,
    ) -> Option<ColorData> {
        let mut value = value.trim().to_ascii_lowercase();
        if contains_var(&value) {
            value = self.resolve_var(&value, opts)?.to_ascii_lowercase();
        }
        if is_relative_color(&value) {
            return self.relative_color_data(&value, opts);
        }
        if value.starts_with("color-mix(") {
            return self.resolve_color_mix(&value, opts);
        }
        if value == "currentcolor" {
            let current = opts.current_color.clone()?;
            let inner = ResolveOptions {
                current_color: None,
                ..opts.clone()
            };
            return self.resolve_color_data(&current, &inner);
        }
        parse_color(self.tokenizer.as_ref(), &value, opts)
    }
}

impl VarContext for ColorResolver {
    fn cache(&mut self) -> &mut ValueCache {
        &mut self.cache
    }

    fn tokenize(&self, css: &str) -> TokenQueue {
        self.tokenizer.tokenize(css)
    }

    fn calc(&mut self, value: &str, opts: &ResolveOptions) -> String {
        css_calc(&mut self.cache, self.tokenizer.as_ref(), value, opts)
    }

    fn is_color_value(&mut self, value: &str, opts: &ResolveOptions) -> bool {
        self.is_color(value, opts)
    }

    fn enter_nested(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
