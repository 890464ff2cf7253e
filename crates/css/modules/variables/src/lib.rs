//! CSS Custom Properties for Cascading Variables Module Level 1 — CSS variables.
//! Spec: <https://www.w3.org/TR/css-variables-1/>

#![forbid(unsafe_code)]

use core::hash::BuildHasher;
use css_syntax::{TokenKind, TokenQueue};
use css_values_units::grammar::{compile_regex, is_match};
use css_values_units::{CustomProperties, ResolveOptions, ValueFormat, contains_math_function};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use value_cache::{KeyData, ValueCache, create_cache_key};

const NAMESPACE: &str = "css-var";

static REG_FN_VAR: Lazy<Option<Regex>> = Lazy::new(|| compile_regex(r"(?i)(?:^|[^\w-])var\("));
static REG_DASHED_IDENT: Lazy<Option<Regex>> = Lazy::new(|| compile_regex(r"--[\w-]+"));
static REG_CSS_WIDE: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(r"(?i)^(?:inherit|initial|revert(?:-layer)?|unset)$"));

/// Services the `var()` resolver needs from its caller.
///
/// Substituted values are validated as colors and math functions are
/// evaluated by the caller, which also owns the cache and the tokenizer.
pub trait VarContext {
    fn cache(&mut self) -> &mut ValueCache;
    fn tokenize(&self, css: &str) -> TokenQueue;
    /// Evaluate math functions in `value`.
    fn calc(&mut self, value: &str, opts: &ResolveOptions) -> String;
    fn is_color_value(&mut self, value: &str, opts: &ResolveOptions) -> bool;
    /// Enter one level of nested resolution. Returns false once the depth
    /// limit is reached; the caller must then not call [`Self::exit_nested`]
    /// and notes the truncation on [`Self::cache`].
    fn enter_nested(&mut self) -> bool;
    fn exit_nested(&mut self);
}

/// Whether `value` contains a `var()` reference.
#[inline]
pub fn contains_var(value: &str) -> bool {
    is_match(REG_FN_VAR.as_ref(), value)
}

/// Extract custom properties (`--*`) from a declaration map.
///
/// This is a simple filter that keeps only entries whose property name begins with `--`.
/// It can be used on inline style maps or computed declaration maps to produce the
/// custom properties environment for `var()` resolution.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#custom-properties>
#[inline]
pub fn extract_custom_properties<S: BuildHasher>(
    declarations: &HashMap<String, String, S>,
) -> CustomProperties {
    let mut out = CustomProperties::default();
    for (key, value) in declarations {
        if key.starts_with("--") {
            out.values.insert(key.clone(), value.trim().to_owned());
        }
    }
    out
}

/// Unique `--*` identifiers of `value` in order of first appearance.
pub fn extract_dashed_ident(value: &str) -> Vec<String> {
    let Some(regex) = REG_DASHED_IDENT.as_ref() else {
        return Vec::new();
    };
    let mut idents: Vec<String> = Vec::new();
    for found in regex.find_iter(value) {
        if !idents.iter().any(|ident| ident == found.as_str()) {
            idents.push(found.as_str().to_owned());
        }
    }
    idents
}

fn flush_stage(stage: &mut String, items: &mut Vec<String>) {
    let trimmed = stage.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_owned());
    }
    stage.clear();
}

/// Resolve the body of one `var(` whose opening token was already consumed.
///
/// Consumes `tokens` through the matching `)`. The referenced property and
/// every fallback become ordered candidates; the first candidate that
/// resolves to a non-empty value wins. When there is more than one
/// candidate and the last one is a color, only colors are accepted.
/// Returns an empty string when nothing resolves.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
pub fn resolve_custom_property(
    ctx: &mut dyn VarContext,
    tokens: &mut TokenQueue,
    opts: &ResolveOptions,
) -> String {
    let mut items = Vec::new();
    let mut stage = String::new();
    let mut depth = 0_usize;
    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Function if depth == 0 && token.is_function("var") => {
                let nested = resolve_custom_property(ctx, tokens, opts);
                stage.push_str(&nested);
            }
            TokenKind::Function | TokenKind::ParenOpen => {
                depth += 1;
                stage.push_str(&token.text);
            }
            TokenKind::ParenClose => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                stage.push_str(&token.text);
            }
            TokenKind::Comma if depth == 0 => flush_stage(&mut stage, &mut items),
            TokenKind::Ident
                if depth == 0 && token.text.starts_with("--") && stage.trim().is_empty() =>
            {
                if let Some(value) = opts.lookup_custom_property(&token.text) {
                    stage.push_str(&value);
                } else {
                    debug!("[VAR] {} is not defined", token.text);
                }
            }
            TokenKind::Whitespace => stage.push(' '),
            TokenKind::Comment => {}
            TokenKind::EndOfInput => {
                tokens.push_front(token);
                break;
            }
            TokenKind::Comma
            | TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Percentage
            | TokenKind::Dimension
            | TokenKind::Delim
            | TokenKind::Hash
            | TokenKind::Str
            | TokenKind::Other => stage.push_str(&token.text),
        }
    }
    flush_stage(&mut stage, &mut items);

    let resolve_as_color = items.len() > 1
        && items
            .last()
            .is_some_and(|last| ctx.is_color_value(last, opts));
    for item in items {
        let candidate = if contains_var(&item) {
            resolve_var(ctx, &item, opts).unwrap_or_default()
        } else if contains_math_function(&item) {
            ctx.calc(&item, opts)
        } else if is_match(REG_CSS_WIDE.as_ref(), &item) {
            String::new()
        } else {
            item
        };
        if candidate.is_empty() {
            continue;
        }
        if !resolve_as_color || ctx.is_color_value(&candidate, opts) {
            return candidate;
        }
    }
    String::new()
}

/// Serialize `tokens`, substituting every `var()`.
///
/// Returns `None` as soon as one reference cannot be resolved. Whitespace
/// directly after an opening parenthesis or before a closing one is dropped.
pub fn parse_tokens(
    ctx: &mut dyn VarContext,
    tokens: &mut TokenQueue,
    opts: &ResolveOptions,
) -> Option<Vec<String>> {
    let mut fragments: Vec<String> = Vec::new();
    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Function if token.is_function("var") => {
                let resolved = resolve_custom_property(ctx, tokens, opts);
                if resolved.is_empty() {
                    return None;
                }
                fragments.push(resolved);
            }
            TokenKind::ParenClose => {
                if fragments.last().is_some_and(|last| last == " ") {
                    fragments.pop();
                }
                fragments.push(token.text);
            }
            TokenKind::Whitespace => {
                if fragments
                    .last()
                    .is_some_and(|last| !last.ends_with('(') && last != " ")
                {
                    fragments.push(" ".to_owned());
                }
            }
            TokenKind::Comment | TokenKind::EndOfInput => {}
            TokenKind::Function
            | TokenKind::ParenOpen
            | TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Percentage
            | TokenKind::Dimension
            | TokenKind::Comma
            | TokenKind::Delim
            | TokenKind::Hash
            | TokenKind::Str
            | TokenKind::Other => fragments.push(token.text),
        }
    }
    Some(fragments)
}

/// Substitute every `var()` in `value`.
///
/// Values without a reference, and any value in specified format, are
/// returned unchanged. `None` means a reference could not be resolved.
pub fn resolve_var(ctx: &mut dyn VarContext, value: &str, opts: &ResolveOptions) -> Option<String> {
    if !contains_var(value) || opts.format == ValueFormat::Specified {
        return Some(value.to_owned());
    }
    let value = value.trim();
    let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "resolveVar", value), opts);
    if let Some(cached) = ctx.cache().get(cache_key.as_ref()) {
        return cached.item::<String>().cloned();
    }
    if !ctx.enter_nested() {
        warn!("[VAR] nesting limit reached resolving {value}");
        ctx.cache().note_truncation();
        return None;
    }
    let mark = ctx.cache().truncation_mark();
    let mut tokens = ctx.tokenize(value);
    let resolved = parse_tokens(ctx, &mut tokens, opts).map(|fragments| {
        let joined = fragments.concat();
        if contains_math_function(&joined) {
            ctx.calc(&joined, opts)
        } else {
            joined.trim().to_owned()
        }
    });
    ctx.exit_nested();
    if resolved.is_none() {
        debug!("[VAR] unresolved {value}");
    }
    ctx.cache().set_since(mark, cache_key.as_ref(), resolved.clone());
    resolved
}

/// [`resolve_var`] with an unresolvable value mapped to the empty string.
#[inline]
pub fn css_var(ctx: &mut dyn VarContext, value: &str, opts: &ResolveOptions) -> String {
    resolve_var(ctx, value, opts).unwrap_or_default()
}
