//! CSS value resolution — colors, gradients, custom properties and math functions.
//!
//! Free functions here run on a resolver owned by the calling thread, so
//! repeated queries share one cache. Use [`ColorResolver`] directly for an
//! isolated cache or an injected tokenizer.

#![forbid(unsafe_code)]

use core::cell::RefCell;
use log::{debug, warn};

pub use css_color::{
    ColorData, ColorError, ColorResolver, ColorSpace, HueArc, ResolverConfig, TRANSPARENT_RGBA,
    interpolate_hue,
};
pub use css_images::{
    Gradient, GradientKind, GradientType, get_gradient_type, validate_gradient_line,
};
pub use css_syntax::{Delimiter, SplitOptions};
pub use css_values_units::{ResolveOptions, ValueError, ValueFormat, round_to_precision};
pub use css_variables::{extract_custom_properties, extract_dashed_ident};
pub use value_cache::DEFAULT_CAPACITY;

thread_local! {
    static RESOLVER: RefCell<ColorResolver> = RefCell::new(ColorResolver::default());
}

/// Run `func` with this thread's resolver.
///
/// Returns `None` when the resolver is already in use on this thread, as
/// happens when a custom property or dimension callback calls back into
/// this module. Every free function below then resolves to nothing.
#[inline]
pub fn with_resolver<R>(func: impl FnOnce(&mut ColorResolver) -> R) -> Option<R> {
    RESOLVER.with(|cell| {
        let Ok(mut resolver) = cell.try_borrow_mut() else {
            warn!("[CSS] re-entrant use of the thread resolver");
            return None;
        };
        Some(func(&mut resolver))
    })
}

/// Replace this thread's resolver with a fresh one built from `config`.
///
/// Ignored, with a warning, while the resolver is in use.
pub fn configure(config: ResolverConfig) {
    debug!("[CSS] resolver reconfigured: {config:?}");
    if with_resolver(|resolver| *resolver = ColorResolver::new(config)).is_none() {
        warn!("[CSS] configure ignored while resolving");
    }
}

/// Drop every memoized result of this thread's resolver.
#[inline]
pub fn clear_cache() {
    if with_resolver(ColorResolver::clear_cache).is_none() {
        warn!("[CSS] clear_cache ignored while resolving");
    }
}

/// See [`ColorResolver::resolve_color`].
#[inline]
pub fn resolve_color(value: &str, opts: &ResolveOptions) -> Option<String> {
    with_resolver(|resolver| resolver.resolve_color(value, opts)).flatten()
}

/// See [`ColorResolver::resolve`].
#[inline]
pub fn resolve(value: &str, opts: &ResolveOptions) -> Option<String> {
    with_resolver(|resolver| resolver.resolve(value, opts)).flatten()
}

/// See [`ColorResolver::is_color`].
#[inline]
pub fn is_color(value: &str, opts: &ResolveOptions) -> bool {
    with_resolver(|resolver| resolver.is_color(value, opts)).unwrap_or(false)
}

/// See [`ColorResolver::resolve_relative_color`].
///
/// # Errors
/// [`ColorError::UnresolvedVar`] when `value` still contains `var()`
/// outside specified format.
#[inline]
pub fn resolve_relative_color(
    value: &str,
    opts: &ResolveOptions,
) -> Result<Option<String>, ColorError> {
    with_resolver(|resolver| resolver.resolve_relative_color(value, opts)).unwrap_or(Ok(None))
}

#[inline]
pub fn split_value(value: &str, opts: SplitOptions) -> Vec<String> {
    with_resolver(|resolver| resolver.split_value(value, opts)).unwrap_or_default()
}

/// See [`ColorResolver::css_var`].
#[inline]
pub fn css_var(value: &str, opts: &ResolveOptions) -> String {
    with_resolver(|resolver| resolver.css_var(value, opts)).unwrap_or_default()
}

/// See [`ColorResolver::resolve_var`].
#[inline]
pub fn resolve_var(value: &str, opts: &ResolveOptions) -> Option<String> {
    with_resolver(|resolver| resolver.resolve_var(value, opts)).flatten()
}

/// See [`ColorResolver::css_calc`].
#[inline]
pub fn css_calc(value: &str, opts: &ResolveOptions) -> String {
    with_resolver(|resolver| resolver.css_calc(value, opts)).unwrap_or_default()
}

#[inline]
pub fn parse_gradient(value: &str, opts: &ResolveOptions) -> Option<Gradient> {
    with_resolver(|resolver| css_images::parse_gradient(resolver, value, opts)).flatten()
}

#[inline]
pub fn is_gradient(value: &str, opts: &ResolveOptions) -> bool {
    with_resolver(|resolver| css_images::is_gradient(resolver, value, opts)).unwrap_or(false)
}

#[inline]
pub fn resolve_gradient(value: &str, opts: &ResolveOptions) -> Option<String> {
    with_resolver(|resolver| css_images::resolve_gradient(resolver, value, opts)).flatten()
}

/// See [`css_images::validate_color_stop_list`].
#[inline]
pub fn validate_color_stop_list(
    list: &[String],
    gradient_type: GradientType,
    opts: &ResolveOptions,
) -> bool {
    with_resolver(|resolver| {
        css_images::validate_color_stop_list(resolver, list, gradient_type, opts)
    })
    .unwrap_or(false)
}
