//! Options shared by every value resolver.
//!
//! Options take part in cache keys, so they serialize to a stable JSON
//! shape. Caller callbacks cannot be serialized; options that carry one
//! report themselves as uncacheable.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use value_cache::KeyOptions;

/// Looks up a custom property that is not in the static map.
pub type PropertyCallback = Rc<dyn Fn(&str) -> Option<String>>;
/// Maps a unit name to the number of pixels in one unit.
pub type DimensionCallback = Rc<dyn Fn(&str) -> Option<f64>>;

/// Output shape requested from a resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueFormat {
    /// Fully computed value (`rgb(...)`, `color(...)`, `lab(...)`).
    #[default]
    #[serde(rename = "computedValue")]
    Computed,
    /// Normalized but uncomputed text.
    #[serde(rename = "specifiedValue")]
    Specified,
    /// `#rrggbb`.
    #[serde(rename = "hex")]
    Hex,
    /// `#rrggbbaa`.
    #[serde(rename = "hexAlpha")]
    HexAlpha,
}

impl ValueFormat {
    /// Parse the external name of a format.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "computedValue" => Some(Self::Computed),
            "specifiedValue" => Some(Self::Specified),
            "hex" => Some(Self::Hex),
            "hexAlpha" => Some(Self::HexAlpha),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computed => "computedValue",
            Self::Specified => "specifiedValue",
            Self::Hex => "hex",
            Self::HexAlpha => "hexAlpha",
        }
    }

    #[inline]
    pub const fn is_hex(self) -> bool {
        matches!(self, Self::Hex | Self::HexAlpha)
    }
}

/// Custom property values: a static map plus an optional lookup callback.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CustomProperties {
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
    #[serde(skip)]
    pub callback: Option<PropertyCallback>,
}

impl fmt::Debug for CustomProperties {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CustomProperties")
            .field("values", &self.values)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Pixel sizes of relative units: a static table plus an optional callback.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DimensionTable {
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    #[serde(skip)]
    pub callback: Option<DimensionCallback>,
}

impl fmt::Debug for DimensionTable {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DimensionTable")
            .field("values", &self.values)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Options accepted by every resolver entry point.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    pub custom_property: CustomProperties,
    pub dimension: DimensionTable,
    pub format: ValueFormat,
    /// Substituted for `currentcolor` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_color: Option<String>,
    /// Color space of the enclosing gradient, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    /// Return nothing instead of a fallback for unresolvable input.
    pub nullable: bool,
}

impl ResolveOptions {
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_property.values.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_property_callback(
        mut self,
        callback: impl Fn(&str) -> Option<String> + 'static,
    ) -> Self {
        self.custom_property.callback = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, unit: impl Into<String>, px: f64) -> Self {
        self.dimension.values.insert(unit.into(), px);
        self
    }

    #[must_use]
    pub fn with_dimension_callback(mut self, callback: impl Fn(&str) -> Option<f64> + 'static) -> Self {
        self.dimension.callback = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_current_color(mut self, color: impl Into<String>) -> Self {
        self.current_color = Some(color.into());
        self
    }

    /// Value of `--name`, map first, then the callback.
    pub fn lookup_custom_property(&self, name: &str) -> Option<String> {
        if let Some(value) = self.custom_property.values.get(name) {
            return Some(value.clone());
        }
        self.custom_property
            .callback
            .as_ref()
            .and_then(|callback| callback(name))
    }

    /// Pixels per `unit`, table first, then the callback.
    pub fn lookup_dimension(&self, unit: &str) -> Option<f64> {
        if let Some(px) = self.dimension.values.get(unit) {
            return Some(*px);
        }
        self.dimension
            .callback
            .as_ref()
            .and_then(|callback| callback(unit))
    }
}

impl KeyOptions for ResolveOptions {
    fn is_cacheable(&self) -> bool {
        self.custom_property.callback.is_none() && self.dimension.callback.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_round_trip() {
        for format in [
            ValueFormat::Computed,
            ValueFormat::Specified,
            ValueFormat::Hex,
            ValueFormat::HexAlpha,
        ] {
            assert_eq!(ValueFormat::from_name(format.as_str()), Some(format));
        }
        assert_eq!(ValueFormat::from_name("rgb"), None);
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let opts: ResolveOptions = serde_json::from_str(
            r#"{"format":"hex","customProperty":{"--a":"red"},"dimension":{"em":16}}"#,
        )
        .unwrap();
        assert_eq!(opts.format, ValueFormat::Hex);
        assert_eq!(opts.lookup_custom_property("--a").as_deref(), Some("red"));
        assert_eq!(opts.lookup_dimension("em"), Some(16.0));
        assert!(opts.is_cacheable());
    }

    #[test]
    fn map_wins_over_callback() {
        let opts = ResolveOptions::default()
            .with_custom_property("--a", "red")
            .with_property_callback(|name| Some(format!("from-{name}")));
        assert_eq!(opts.lookup_custom_property("--a").as_deref(), Some("red"));
        assert_eq!(opts.lookup_custom_property("--b").as_deref(), Some("from---b"));
        assert!(!opts.is_cacheable());
    }

    #[test]
    fn dimension_callback_makes_options_uncacheable() {
        let opts = ResolveOptions::default().with_dimension_callback(|_| Some(10.0));
        assert_eq!(opts.lookup_dimension("vw"), Some(10.0));
        assert!(!opts.is_cacheable());
    }
}
