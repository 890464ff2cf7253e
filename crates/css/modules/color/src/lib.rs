//! CSS Color Module Levels 4 and 5 — Color spaces, color values, relative colors and mixing.
//! Spec: <https://www.w3.org/TR/css-color-4/>
//! Spec: <https://www.w3.org/TR/css-color-5/>

#![forbid(unsafe_code)]

pub mod grammar;
pub mod hue;
pub mod mix;
pub mod parse;
pub mod predicate;
pub mod relative;
pub mod resolver;
pub mod serialize;
pub mod space;

pub use hue::{HueArc, interpolate_hue};
pub use mix::{Interpolation, mix_colors, normalize_weights};
pub use parse::{ColorData, Component, ComponentList, Notation, is_named_color, parse_color};
pub use relative::ChannelValue;
pub use resolver::{ColorResolver, ResolverConfig};
pub use serialize::{TRANSPARENT_RGBA, serialize_computed, serialize_relative, to_hex};
pub use space::{ColorSpace, convert};

use css_values_units::ValueError;

/// Errors raised by color resolution.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ColorError {
    /// A `var()` reached a stage that needs it substituted already.
    #[error("unexpected var() in {0}")]
    UnresolvedVar(String),
    #[error(transparent)]
    Value(#[from] ValueError),
}
