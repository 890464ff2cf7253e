//! CSS Values and Units Module Level 4 — Numeric values, dimensions and math functions.
//! Spec: <https://www.w3.org/TR/css-values-4/>

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the css-values-4 table of contents.
pub mod chapter_10_math;
pub mod chapter_4_numbers;
pub mod chapter_6_dimensions;
pub mod grammar;
pub mod options;

// Re-exports for ergonomic access from other crates.
pub use chapter_10_math::{
    Bindings, Quantity, QuantityUnit, contains_math_function, css_calc, evaluate_function,
    is_math_function, serialize_calc, serialize_tokens, take_block,
};
pub use chapter_4_numbers::{format_number, round_to_precision};
pub use chapter_6_dimensions::{angle_to_degrees, resolve_dimension, resolve_dimension_token};
pub use options::{
    CustomProperties, DimensionCallback, DimensionTable, PropertyCallback, ResolveOptions,
    ValueFormat,
};

/// Errors for programmer-error misuse of the numeric helpers.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The input was NaN or infinite.
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    /// The precision bit width was above 16.
    #[error("{0} is not between 0 and 16")]
    OutOfRange(u32),
}
