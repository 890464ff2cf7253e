//! CSS Images Module Level 3 — Gradients.
//! Spec: <https://www.w3.org/TR/css-images-3/>

#![forbid(unsafe_code)]

pub mod gradient;
pub mod grammar;

pub use gradient::{
    Gradient, GradientKind, GradientType, get_gradient_type, has_gradient_prefix, is_gradient,
    parse_gradient, resolve_gradient, validate_color_stop_list, validate_gradient_line,
};
