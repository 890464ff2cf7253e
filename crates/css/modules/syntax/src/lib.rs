//! CSS Syntax Module Level 3 — Tokenization and component-value splitting.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>

#![forbid(unsafe_code)]

pub mod split;
pub mod tokenizer;

pub use split::{Delimiter, SplitOptions, split_value};
pub use tokenizer::{CssTokenizer, Numeric, Token, TokenKind, TokenQueue, Tokenize, tokenize};
