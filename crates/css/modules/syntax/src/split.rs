//! Splitting a component-value list on a top-level delimiter.
//! Spec: <https://www.w3.org/TR/css-syntax-3/#parse-comma-separated-list-of-component-values>

use crate::tokenizer::{TokenKind, Tokenize};
use serde::Serialize;
use value_cache::{KeyData, KeyOptions, ValueCache, create_cache_key};

const NAMESPACE: &str = "util";

/// Where a value list is split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Delimiter {
    /// Runs of whitespace.
    #[default]
    #[serde(rename = " ")]
    Space,
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = "/")]
    Slash,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOptions {
    pub delimiter: Delimiter,
    /// Keep comments in the segments. Only honored for `,` and `/`.
    pub preserve_comment: bool,
}

impl SplitOptions {
    #[inline]
    pub const fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            preserve_comment: false,
        }
    }
}

impl KeyOptions for SplitOptions {
    fn is_cacheable(&self) -> bool {
        true
    }
}

fn flush(segment: &mut String, segments: &mut Vec<String>) {
    segments.push(segment.trim().to_owned());
    segment.clear();
}

/// Split `value` into its top-level components.
///
/// Parentheses and function blocks nest; the delimiter only splits at depth
/// zero. With [`Delimiter::Space`] consecutive whitespace is one split point
/// and empty segments are dropped.
pub fn split_value(
    cache: &mut ValueCache,
    tokenizer: &dyn Tokenize,
    value: &str,
    opts: SplitOptions,
) -> Vec<String> {
    let value = value.trim();
    let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "splitValue", value), &opts);
    if let Some(cached) = cache.get(cache_key.as_ref())
        && let Some(segments) = cached.item::<Vec<String>>()
    {
        return segments.clone();
    }

    let SplitOptions {
        delimiter,
        preserve_comment,
    } = opts;
    let mut nest = 0_usize;
    let mut segment = String::new();
    let mut segments = Vec::new();
    for token in tokenizer.tokenize(value) {
        match token.kind {
            TokenKind::Comma => {
                if delimiter == Delimiter::Comma && nest == 0 {
                    flush(&mut segment, &mut segments);
                } else {
                    segment.push_str(&token.text);
                }
            }
            TokenKind::Delim => {
                if delimiter == Delimiter::Slash && token.text == "/" && nest == 0 {
                    flush(&mut segment, &mut segments);
                } else {
                    segment.push_str(&token.text);
                }
            }
            TokenKind::Comment => {
                if preserve_comment && delimiter != Delimiter::Space {
                    segment.push_str(&token.text);
                }
            }
            TokenKind::Function | TokenKind::ParenOpen => {
                segment.push_str(&token.text);
                nest += 1;
            }
            TokenKind::ParenClose => {
                segment.push_str(&token.text);
                nest = nest.saturating_sub(1);
            }
            TokenKind::Whitespace => {
                if delimiter == Delimiter::Space {
                    if nest > 0 {
                        segment.push(' ');
                    } else if !segment.trim().is_empty() {
                        flush(&mut segment, &mut segments);
                    }
                } else if !segment.ends_with(' ') {
                    segment.push(' ');
                }
            }
            TokenKind::EndOfInput => {
                if delimiter != Delimiter::Space || !segment.trim().is_empty() {
                    flush(&mut segment, &mut segments);
                }
            }
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Percentage
            | TokenKind::Dimension
            | TokenKind::Hash
            | TokenKind::Str
            | TokenKind::Other => segment.push_str(&token.text),
        }
    }
    cache.set(cache_key.as_ref(), Some(segments.clone()));
    segments
}
