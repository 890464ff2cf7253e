//! CSS Syntax Level 3 — §4 Tokenization (flattened token stream)
//! Spec: <https://www.w3.org/TR/css-syntax-3/#tokenization>
//!
//! `cssparser` hands out blocks as nested parsers. The value resolvers want a
//! flat queue instead: a function or parenthesis block is emitted as its
//! opening token, the block contents, and a closing token when the source
//! actually closes it. Raw text is sliced from the source so that joining
//! token texts reproduces the input.

use cssparser::{ParseError, Parser, ParserInput, Token as CssToken};
use std::collections::VecDeque;

/// Token categories consumed by the value resolvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `name(`; the text includes the opening parenthesis.
    Function,
    ParenOpen,
    ParenClose,
    Ident,
    Number,
    Percentage,
    Dimension,
    Whitespace,
    Comma,
    Delim,
    Comment,
    Hash,
    Str,
    /// Anything else, including whole `[...]` and `{...}` blocks.
    Other,
    /// Always the last token of a queue.
    EndOfInput,
}

/// Parsed numeric payload of a number, percentage or dimension token.
#[derive(Clone, Debug, PartialEq)]
pub struct Numeric {
    /// For percentages this is the number before `%` (50% → 50).
    pub value: f64,
    /// Lowercased unit of a dimension.
    pub unit: Option<String>,
}

/// One token of the flattened stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text.
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub detail: Option<Numeric>,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
            detail: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_detail(mut self, value: f64, unit: Option<String>) -> Self {
        self.detail = Some(Numeric { value, unit });
        self
    }

    /// Lowercased function name without the parenthesis.
    pub fn function_name(&self) -> Option<String> {
        if self.kind != TokenKind::Function {
            return None;
        }
        self.text
            .strip_suffix('(')
            .map(str::to_ascii_lowercase)
    }

    /// Whether this is the opening token of the function `name(`.
    #[inline]
    pub fn is_function(&self, name: &str) -> bool {
        self.function_name().is_some_and(|found| found == name)
    }

    /// Numeric value of a number, percentage or dimension token.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.detail.as_ref().map(|numeric| numeric.value)
    }

    /// Lowercased unit of a dimension token.
    #[inline]
    pub fn unit(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|numeric| numeric.unit.as_deref())
    }
}

/// A queue of tokens consumed front to back. Consumed tokens are gone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenQueue {
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drop leading whitespace and comment tokens.
    pub fn skip_whitespace(&mut self) {
        while self
            .peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment))
        {
            self.tokens.pop_front();
        }
    }

    /// Put a token back at the front of the queue.
    #[inline]
    pub fn push_front(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Concatenated raw text of the remaining tokens.
    pub fn to_css(&self) -> String {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }
}

impl Iterator for TokenQueue {
    type Item = Token;

    #[inline]
    fn next(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}

impl From<Vec<Token>> for TokenQueue {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

/// Source of token queues.
///
/// The resolvers only ever tokenize through this trait, so a caller may
/// substitute its own tokenizer (tests use this to count calls).
pub trait Tokenize {
    fn tokenize(&self, css: &str) -> TokenQueue;
}

/// The `cssparser`-backed tokenizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct CssTokenizer;

impl Tokenize for CssTokenizer {
    #[inline]
    fn tokenize(&self, css: &str) -> TokenQueue {
        tokenize(css)
    }
}

/// Tokenize `css` into a flat queue terminated by an end-of-input token.
pub fn tokenize(css: &str) -> TokenQueue {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut tokens = VecDeque::new();
    collect_tokens(&mut parser, &mut tokens);
    tokens.push_back(Token::new(TokenKind::EndOfInput, "", css.len(), css.len()));
    TokenQueue { tokens }
}

/// Parse the numeric prefix of `raw`, falling back to `cssparser`'s `f32`.
fn numeric_prefix(raw: &str, suffix_len: usize, fallback: f32) -> f64 {
    raw.get(..raw.len().saturating_sub(suffix_len))
        .and_then(|number| number.parse::<f64>().ok())
        .unwrap_or_else(|| f64::from(fallback))
}

fn collect_tokens(parser: &mut Parser<'_, '_>, out: &mut VecDeque<Token>) {
    loop {
        let start = parser.position();
        let css_token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let raw = parser.slice_from(start).to_owned();
        let start_index = start.byte_index();
        let end_index = parser.position().byte_index();
        match css_token {
            CssToken::Function(_) | CssToken::ParenthesisBlock => {
                let kind = if matches!(css_token, CssToken::Function(_)) {
                    TokenKind::Function
                } else {
                    TokenKind::ParenOpen
                };
                out.push_back(Token::new(kind, raw, start_index, end_index));
                let block_start = parser.position();
                let nested: Result<(), ParseError<'_, ()>> = parser.parse_nested_block(|block| {
                    collect_tokens(block, out);
                    Ok(())
                });
                if nested.is_err() {
                    log::trace!("[TOKENIZE] block at {start_index} ended early");
                }
                let block_end = parser.position().byte_index();
                if parser.slice_from(block_start).ends_with(')') {
                    out.push_back(Token::new(
                        TokenKind::ParenClose,
                        ")",
                        block_end.saturating_sub(1),
                        block_end,
                    ));
                }
            }
            CssToken::SquareBracketBlock | CssToken::CurlyBracketBlock => {
                let nested: Result<(), ParseError<'_, ()>> = parser.parse_nested_block(|block| {
                    while block.next_including_whitespace_and_comments().is_ok() {}
                    Ok(())
                });
                if nested.is_err() {
                    log::trace!("[TOKENIZE] bracket block at {start_index} ended early");
                }
                let block_text = parser.slice_from(start).to_owned();
                let block_end = parser.position().byte_index();
                out.push_back(Token::new(TokenKind::Other, block_text, start_index, block_end));
            }
            CssToken::Number { value, .. } => {
                let number = numeric_prefix(&raw, 0, value);
                out.push_back(
                    Token::new(TokenKind::Number, raw, start_index, end_index).with_detail(number, None),
                );
            }
            CssToken::Percentage { unit_value, .. } => {
                let number = numeric_prefix(&raw, 1, unit_value * 100.0);
                out.push_back(
                    Token::new(TokenKind::Percentage, raw, start_index, end_index)
                        .with_detail(number, None),
                );
            }
            CssToken::Dimension { value, unit, .. } => {
                let unit_text = unit.as_ref().to_ascii_lowercase();
                let number = numeric_prefix(&raw, unit.len(), value);
                out.push_back(
                    Token::new(TokenKind::Dimension, raw, start_index, end_index)
                        .with_detail(number, Some(unit_text)),
                );
            }
            CssToken::Ident(_) => {
                out.push_back(Token::new(TokenKind::Ident, raw, start_index, end_index));
            }
            CssToken::WhiteSpace(_) => {
                out.push_back(Token::new(TokenKind::Whitespace, raw, start_index, end_index));
            }
            CssToken::Comment(_) => {
                out.push_back(Token::new(TokenKind::Comment, raw, start_index, end_index));
            }
            CssToken::Comma => {
                out.push_back(Token::new(TokenKind::Comma, raw, start_index, end_index));
            }
            CssToken::Delim(_) => {
                out.push_back(Token::new(TokenKind::Delim, raw, start_index, end_index));
            }
            CssToken::Hash(_) | CssToken::IDHash(_) => {
                out.push_back(Token::new(TokenKind::Hash, raw, start_index, end_index));
            }
            CssToken::QuotedString(_) => {
                out.push_back(Token::new(TokenKind::Str, raw, start_index, end_index));
            }
            CssToken::CloseParenthesis => {
                out.push_back(Token::new(TokenKind::ParenClose, raw, start_index, end_index));
            }
            CssToken::AtKeyword(_)
            | CssToken::UnquotedUrl(_)
            | CssToken::Colon
            | CssToken::Semicolon
            | CssToken::IncludeMatch
            | CssToken::DashMatch
            | CssToken::PrefixMatch
            | CssToken::SuffixMatch
            | CssToken::SubstringMatch
            | CssToken::CDO
            | CssToken::CDC
            | CssToken::BadUrl(_)
            | CssToken::BadString(_)
            | CssToken::CloseSquareBracket
            | CssToken::CloseCurlyBracket => {
                out.push_back(Token::new(TokenKind::Other, raw, start_index, end_index));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(css: &str) -> Vec<TokenKind> {
        tokenize(css).map(|token| token.kind).collect()
    }

    #[test]
    fn functions_are_flattened() {
        assert_eq!(
            kinds("var(--a, 1px)"),
            vec![
                TokenKind::Function,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Dimension,
                TokenKind::ParenClose,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn unclosed_function_has_no_close_token() {
        assert_eq!(
            kinds("calc(1"),
            vec![TokenKind::Function, TokenKind::Number, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn raw_text_round_trips() {
        let css = "rgb( 10% calc(1px/2) /*c*/ , .5e1 )";
        assert_eq!(tokenize(css).to_css(), css);
    }

    #[test]
    fn numeric_detail_keeps_double_precision() {
        let mut queue = tokenize("0.1 50% 12.5PX");
        let number = queue.next().unwrap();
        assert_eq!(number.value(), Some(0.1));
        queue.skip_whitespace();
        let percent = queue.next().unwrap();
        assert_eq!(percent.value(), Some(50.0));
        queue.skip_whitespace();
        let dimension = queue.next().unwrap();
        assert_eq!(dimension.value(), Some(12.5));
        assert_eq!(dimension.unit(), Some("px"));
    }

    #[test]
    fn offsets_cover_the_source() {
        let queue = tokenize("a b");
        let tokens: Vec<Token> = queue.collect();
        assert_eq!((tokens[0].start, tokens[0].end), (0, 1));
        assert_eq!((tokens[2].start, tokens[2].end), (2, 3));
        assert_eq!(tokens[3].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn function_names_are_lowercased() {
        let token = tokenize("RGB(1 2 3)").next().unwrap();
        assert!(token.is_function("rgb"));
    }
}
