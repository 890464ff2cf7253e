//! CSS Values & Units Level 4 — §10 Mathematical Expressions
//! Spec: <https://www.w3.org/TR/css-values-4/#math>
//!
//! Math functions are evaluated over the flattened token stream. A function
//! that cannot be reduced to one value (mixed units without a conversion,
//! unknown identifiers, malformed input) is kept in canonical text form.

use crate::chapter_4_numbers::format_number;
use crate::chapter_6_dimensions::{angle_to_degrees, resolve_dimension};
use crate::grammar::{MATH_FUNCTIONS, MATH_FUNCTION_NAMES, compile_regex, is_match};
use crate::options::{ResolveOptions, ValueFormat};
use core::f64::consts::{E, PI};
use css_syntax::{Token, TokenKind, TokenQueue, Tokenize};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use value_cache::{KeyData, ValueCache, create_cache_key};

const NAMESPACE: &str = "css-calc";

/// Identifier values available inside an expression, e.g. the channel
/// keywords of a relative color.
pub type Bindings = BTreeMap<String, f64>;

static REG_FN_MATH: Lazy<Option<Regex>> =
    Lazy::new(|| compile_regex(&format!(r"(?i)(?:^|[\s(,*/])(?:{MATH_FUNCTION_NAMES})\(")));

/// Type of a math result after canonicalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuantityUnit {
    Number,
    Percent,
    /// Lengths are canonicalized to `px` and angles to `deg` where possible.
    Dimension(String),
}

/// A typed numeric value.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: QuantityUnit,
}

impl Quantity {
    #[inline]
    pub const fn new(value: f64, unit: QuantityUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub const fn number(value: f64) -> Self {
        Self::new(value, QuantityUnit::Number)
    }

    pub fn to_css(&self) -> String {
        match &self.unit {
            QuantityUnit::Number => format_number(self.value),
            QuantityUnit::Percent => format!("{}%", format_number(self.value)),
            QuantityUnit::Dimension(unit) => format!("{}{unit}", format_number(self.value)),
        }
    }

    fn with_value(&self, value: f64) -> Self {
        Self::new(value, self.unit.clone())
    }

    fn add(&self, rhs: &Self, subtract: bool) -> Option<Self> {
        if self.unit != rhs.unit {
            return None;
        }
        let value = if subtract {
            self.value - rhs.value
        } else {
            self.value + rhs.value
        };
        Some(self.with_value(value))
    }

    fn mul(&self, rhs: &Self) -> Option<Self> {
        match (&self.unit, &rhs.unit) {
            (QuantityUnit::Number, _) => Some(rhs.with_value(self.value * rhs.value)),
            (_, QuantityUnit::Number) => Some(self.with_value(self.value * rhs.value)),
            _ => None,
        }
    }

    fn div(&self, rhs: &Self) -> Option<Self> {
        if rhs.unit == QuantityUnit::Number {
            Some(self.with_value(self.value / rhs.value))
        } else if rhs.unit == self.unit {
            Some(Self::number(self.value / rhs.value))
        } else {
            None
        }
    }
}

/// Whether `name` (case-insensitive, without parenthesis) is a math function.
pub fn is_math_function(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MATH_FUNCTIONS.contains(&lower.as_str())
}

/// Whether `value` contains a math function call.
#[inline]
pub fn contains_math_function(value: &str) -> bool {
    is_match(REG_FN_MATH.as_ref(), value)
}

/// Consume tokens up to and including the `)` that closes an already
/// consumed opener. Stops before end of input when the block is unclosed.
pub fn take_block(queue: &mut TokenQueue) -> Vec<Token> {
    let mut depth = 1_usize;
    let mut block = Vec::new();
    while queue
        .peek()
        .is_some_and(|token| token.kind != TokenKind::EndOfInput)
    {
        let Some(token) = queue.next() else {
            break;
        };
        match token.kind {
            TokenKind::Function | TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth -= 1,
            _ => {}
        }
        block.push(token);
        if depth == 0 {
            break;
        }
    }
    block
}

/// Canonical text of a token run: comments dropped, whitespace collapsed,
/// no padding inside parentheses.
pub fn serialize_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Whitespace => {
                if !out.is_empty() && !out.ends_with([' ', '(']) {
                    out.push(' ');
                }
            }
            TokenKind::Comment | TokenKind::EndOfInput => {}
            TokenKind::ParenClose | TokenKind::Comma => {
                out.truncate(out.trim_end().len());
                out.push_str(&token.text);
            }
            TokenKind::Function
            | TokenKind::ParenOpen
            | TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Percentage
            | TokenKind::Dimension
            | TokenKind::Delim
            | TokenKind::Hash
            | TokenKind::Str
            | TokenKind::Other => out.push_str(&token.text),
        }
    }
    out.trim().to_owned()
}

/// Evaluate the math function `name` whose argument tokens (including the
/// closing parenthesis, if any) are `block`.
pub fn evaluate_function(
    name: &str,
    block: &[Token],
    opts: &ResolveOptions,
    bindings: &Bindings,
) -> Option<Quantity> {
    let mut parser = MathParser::new(block, opts, bindings);
    let result = parser.parse_function(&name.to_ascii_lowercase())?;
    if !parser.at_end() || !result.value.is_finite() {
        return None;
    }
    Some(result)
}

/// Replace every math function in `value` with its result, keeping the
/// canonical text of functions that cannot be reduced. Specified format
/// never evaluates.
pub fn serialize_calc(
    tokenizer: &dyn Tokenize,
    value: &str,
    opts: &ResolveOptions,
    bindings: &Bindings,
) -> String {
    let mut queue = tokenizer.tokenize(value);
    let mut out = String::new();
    while let Some(token) = queue.next() {
        let math_name = token
            .function_name()
            .filter(|name| is_math_function(name));
        if let Some(name) = math_name {
            let block = take_block(&mut queue);
            let evaluated = if opts.format == ValueFormat::Specified {
                None
            } else {
                evaluate_function(&name, &block, opts, bindings)
            };
            if let Some(result) = evaluated {
                out.push_str(&result.to_css());
            } else {
                trace!("[CALC] {name}() left unresolved");
                out.push_str(&name);
                out.push('(');
                out.push_str(&serialize_tokens(&block));
            }
        } else {
            out.push_str(&token.text);
        }
    }
    out.trim().to_owned()
}

/// Evaluate the math functions in `value`. Values without one are returned
/// trimmed and untouched.
pub fn css_calc(
    cache: &mut ValueCache,
    tokenizer: &dyn Tokenize,
    value: &str,
    opts: &ResolveOptions,
) -> String {
    let value = value.trim();
    if !contains_math_function(value) {
        return value.to_owned();
    }
    let cache_key = create_cache_key(&KeyData::new(NAMESPACE, "cssCalc", value), opts);
    if let Some(cached) = cache.get(cache_key.as_ref())
        && let Some(resolved) = cached.item::<String>()
    {
        return resolved.clone();
    }
    let resolved = serialize_calc(tokenizer, value, opts, &Bindings::new());
    cache.set(cache_key.as_ref(), Some(resolved.clone()));
    resolved
}

fn normalize_dimension(value: f64, unit: &str, opts: &ResolveOptions) -> Quantity {
    if let Some(degrees) = angle_to_degrees(value, unit) {
        return Quantity::new(degrees, QuantityUnit::Dimension("deg".to_owned()));
    }
    if let Some(px) = resolve_dimension(value, unit, opts) {
        return Quantity::new(px, QuantityUnit::Dimension("px".to_owned()));
    }
    Quantity::new(value, QuantityUnit::Dimension(unit.to_owned()))
}

fn round_to_step(strategy: &str, value: f64, step: f64) -> f64 {
    if step == 0.0 {
        return f64::NAN;
    }
    let ratio = value / step;
    let rounded = match strategy {
        "up" => ratio.ceil(),
        "down" => ratio.floor(),
        "to-zero" => ratio.trunc(),
        _ => (ratio + 0.5).floor(),
    };
    rounded * step
}

fn same_unit(args: &[Quantity]) -> Option<&QuantityUnit> {
    let first = args.first()?;
    args.iter()
        .all(|arg| arg.unit == first.unit)
        .then_some(&first.unit)
}

fn to_radians(angle: &Quantity) -> Option<f64> {
    match &angle.unit {
        QuantityUnit::Number => Some(angle.value),
        QuantityUnit::Dimension(unit) if unit == "deg" => Some(angle.value.to_radians()),
        QuantityUnit::Percent | QuantityUnit::Dimension(_) => None,
    }
}

fn degrees(radians: f64) -> Quantity {
    Quantity::new(radians.to_degrees(), QuantityUnit::Dimension("deg".to_owned()))
}

fn apply(name: &str, strategy: &str, args: &[Quantity]) -> Option<Quantity> {
    let unit = same_unit(args)?.clone();
    let numeric = unit == QuantityUnit::Number;
    let result = match (name, args) {
        ("calc", [value]) => value.clone(),
        ("min", _) => Quantity::new(
            args.iter().map(|arg| arg.value).fold(f64::INFINITY, f64::min),
            unit,
        ),
        ("max", _) => Quantity::new(
            args.iter().map(|arg| arg.value).fold(f64::NEG_INFINITY, f64::max),
            unit,
        ),
        ("hypot", _) => Quantity::new(
            args.iter().map(|arg| arg.value * arg.value).sum::<f64>().sqrt(),
            unit,
        ),
        ("clamp", [low, value, high]) => {
            Quantity::new(value.value.min(high.value).max(low.value), unit)
        }
        ("abs", [value]) => value.with_value(value.value.abs()),
        ("sign", [value]) => {
            let sign = if value.value == 0.0 {
                value.value
            } else {
                value.value.signum()
            };
            Quantity::number(sign)
        }
        ("round", [value]) => value.with_value(round_to_step(strategy, value.value, 1.0)),
        ("round", [value, step]) => value.with_value(round_to_step(strategy, value.value, step.value)),
        ("mod", [value, step]) => {
            value.with_value(value.value - step.value * (value.value / step.value).floor())
        }
        ("rem", [value, step]) => value.with_value(value.value % step.value),
        ("sqrt", [value]) if numeric => Quantity::number(value.value.sqrt()),
        ("exp", [value]) if numeric => Quantity::number(value.value.exp()),
        ("pow", [base, exponent]) if numeric => Quantity::number(base.value.powf(exponent.value)),
        ("log", [value]) if numeric => Quantity::number(value.value.ln()),
        ("log", [value, base]) if numeric => Quantity::number(value.value.ln() / base.value.ln()),
        ("sin", [angle]) => Quantity::number(to_radians(angle)?.sin()),
        ("cos", [angle]) => Quantity::number(to_radians(angle)?.cos()),
        ("tan", [angle]) => Quantity::number(to_radians(angle)?.tan()),
        ("asin", [value]) if numeric => degrees(value.value.asin()),
        ("acos", [value]) if numeric => degrees(value.value.acos()),
        ("atan", [value]) if numeric => degrees(value.value.atan()),
        ("atan2", [first, second]) => degrees(first.value.atan2(second.value)),
        _ => return None,
    };
    Some(result)
}

/// Recursive-descent evaluator over the significant tokens of one block.
struct MathParser<'src> {
    tokens: Vec<&'src Token>,
    pos: usize,
    opts: &'src ResolveOptions,
    bindings: &'src Bindings,
}

impl<'src> MathParser<'src> {
    fn new(block: &'src [Token], opts: &'src ResolveOptions, bindings: &'src Bindings) -> Self {
        let tokens = block
            .iter()
            .filter(|token| {
                !matches!(
                    token.kind,
                    TokenKind::Whitespace | TokenKind::Comment | TokenKind::EndOfInput
                )
            })
            .collect();
        Self {
            tokens,
            pos: 0,
            opts,
            bindings,
        }
    }

    fn peek(&self) -> Option<&'src Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<&'src Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek_delim(&self) -> Option<char> {
        self.peek()
            .filter(|token| token.kind == TokenKind::Delim)
            .and_then(|token| token.text.chars().next())
    }

    /// A leading rounding strategy of `round()`, consumed with its comma.
    fn round_strategy(&mut self) -> &'static str {
        let Some(token) = self.peek() else {
            return "nearest";
        };
        if token.kind != TokenKind::Ident
            || self
                .tokens
                .get(self.pos + 1)
                .is_none_or(|next| next.kind != TokenKind::Comma)
        {
            return "nearest";
        }
        let strategy = match token.text.to_ascii_lowercase().as_str() {
            "up" => "up",
            "down" => "down",
            "to-zero" => "to-zero",
            "nearest" => "nearest",
            _ => return "nearest",
        };
        self.pos += 2;
        strategy
    }

    fn parse_function(&mut self, name: &str) -> Option<Quantity> {
        let strategy = if name == "round" {
            self.round_strategy()
        } else {
            "nearest"
        };
        let args = self.parse_args()?;
        apply(name, strategy, &args)
    }

    fn parse_args(&mut self) -> Option<Vec<Quantity>> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_sum()?);
            match self.bump() {
                None => return Some(args),
                Some(token) if token.kind == TokenKind::ParenClose => return Some(args),
                Some(token) if token.kind == TokenKind::Comma => {}
                Some(_) => return None,
            }
        }
    }

    fn parse_sum(&mut self) -> Option<Quantity> {
        let mut acc = self.parse_product()?;
        while let Some(op @ ('+' | '-')) = self.peek_delim() {
            self.pos += 1;
            let rhs = self.parse_product()?;
            acc = acc.add(&rhs, op == '-')?;
        }
        Some(acc)
    }

    fn parse_product(&mut self) -> Option<Quantity> {
        let mut acc = self.parse_value()?;
        while let Some(op @ ('*' | '/')) = self.peek_delim() {
            self.pos += 1;
            let rhs = self.parse_value()?;
            acc = if op == '*' { acc.mul(&rhs)? } else { acc.div(&rhs)? };
        }
        Some(acc)
    }

    fn parse_value(&mut self) -> Option<Quantity> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Number => Some(Quantity::number(token.value()?)),
            TokenKind::Percentage => Some(Quantity::new(token.value()?, QuantityUnit::Percent)),
            TokenKind::Dimension => Some(normalize_dimension(
                token.value()?,
                token.unit()?,
                self.opts,
            )),
            TokenKind::ParenOpen => {
                let inner = self.parse_sum()?;
                match self.bump() {
                    None => Some(inner),
                    Some(close) if close.kind == TokenKind::ParenClose => Some(inner),
                    Some(_) => None,
                }
            }
            TokenKind::Function => {
                let name = token.function_name()?;
                if is_math_function(&name) {
                    self.parse_function(&name)
                } else {
                    None
                }
            }
            TokenKind::Ident => self.resolve_ident(&token.text),
            _ => None,
        }
    }

    fn resolve_ident(&self, text: &str) -> Option<Quantity> {
        let name = text.to_ascii_lowercase();
        if let Some(value) = self.bindings.get(&name) {
            return Some(Quantity::number(*value));
        }
        let constant = match name.as_str() {
            "e" => E,
            "pi" => PI,
            "infinity" => f64::INFINITY,
            "-infinity" => f64::NEG_INFINITY,
            "nan" => f64::NAN,
            _ => return None,
        };
        Some(Quantity::number(constant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_syntax::CssTokenizer;

    fn calc(value: &str, opts: &ResolveOptions) -> String {
        css_calc(&mut ValueCache::default(), &CssTokenizer, value, opts)
    }

    #[test]
    fn detects_math_functions() {
        assert!(contains_math_function("calc(1px + 2px)"));
        assert!(contains_math_function("10px MIN(1px, 2px)"));
        assert!(!contains_math_function("minmax(1px, 2px)"));
        assert!(!contains_math_function("rgb(1 2 3)"));
    }

    #[test]
    fn adds_lengths() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(calc("calc(1px + 2px)", &ResolveOptions::default()), "3px");
        assert_eq!(calc("calc(2 * (3 + 4))", &ResolveOptions::default()), "14");
        assert_eq!(calc("calc(50% - 10%)", &ResolveOptions::default()), "40%");
    }

    #[test]
    fn relative_lengths_need_a_table() {
        let bare = ResolveOptions::default();
        assert_eq!(calc("calc( 1em  +  2px )", &bare), "calc(1em + 2px)");
        let sized = ResolveOptions::default().with_dimension("em", 16.0);
        assert_eq!(calc("calc(1em + 2px)", &sized), "18px");
    }

    #[test]
    fn comparison_and_stepped_functions() {
        let opts = ResolveOptions::default();
        assert_eq!(calc("min(1px, 5px)", &opts), "1px");
        assert_eq!(calc("max(1, 5, 3)", &opts), "5");
        assert_eq!(calc("clamp(10px, 50px, 20px)", &opts), "20px");
        assert_eq!(calc("round(down, 7.8, 1)", &opts), "7");
        assert_eq!(calc("round(7.5)", &opts), "8");
        assert_eq!(calc("mod(-7, 3)", &opts), "2");
        assert_eq!(calc("rem(-7, 3)", &opts), "-1");
        assert_eq!(calc("abs(-4px)", &opts), "4px");
        assert_eq!(calc("sign(-4px)", &opts), "-1");
    }

    #[test]
    fn trigonometry_uses_degrees() {
        let opts = ResolveOptions::default();
        assert_eq!(calc("sin(90deg)", &opts), "1");
        assert_eq!(calc("calc(0.5turn / 2)", &opts), "90deg");
    }

    #[test]
    fn only_math_functions_are_replaced() {
        assert_eq!(
            calc(" 1px calc(2px * 3) red ", &ResolveOptions::default()),
            "1px 6px red"
        );
        assert_eq!(calc("  red ", &ResolveOptions::default()), "red");
    }

    #[test]
    fn invalid_operator_spacing_is_left_alone() {
        assert_eq!(calc("calc(1px -2px)", &ResolveOptions::default()), "calc(1px -2px)");
    }

    #[test]
    fn bindings_feed_identifiers() {
        let mut bindings = Bindings::new();
        bindings.insert("r".to_owned(), 255.0);
        let opts = ResolveOptions::default();
        assert_eq!(serialize_calc(&CssTokenizer, "calc(r * 0.5)", &opts, &bindings), "127.5");
        assert_eq!(
            serialize_calc(&CssTokenizer, "calc(g * 0.5)", &opts, &bindings),
            "calc(g * 0.5)"
        );
    }

    #[test]
    fn specified_format_only_canonicalizes() {
        let opts = ResolveOptions::default().with_format(ValueFormat::Specified);
        assert_eq!(calc("calc( 1px  + 2px )", &opts), "calc(1px + 2px)");
    }

    #[test]
    fn repeated_calc_is_cached() {
        let mut cache = ValueCache::default();
        let opts = ResolveOptions::default();
        let first = css_calc(&mut cache, &CssTokenizer, "calc(1px + 1px)", &opts);
        let second = css_calc(&mut cache, &CssTokenizer, "calc(1px + 1px)", &opts);
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
    }
}
