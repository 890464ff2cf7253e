//! CSS Color Module Level 5 — §4 Relative color syntax
//! Spec: <https://www.w3.org/TR/css-color-5/#relative-colors>

use crate::ColorError;
use crate::grammar::is_relative_color;
use crate::parse::{ColorData, Notation, is_named_color, read_components};
use crate::resolver::ColorResolver;
use crate::serialize::{normalize_legacy_prefix, serialize_relative};
use core::fmt;
use css_syntax::{Token, TokenKind, TokenQueue};
use css_values_units::{
    Bindings, ResolveOptions, ValueFormat, format_number, resolve_dimension_token,
    serialize_calc, serialize_tokens, take_block,
};
use css_variables::{VarContext as _, contains_var};
use log::{debug, warn};
use value_cache::{KeyData, create_cache_key};

const NAMESPACE: &str = "relative-color";
const MATH_CONSTANTS: &[&str] = &["e", "pi", "infinity", "-infinity", "nan"];

/// One channel of a relative color in specified form.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValue {
    /// A number; percentages are already divided by 100.
    Number(f64),
    /// A channel keyword, `none`, a dimension or a math expression.
    Text(String),
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => formatter.write_str(&format_number(*number)),
            Self::Text(text) => formatter.write_str(text),
        }
    }
}

/// Channel keywords accepted by a relative color function.
fn channel_keywords(function: &str) -> Option<&'static [&'static str]> {
    match function {
        "rgb" | "rgba" => Some(&["r", "g", "b", "alpha"]),
        "hsl" | "hsla" => Some(&["h", "s", "l", "alpha"]),
        "hwb" => Some(&["h", "w", "b", "alpha"]),
        "lab" | "oklab" => Some(&["l", "a", "b", "alpha"]),
        "lch" | "oklch" => Some(&["l", "c", "h", "alpha"]),
        "color" => Some(&["r", "g", "b", "x", "y", "z", "alpha"]),
        _ => None,
    }
}

/// A relative color function taken apart.
struct RelativeParts {
    function: String,
    origin: String,
    /// The space of `color(from … <space> …)`.
    space: Option<String>,
    /// Everything after the origin (and space), through end of input.
    channels: Vec<Token>,
}

impl RelativeParts {
    fn parse(mut queue: TokenQueue) -> Option<Self> {
        queue.skip_whitespace();
        let function = queue.next()?.function_name()?;
        queue.skip_whitespace();
        let from = queue.next()?;
        if from.kind != TokenKind::Ident || !from.text.eq_ignore_ascii_case("from") {
            return None;
        }
        queue.skip_whitespace();
        let first = queue.next()?;
        let origin = match first.kind {
            TokenKind::Function | TokenKind::ParenOpen => {
                let block = take_block(&mut queue);
                format!("{}{}", first.text, serialize_tokens(&block))
            }
            TokenKind::Ident | TokenKind::Hash => first.text,
            _ => return None,
        };
        queue.skip_whitespace();
        let space = if function == "color" {
            let token = queue.next()?;
            if token.kind != TokenKind::Ident {
                return None;
            }
            Some(token.text.to_ascii_lowercase())
        } else {
            None
        };
        Some(Self {
            function,
            origin: origin.to_ascii_lowercase(),
            space,
            channels: queue.collect(),
        })
    }

    fn notation(&self) -> Option<Notation> {
        match &self.space {
            Some(space) => Notation::from_predefined(space),
            None => Notation::from_function(&self.function),
        }
    }

    /// Reassemble with `origin` and the given channel text (which carries
    /// the closing parenthesis).
    fn rebuild(&self, origin: &str, channels: &str) -> String {
        let mut out = format!("{}(from {origin} ", self.function);
        if let Some(space) = &self.space {
            out.push_str(space);
            out.push(' ');
        }
        out.push_str(channels);
        out
    }
}

fn push_space(slot: &mut Vec<ChannelValue>) {
    let wants_space = match slot.last() {
        Some(ChannelValue::Number(_)) => true,
        Some(ChannelValue::Text(text)) => !text.ends_with('(') && text != " ",
        None => false,
    };
    if wants_space {
        slot.push(ChannelValue::Text(" ".to_owned()));
    }
}

impl ColorResolver {
    /// Walk the channel tokens of a relative color into up to four slots
    /// (three channels and alpha).
    ///
    /// The keyword set comes from `opts.color_space`, the relative function
    /// name. Percentages become numbers divided by 100, dimensions resolve
    /// to pixels where possible and math functions are kept whole. Slots
    /// made of more than one token are serialized as one expression.
    /// Returns `None` for identifiers that are not channel keywords.
    pub fn resolve_color_channels(
        &mut self,
        tokens: &mut TokenQueue,
        opts: &ResolveOptions,
    ) -> Option<Vec<ChannelValue>> {
        let function = opts.color_space.as_deref()?;
        let keywords = channel_keywords(function)?;
        let mut slots: Vec<Vec<ChannelValue>> = vec![Vec::new()];
        let mut depth = 0_usize;
        for token in tokens.by_ref() {
            if depth == 0 && slots.last().is_some_and(|slot| !slot.is_empty()) {
                if matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment) {
                    continue;
                }
                if matches!(token.kind, TokenKind::ParenClose | TokenKind::EndOfInput) {
                    break;
                }
                if token.kind == TokenKind::Delim && token.text == "/" {
                    continue;
                }
                if slots.len() == 4 {
                    debug!("[RELATIVE] too many channels");
                    return None;
                }
                slots.push(Vec::new());
            }
            let slot = slots.last_mut()?;
            match token.kind {
                TokenKind::Dimension => {
                    let resolved = resolve_dimension_token(&token, opts).unwrap_or(token.text);
                    slot.push(ChannelValue::Text(resolved));
                }
                TokenKind::Function | TokenKind::ParenOpen => {
                    slot.push(ChannelValue::Text(token.text.to_ascii_lowercase()));
                    depth += 1;
                }
                TokenKind::Ident => {
                    let name = token.text.to_ascii_lowercase();
                    let allowed = keywords.contains(&name.as_str())
                        || name == "none"
                        || (depth > 0 && MATH_CONSTANTS.contains(&name.as_str()));
                    if !allowed {
                        debug!("[RELATIVE] {name} is not a channel of {function}()");
                        return None;
                    }
                    slot.push(ChannelValue::Text(name));
                }
                TokenKind::Number => slot.push(ChannelValue::Number(token.value()?)),
                TokenKind::Percentage => slot.push(ChannelValue::Number(token.value()? / 100.0)),
                TokenKind::ParenClose => {
                    if depth == 0 {
                        break;
                    }
                    if slot.last() == Some(&ChannelValue::Text(" ".to_owned())) {
                        slot.pop();
                    }
                    slot.push(ChannelValue::Text(token.text));
                    depth -= 1;
                }
                TokenKind::Whitespace => {
                    if depth > 0 {
                        push_space(slot);
                    }
                }
                TokenKind::Comment => {}
                TokenKind::EndOfInput => break,
                TokenKind::Comma
                | TokenKind::Delim
                | TokenKind::Hash
                | TokenKind::Str
                | TokenKind::Other => {
                    if depth > 0 {
                        slot.push(ChannelValue::Text(token.text));
                    }
                }
            }
        }
        let mut values = Vec::with_capacity(slots.len());
        for mut slot in slots {
            if slot.len() > 1 {
                let joined: String = slot.iter().map(ToString::to_string).collect();
                let expression =
                    serialize_calc(self.tokenizer(), &joined, opts, &Bindings::new());
                values.push(ChannelValue::Text(expression));
            } else if let Some(value) = slot.pop() {
                values.push(value);
            }
        }
        Some(values)
    }

    /// Resolve the origin color of a relative color and renormalize its
    /// channel list.
    ///
    /// `currentcolor` is replaced by `opts.current_color`; a nested relative
    /// origin is resolved first. In specified format a simple origin is
    /// normalized and the channels are rewritten as `v1 v2 v3 / v4)`.
    /// Values that are not relative colors are returned lowercased.
    pub fn extract_origin_color(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return None;
        }
        if !is_relative_color(&value) {
            return Some(value);
        }
        let cache_key =
            create_cache_key(&KeyData::new(NAMESPACE, "extractOriginColor", &value), opts);
        if let Some(cached) = self.value_cache_mut().get(cache_key.as_ref()) {
            return cached.item::<String>().cloned();
        }
        let mark = self.value_cache().truncation_mark();
        let extracted = self.extract_origin_uncached(&value, opts);
        self.value_cache_mut()
            .set_since(mark, cache_key.as_ref(), extracted.clone());
        extracted
    }

    fn extract_origin_uncached(&mut self, value: &str, opts: &ResolveOptions) -> Option<String> {
        let mut value = value.to_owned();
        if value.contains("currentcolor") {
            let Some(current) = opts.current_color.as_deref() else {
                debug!("[RELATIVE] currentcolor without a current color");
                return None;
            };
            value = value.replace("currentcolor", &current.to_ascii_lowercase());
        }
        let parts = RelativeParts::parse(self.tokenizer().tokenize(&value))?;
        let mut channel_opts = opts.clone();
        channel_opts.color_space = Some(parts.function.clone());

        let origin = if is_relative_color(&parts.origin) {
            if !self.enter_nested() {
                warn!("[RELATIVE] nesting limit reached resolving {value}");
                self.value_cache_mut().note_truncation();
                return None;
            }
            let nested = self.resolve_relative_color(&parts.origin, opts);
            self.exit_nested();
            nested.ok()??
        } else if opts.format == ValueFormat::Specified {
            if parts.origin.bytes().all(|byte| byte.is_ascii_alphabetic()) {
                if !is_named_color(&parts.origin) {
                    debug!("[RELATIVE] unknown origin {}", parts.origin);
                    return None;
                }
                parts.origin.clone()
            } else {
                self.resolve_color(&parts.origin, opts)?
            }
        } else {
            parts.origin.clone()
        };

        let channels = if opts.format == ValueFormat::Specified {
            let mut queue = TokenQueue::from(parts.channels.clone());
            let values = self.resolve_color_channels(&mut queue, &channel_opts)?;
            match values.as_slice() {
                [first, second, third, alpha] => format!("{first} {second} {third} / {alpha})"),
                _ => {
                    let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                    format!("{})", joined.join(" "))
                }
            }
        } else {
            serialize_tokens(&parts.channels)
        };
        Some(parts.rebuild(&origin, &channels))
    }

    /// Resolve relative color syntax.
    ///
    /// In specified format the value is validated and returned with its
    /// origin resolved. Otherwise it is computed: CIE results keep their
    /// function, anything else becomes `color(<space> …)`.
    ///
    /// # Errors
    /// [`ColorError::UnresolvedVar`] when `value` still contains `var()`
    /// outside specified format.
    pub fn resolve_relative_color(
        &mut self,
        value: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<String>, ColorError> {
        if contains_var(value) {
            if opts.format == ValueFormat::Specified {
                return Ok(Some(value.to_owned()));
            }
            return Err(ColorError::UnresolvedVar(value.to_owned()));
        }
        let value = value.trim().to_ascii_lowercase();
        if !is_relative_color(&value) {
            return Ok(Some(value));
        }
        let cache_key =
            create_cache_key(&KeyData::new(NAMESPACE, "resolveRelativeColor", &value), opts);
        if let Some(cached) = self.value_cache_mut().get(cache_key.as_ref()) {
            return Ok(cached.item::<String>().cloned());
        }
        let mark = self.value_cache().truncation_mark();
        let resolved = if opts.format == ValueFormat::Specified {
            self.extract_origin_color(&value, opts)
                .map(|extracted| normalize_legacy_prefix(&extracted))
        } else {
            self.relative_color_data(&value, opts)
                .map(|color| serialize_relative(&color))
        };
        self.value_cache_mut()
            .set_since(mark, cache_key.as_ref(), resolved.clone());
        Ok(resolved)
    }

    /// Compute a relative color: convert the origin into the target space,
    /// bind its channels to keywords and evaluate the channel list.
    pub(crate) fn relative_color_data(
        &mut self,
        value: &str,
        opts: &ResolveOptions,
    ) -> Option<ColorData> {
        let computed = if opts.format == ValueFormat::Specified {
            opts.clone().with_format(ValueFormat::Computed)
        } else {
            opts.clone()
        };
        let extracted = self.extract_origin_color(value, &computed)?;
        let parts = RelativeParts::parse(self.tokenizer().tokenize(&extracted))?;
        let notation = parts.notation()?;
        let origin = self.resolve_color_data(&parts.origin, &computed)?;
        let bindings = notation.bindings(&origin.to_space(notation.space()));
        let mut queue = TokenQueue::from(parts.channels);
        let list = read_components(&mut queue, &computed, &bindings)?;
        notation.build(&list)
    }
}
