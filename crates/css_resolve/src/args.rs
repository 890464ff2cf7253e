//! Command-line parsing for `css_resolve`.

use anyhow::{Context as _, Result, anyhow};
use css::{Delimiter, ResolveOptions, ValueFormat};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Color,
    Gradient,
    Split,
    Var,
    Calc,
    Relative,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "color" => Some(Self::Color),
            "gradient" => Some(Self::Gradient),
            "split" => Some(Self::Split),
            "var" => Some(Self::Var),
            "calc" => Some(Self::Calc),
            "relative" => Some(Self::Relative),
            _ => None,
        }
    }
}

/// A parsed command line. Flags are applied on top of the config file.
#[derive(Debug)]
pub struct Invocation {
    pub command: Command,
    pub value: String,
    pub format: Option<ValueFormat>,
    pub current_color: Option<String>,
    pub properties: Vec<(String, String)>,
    pub dimensions: Vec<(String, f64)>,
    pub delimiter: Delimiter,
    pub config: Option<PathBuf>,
}

impl Invocation {
    /// Apply the flags to `opts`.
    pub fn apply(&self, mut opts: ResolveOptions) -> ResolveOptions {
        if let Some(format) = self.format {
            opts = opts.with_format(format);
        }
        if let Some(color) = &self.current_color {
            opts = opts.with_current_color(color.clone());
        }
        for (name, value) in &self.properties {
            opts = opts.with_custom_property(name.clone(), value.clone());
        }
        for (unit, px) in &self.dimensions {
            opts = opts.with_dimension(unit.clone(), *px);
        }
        opts
    }
}

fn parse_delimiter(text: &str) -> Result<Delimiter> {
    match text {
        " " | "space" => Ok(Delimiter::Space),
        "," | "comma" => Ok(Delimiter::Comma),
        "/" | "slash" => Ok(Delimiter::Slash),
        _ => Err(anyhow!("unknown delimiter '{text}'")),
    }
}

/// Split `--name=value` into the custom property and its value.
fn parse_property(text: &str) -> Result<(String, String)> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("expected --name=value, got '{text}'"))?;
    if !name.starts_with("--") {
        return Err(anyhow!("custom property '{name}' must start with --"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Split `unit=px` into the unit and its size.
fn parse_dimension(text: &str) -> Result<(String, f64)> {
    let (unit, px) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("expected unit=px, got '{text}'"))?;
    let px = px
        .parse::<f64>()
        .with_context(|| format!("invalid pixel size in '{text}'"))?;
    Ok((unit.to_owned(), px))
}

/// Parse the arguments after the program name.
///
/// # Errors
/// Returns an error for a missing or unknown command, a missing value, or a
/// malformed flag.
pub fn parse_args(args: Vec<String>) -> Result<Invocation> {
    let mut args = args.into_iter();
    let name = args.next().ok_or_else(|| anyhow!("missing command"))?;
    let command = Command::from_name(&name).ok_or_else(|| anyhow!("unknown command '{name}'"))?;
    let mut invocation = Invocation {
        command,
        value: String::new(),
        format: None,
        current_color: None,
        properties: Vec::new(),
        dimensions: Vec::new(),
        delimiter: Delimiter::Space,
        config: None,
    };
    let mut value = None;
    while let Some(arg) = args.next() {
        let mut flag_value = || {
            args.next()
                .ok_or_else(|| anyhow!("{arg} needs a value"))
        };
        match arg.as_str() {
            "--format" => {
                let format = flag_value()?;
                invocation.format = Some(
                    ValueFormat::from_name(&format)
                        .ok_or_else(|| anyhow!("unknown format '{format}'"))?,
                );
            }
            "--current-color" => invocation.current_color = Some(flag_value()?),
            "--property" => invocation.properties.push(parse_property(&flag_value()?)?),
            "--dimension" => invocation.dimensions.push(parse_dimension(&flag_value()?)?),
            "--delimiter" => invocation.delimiter = parse_delimiter(&flag_value()?)?,
            "--config" => invocation.config = Some(PathBuf::from(flag_value()?)),
            _ if value.is_none() => value = Some(arg),
            _ => return Err(anyhow!("unexpected argument '{arg}'")),
        }
    }
    invocation.value = value.ok_or_else(|| anyhow!("missing value for '{name}'"))?;
    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().copied().map(str::to_owned).collect()
    }

    #[test]
    fn commands_and_flags() {
        let invocation = parse_args(args(&[
            "color",
            "var(--accent)",
            "--format",
            "hex",
            "--property",
            "--accent=red",
            "--dimension",
            "em=16",
            "--current-color",
            "blue",
        ]))
        .unwrap();
        assert_eq!(invocation.command, Command::Color);
        assert_eq!(invocation.value, "var(--accent)");
        let opts = invocation.apply(ResolveOptions::default());
        assert_eq!(opts.format, ValueFormat::Hex);
        assert_eq!(opts.lookup_custom_property("--accent").as_deref(), Some("red"));
        assert_eq!(opts.lookup_dimension("em"), Some(16.0));
        assert_eq!(opts.current_color.as_deref(), Some("blue"));
    }

    #[test]
    fn delimiters() {
        let delimiter = parse_args(args(&["split", "a,b", "--delimiter", ","]))
            .map(|invocation| invocation.delimiter)
            .ok();
        assert_eq!(delimiter, Some(Delimiter::Comma));
        assert_eq!(parse_delimiter("slash").ok(), Some(Delimiter::Slash));
        assert!(parse_delimiter(";").is_err_and(|err| err.to_string().contains("';'")));
    }

    #[test]
    fn malformed_invocations() {
        for line in [
            &[][..],
            &["paint", "red"],
            &["color"],
            &["color", "red", "blue"],
            &["color", "red", "--format"],
            &["color", "red", "--format", "rgb"],
            &["var", "var(--a)", "--property", "a=red"],
            &["calc", "1em", "--dimension", "em=big"],
        ] {
            let command = parse_args(args(line)).ok().map(|invocation| invocation.command);
            assert_eq!(command, None, "{line:?}");
        }
    }
}
