//! Command-line front end for CSS value resolution.
//!
//! `css_resolve <command> <value> [flags]` resolves one value and prints the
//! result to stdout. Gradients are printed as JSON.

mod args;

use crate::args::{Command, Invocation, parse_args};
use anyhow::{Context as _, Result};
use css::{Gradient, ResolveOptions, ResolverConfig, SplitOptions};
use env_logger::{Builder, Env};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{from_slice, to_string_pretty};
use std::env;
use std::fs::read;
use std::io::{Write as _, stderr, stdout};
use std::path::Path;

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CliConfig {
    resolver: ResolverConfig,
    options: ResolveOptions,
}

/// A parsed gradient together with its resolved text.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GradientReport {
    #[serde(flatten)]
    gradient: Gradient,
    resolved: Option<String>,
}

/// Load a config file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
fn load_config(path: &Path) -> Result<CliConfig> {
    let data = read(path).with_context(|| format!("reading {}", path.display()))?;
    let config = from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// `null` for values that resolve to nothing.
fn or_null(value: Option<String>) -> String {
    value.unwrap_or_else(|| "null".to_owned())
}

/// Resolve the value of `invocation` into the lines to print.
///
/// # Errors
/// Returns an error for an unresolved `var()` in a relative color or when a
/// gradient cannot be serialized.
fn run(invocation: &Invocation, opts: &ResolveOptions) -> Result<Vec<String>> {
    let value = invocation.value.as_str();
    let lines = match invocation.command {
        Command::Color => vec![or_null(css::resolve_color(value, opts))],
        Command::Relative => vec![or_null(css::resolve_relative_color(value, opts)?)],
        Command::Var => vec![css::css_var(value, opts)],
        Command::Calc => vec![css::css_calc(value, opts)],
        Command::Split => css::split_value(value, SplitOptions::new(invocation.delimiter)),
        Command::Gradient => {
            let Some(gradient) = css::parse_gradient(value, opts) else {
                return Ok(vec!["null".to_owned()]);
            };
            let report = GradientReport {
                gradient,
                resolved: css::resolve_gradient(value, opts),
            };
            vec![to_string_pretty(&report)?]
        }
    };
    Ok(lines)
}

/// Print usage information to stderr.
fn print_usage() {
    drop(writeln!(
        stderr(),
        "Usage:\n  css_resolve <color|gradient|split|var|calc|relative> <VALUE>\n    \
         [--format computedValue|specifiedValue|hex|hexAlpha] [--current-color <COLOR>]\n    \
         [--property --name=value]... [--dimension unit=px]... [--delimiter ' '|,|/]\n    \
         [--config <FILE.json>]"
    ));
}

/// Main entry point for the `css_resolve` CLI tool.
///
/// # Errors
/// Returns an error if argument parsing, configuration or resolution fails.
fn main() -> Result<()> {
    Builder::from_env(Env::default().filter_or("RUST_LOG", "warn")).init();
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = parse_args(args).inspect_err(|_| print_usage())?;
    let config = match &invocation.config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    debug!("[CLI] {invocation:?} with {config:?}");
    css::configure(config.resolver);
    let opts = invocation.apply(config.options);
    let lines = run(&invocation, &opts)
        .with_context(|| format!("cannot resolve '{}'", invocation.value))?;
    let mut out = stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use css::{Delimiter, ValueFormat};

    fn invocation(command: Command, value: &str) -> Invocation {
        Invocation {
            command,
            value: value.to_owned(),
            format: None,
            current_color: None,
            properties: Vec::new(),
            dimensions: Vec::new(),
            delimiter: Delimiter::Comma,
            config: None,
        }
    }

    #[test]
    fn runs_each_command() {
        let _ = env_logger::builder().is_test(true).try_init();
        let opts = ResolveOptions::default().with_custom_property("--gap", "2px");
        let hex = opts.clone().with_format(ValueFormat::Hex);
        let cases = [
            (Command::Color, "red", &opts, vec!["rgb(255, 0, 0)"]),
            (Command::Color, "red", &hex, vec!["#ff0000"]),
            (Command::Color, "nope(", &opts, vec!["null"]),
            (Command::Relative, "rgb(from red r g b)", &opts, vec!["color(srgb 1 0 0)"]),
            (Command::Var, "var(--gap)", &opts, vec!["2px"]),
            (Command::Calc, "calc(var(--gap) + 1px)", &opts, vec!["3px"]),
            (Command::Split, "a, b(c, d)", &opts, vec!["a", "b(c, d)"]),
            (Command::Gradient, "linear-gradient(red)", &opts, vec!["null"]),
        ];
        for (command, value, options, expected) in cases {
            let lines = run(&invocation(command, value), options).ok();
            let expected = expected.iter().copied().map(str::to_owned).collect();
            assert_eq!(lines, Some(expected), "{value}");
        }
    }

    #[test]
    fn gradient_report() {
        let lines = run(
            &invocation(Command::Gradient, "linear-gradient(to right, red, blue)"),
            &ResolveOptions::default(),
        )
        .unwrap();
        let report: serde_json::Value = serde_json::from_str(&lines.concat()).unwrap();
        assert_eq!(report["type"], "linear-gradient");
        assert_eq!(report["gradientLine"], "to right");
        assert_eq!(
            report["resolved"],
            "linear-gradient(to right, rgb(255, 0, 0), rgb(0, 0, 255))"
        );
    }

    #[test]
    fn relative_var_is_an_error() {
        let result = run(
            &invocation(Command::Relative, "rgb(from var(--x) r g b)"),
            &ResolveOptions::default(),
        );
        assert!(result.is_err_and(|err| err.to_string().contains("var()")));
    }

    #[test]
    fn config_from_json() {
        let config: CliConfig = serde_json::from_str(
            r#"{ "resolver": { "cacheCapacity": 32 }, "options": { "format": "hexAlpha" } }"#,
        )
        .unwrap();
        assert_eq!(config.resolver.cache_capacity, 32);
        assert_eq!(config.options.format, ValueFormat::HexAlpha);
    }
}
