//! Regular-expression fragments for value grammars.
//!
//! Fragments are plain `regex` source and are meant to be spliced into
//! larger patterns with `format!`.

use regex::Regex;

/// `<angle>` units.
pub const ANGLE: &str = "deg|g?rad|turn";

/// `<length>` units.
pub const LENGTH: &str =
    "[cm]m|[dls]?v(?:[bhiw]|max|min)|in|p[ct]|q|r?(?:[cl]h|cap|e[mx]|ic)|px";

/// A signed `<number>`.
pub const NUM: &str = r"[+-]?(?:(?:0|[1-9]\d*)(?:\.\d*)?|\.\d+)(?:e-?(?:0|[1-9]\d*))?";

/// An unsigned or explicitly positive `<number>`.
pub const NUM_POSITIVE: &str = r"\+?(?:(?:0|[1-9]\d*)(?:\.\d*)?|\.\d+)(?:e-?(?:0|[1-9]\d*))?";

/// A signed `<percentage>`.
pub const PCT: &str = r"[+-]?(?:(?:0|[1-9]\d*)(?:\.\d*)?|\.\d+)(?:e-?(?:0|[1-9]\d*))?%";

/// Names of math functions.
pub const MATH_FUNCTIONS: &[&str] = &[
    "abs", "acos", "asin", "atan", "atan2", "calc", "clamp", "cos", "exp", "hypot", "log", "max",
    "min", "mod", "pow", "rem", "round", "sign", "sin", "sqrt", "tan",
];

/// Alternation matching any math function name.
pub const MATH_FUNCTION_NAMES: &str =
    "abs|a?(?:cos|sin|tan)|atan2|calc|clamp|exp|hypot|log|max|min|mod|pow|rem|round|sign|sqrt";

/// Compile a pattern built from the fragments above.
///
/// A pattern that fails to compile is logged and treated as never matching.
pub fn compile_regex(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::error!("[GRAMMAR] invalid pattern {pattern}: {err}");
            None
        }
    }
}

/// Whether a lazily compiled pattern matches `value`.
#[inline]
pub fn is_match(regex: Option<&Regex>, value: &str) -> bool {
    regex.is_some_and(|compiled| compiled.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(fragment: &str) -> Regex {
        Regex::new(&format!("^(?:{fragment})$")).unwrap()
    }

    #[test]
    fn numbers() {
        let num = full(NUM);
        for ok in ["0", "-1", "+1.5", ".5", "10e3", "1.e-2"] {
            assert!(num.is_match(ok), "{ok}");
        }
        for bad in ["", "01", "1..2", "e3"] {
            assert!(!num.is_match(bad), "{bad}");
        }
        assert!(!full(NUM_POSITIVE).is_match("-1"));
        assert!(full(PCT).is_match("-12.5%"));
    }

    #[test]
    fn units() {
        let length = full(LENGTH);
        for ok in ["px", "em", "rem", "vh", "dvmin", "cm", "q", "rlh", "cap"] {
            assert!(length.is_match(ok), "{ok}");
        }
        assert!(!length.is_match("deg"));
        let angle = full(ANGLE);
        for ok in ["deg", "grad", "rad", "turn"] {
            assert!(angle.is_match(ok), "{ok}");
        }
    }

    #[test]
    fn math_alternation_matches_every_name() {
        let names = full(MATH_FUNCTION_NAMES);
        for name in MATH_FUNCTIONS {
            assert!(names.is_match(name), "{name}");
        }
    }
}
