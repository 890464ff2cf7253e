use core::cell::Cell;
use css_syntax::{CssTokenizer, TokenQueue, Tokenize};
use css_values_units::{ResolveOptions, ValueFormat, css_calc};
use css_variables::{VarContext, css_var, resolve_var};
use std::rc::Rc;
use value_cache::ValueCache;

/// Context with a tiny color table and a tokenizer call counter.
struct TestContext {
    cache: ValueCache,
    calls: Rc<Cell<usize>>,
    depth: usize,
}

impl TestContext {
    fn new() -> Self {
        Self {
            cache: ValueCache::default(),
            calls: Rc::new(Cell::new(0)),
            depth: 0,
        }
    }
}

impl VarContext for TestContext {
    fn cache(&mut self) -> &mut ValueCache {
        &mut self.cache
    }

    fn tokenize(&self, css: &str) -> TokenQueue {
        self.calls.set(self.calls.get() + 1);
        CssTokenizer.tokenize(css)
    }

    fn calc(&mut self, value: &str, opts: &ResolveOptions) -> String {
        css_calc(&mut self.cache, &CssTokenizer, value, opts)
    }

    fn is_color_value(&mut self, value: &str, _opts: &ResolveOptions) -> bool {
        matches!(value, "red" | "blue" | "green") || value.starts_with('#')
    }

    fn enter_nested(&mut self) -> bool {
        if self.depth >= 16 {
            return false;
        }
        self.depth += 1;
        true
    }

    fn exit_nested(&mut self) {
        self.depth -= 1;
    }
}

#[test]
fn substitutes_defined_properties() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default().with_custom_property("--pad", "10px");
    assert_eq!(css_var(&mut ctx, "var(--pad)", &opts), "10px");
    assert_eq!(
        resolve_var(&mut ctx, "1px var(--pad) 2px", &opts).as_deref(),
        Some("1px 10px 2px")
    );
}

#[test]
fn falls_back_in_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default().with_custom_property("--b", "blue");
    assert_eq!(css_var(&mut ctx, "var(--mt, 2px)", &opts), "2px");
    assert_eq!(css_var(&mut ctx, "var(--a, var(--b), red)", &opts), "blue");
    assert_eq!(css_var(&mut ctx, "var(--a, var(--c), red)", &opts), "red");
    assert_eq!(css_var(&mut ctx, "var(--a, rgb(0 0 0))", &opts), "rgb(0 0 0)");
}

#[test]
fn color_fallback_rejects_non_colors() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default().with_custom_property("--size", "10px");
    assert_eq!(css_var(&mut ctx, "var(--size, red)", &opts), "red");
}

#[test]
fn css_wide_keywords_are_skipped() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default().with_custom_property("--a", "inherit");
    assert_eq!(css_var(&mut ctx, "var(--a, 4px)", &opts), "4px");
}

#[test]
fn indirection_and_math_are_resolved() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default()
        .with_custom_property("--a", "33px")
        .with_custom_property("--b", "var(--a)");
    assert_eq!(css_var(&mut ctx, "var(--b)", &opts), "33px");
    assert_eq!(css_var(&mut ctx, "calc(var(--a) + 1px)", &opts), "34px");
}

#[test]
fn cycles_fail_instead_of_recursing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default()
        .with_custom_property("--x", "var(--y)")
        .with_custom_property("--y", "var(--x)");
    assert_eq!(resolve_var(&mut ctx, "var(--x)", &opts), None);
    assert_eq!(ctx.depth, 0);
}

#[test]
fn undefined_without_fallback_is_none() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default();
    assert_eq!(resolve_var(&mut ctx, "var(--missing)", &opts), None);
    assert_eq!(css_var(&mut ctx, "var(--missing)", &opts), "");
}

#[test]
fn specified_format_and_plain_values_pass_through() {
    let mut ctx = TestContext::new();
    let specified = ResolveOptions::default().with_format(ValueFormat::Specified);
    assert_eq!(css_var(&mut ctx, "var(--a)", &specified), "var(--a)");
    assert_eq!(css_var(&mut ctx, "red", &ResolveOptions::default()), "red");
    assert_eq!(ctx.calls.get(), 0);
}

#[test]
fn second_resolution_skips_the_tokenizer() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default().with_custom_property("--a", "red");
    let first = resolve_var(&mut ctx, "var(--a)", &opts);
    let calls = ctx.calls.get();
    let second = resolve_var(&mut ctx, "var(--a)", &opts);
    assert_eq!(first, second);
    assert_eq!(ctx.calls.get(), calls);
}

#[test]
fn callbacks_supply_missing_properties() {
    let mut ctx = TestContext::new();
    let opts = ResolveOptions::default()
        .with_property_callback(|name| (name == "--dyn").then(|| "green".to_owned()));
    assert_eq!(css_var(&mut ctx, "var(--dyn)", &opts), "green");
}
