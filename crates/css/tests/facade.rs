use css::{
    Delimiter, ResolveOptions, ResolverConfig, SplitOptions, TRANSPARENT_RGBA, ValueFormat,
};

#[test]
fn colors_through_the_thread_resolver() {
    let _ = env_logger::builder().is_test(true).try_init();
    let opts = ResolveOptions::default();
    assert_eq!(css::resolve_color("red", &opts).as_deref(), Some("rgb(255, 0, 0)"));
    assert_eq!(
        css::resolve_color("transparent", &opts).as_deref(),
        Some(TRANSPARENT_RGBA)
    );
    let hex = ResolveOptions::default().with_format(ValueFormat::Hex);
    assert_eq!(css::resolve_color("red", &hex).as_deref(), Some("#ff0000"));
    assert!(css::is_color("color-mix(in srgb, red, blue)", &opts));
    assert!(!css::is_color("10px", &opts));
}

#[test]
fn unresolved_vars_by_entry_point() {
    let nullable = ResolveOptions::default().with_nullable(true);
    assert_eq!(css::resolve_color("var(--missing)", &nullable), None);
    assert_eq!(
        css::resolve("var(--missing)", &nullable).as_deref(),
        Some(TRANSPARENT_RGBA)
    );
    assert!(css::resolve_relative_color("rgb(from var(--a) r g b)", &nullable).is_err_and(
        |err| matches!(err, css::ColorError::UnresolvedVar(_))
    ));
}

#[test]
fn relative_color_keeps_red_channels() {
    let opts = ResolveOptions::default();
    assert_eq!(
        css::resolve_relative_color("color(from red srgb r g b)", &opts),
        Ok(Some("color(srgb 1 0 0)".to_owned()))
    );
}

#[test]
fn gradients_through_the_thread_resolver() {
    let opts = ResolveOptions::default();
    for value in [
        "radial-gradient(circle, red, blue)",
        "linear-gradient(to right, red, 10px, blue)",
        "conic-gradient(from 10deg, red, blue)",
        "linear-gradient(10px, red, blue)",
        "linear-gradient(red, 10px, 20px, blue)",
    ] {
        let parsed = css::parse_gradient(value, &opts);
        assert_eq!(css::is_gradient(value, &opts), parsed.is_some(), "{value}");
        if let Some(gradient) = parsed {
            assert!(css::validate_color_stop_list(
                &gradient.color_stop_list,
                gradient.gradient_type,
                &opts
            ));
        }
    }
    assert_eq!(
        css::get_gradient_type("radial-gradient(circle, red, blue)").map(css::GradientType::as_str),
        Some("radial-gradient")
    );
    assert_eq!(
        css::resolve_gradient("linear-gradient(red, blue)", &opts).as_deref(),
        Some("linear-gradient(rgb(255, 0, 0), rgb(0, 0, 255))")
    );
}

#[test]
fn values_and_variables() {
    let opts = ResolveOptions::default().with_custom_property("--gap", "4px");
    assert_eq!(
        css::split_value("a b  c", SplitOptions::new(Delimiter::Space)),
        ["a", "b", "c"]
    );
    assert_eq!(css::css_var("var(--gap)", &opts), "4px");
    assert_eq!(css::resolve_var("var(--nope)", &opts), None);
    assert_eq!(css::css_calc("calc(1px + 2px)", &opts), "3px");
    assert_eq!(css::css_calc("calc(var(--gap) * 2)", &opts), "8px");
    assert_eq!(css::extract_dashed_ident("var(--a, var(--b))"), ["--a", "--b"]);
    assert_eq!(css::round_to_precision(1.0 / 3.0, 4), Ok(0.3333));
}

#[test]
fn configure_replaces_the_cache() {
    let opts = ResolveOptions::default();
    assert!(css::resolve_color("blue", &opts).is_some());
    css::configure(ResolverConfig {
        cache_capacity: 8,
        ..ResolverConfig::default()
    });
    let state = css::with_resolver(|resolver| {
        (resolver.value_cache().capacity(), resolver.value_cache().len())
    });
    assert_eq!(state, Some((8, 0)));
    assert!(css::resolve_color("blue", &opts).is_some());
    css::clear_cache();
    let len = css::with_resolver(|resolver| resolver.value_cache().len());
    assert_eq!(len, Some(0));
}

#[test]
fn callbacks_cannot_reenter_the_thread_resolver() {
    let _ = env_logger::builder().is_test(true).try_init();
    let opts = ResolveOptions::default().with_property_callback(|_| {
        css::resolve_color("red", &ResolveOptions::default())
    });
    assert_eq!(css::resolve_color("var(--accent)", &opts).as_deref(), Some(TRANSPARENT_RGBA));
    assert_eq!(
        css::resolve_color("var(--accent, blue)", &opts).as_deref(),
        Some("rgb(0, 0, 255)")
    );
    let nested = css::with_resolver(|_| css::is_color("red", &ResolveOptions::default()));
    assert_eq!(nested, Some(false));
    assert!(css::is_color("red", &ResolveOptions::default()));
}
