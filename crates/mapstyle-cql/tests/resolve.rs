use proptest::prelude::*;

use mapstyle_core::{
    color::Color,
    expr::{ComparisonOp, EvaluationContext, Expression, Filter, Value},
};
use mapstyle_cql::{ExpressionResolver, Grammar, error::ErrorCode, parse_expression, parse_filter};

fn property_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,12}".prop_filter("keywords are not property names", |name| {
        !Grammar::Extended.is_keyword(name) && !Grammar::Classic.is_keyword(name)
    })
}

#[test]
fn test_resolve_style_expressions() {
    let resolver = ExpressionResolver::new();
    let ctx = EvaluationContext::new()
        .with("lanes", 3)
        .with("name", "Main")
        .with("ref", "A1");

    let width = resolver.resolve_expression("lanes * 1.5 + 0.5").unwrap();
    assert_eq!(width.evaluate(&ctx), Value::Float(5.0));

    let label = resolver
        .resolve_expression("Concatenate(name, ' (', ref, ')')")
        .unwrap();
    assert_eq!(label.evaluate(&ctx), Value::from("Main (A1)"));
}

#[test]
fn test_resolve_filter_evaluates() {
    let filter = mapstyle_cql::filter("type IN ('primary', 'secondary') AND lanes >= 2").unwrap();
    let matching = EvaluationContext::new()
        .with("type", "primary")
        .with("lanes", 2);
    let other = EvaluationContext::new()
        .with("type", "track")
        .with("lanes", 2);
    assert!(filter.evaluate(&matching));
    assert!(!filter.evaluate(&other));
}

#[test]
fn test_classic_only_filters_resolve() {
    let filter = mapstyle_cql::filter("name DOES-NOT-EXIST OR name = ''").unwrap();
    assert!(filter.evaluate(&EvaluationContext::new()));
}

#[test]
fn test_error_codes_from_resolver() {
    let cases = [
        ("'open", ErrorCode::E002),
        ("12abc", ErrorCode::E003),
        ("a * * b", ErrorCode::E100),
        ("width +", ErrorCode::E101),
        ("width height", ErrorCode::E102),
    ];
    for (text, code) in cases {
        let err = mapstyle_cql::expression(text).unwrap_err();
        assert_eq!(err.diagnostic().code(), Some(code), "{text}");
        assert_eq!(err.grammar(), Grammar::Extended);
    }
}

#[test]
fn test_empty_in_list_is_rejected() {
    let err = mapstyle_cql::filter("a IN ()").unwrap_err();
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E100));
    assert_eq!(err.grammar(), Grammar::Extended);

    // Function calls may still take no arguments
    assert!(mapstyle_cql::filter("a IN (random())").is_ok());
}

#[test]
fn test_unicode_property_names() {
    let filter = mapstyle_cql::filter("é = 'x' AND 名前 > 1").unwrap();
    let ctx = EvaluationContext::new().with("é", "x").with("名前", 2);
    assert!(filter.evaluate(&ctx));
    assert_eq!(filter.to_string(), "é = 'x' AND 名前 > 1");
}

#[test]
fn test_diagnostic_label_points_into_source() {
    let text = "pop > 10 AND AND x = 1";
    let err = mapstyle_cql::filter(text).unwrap_err();
    let span = err.diagnostic().primary_span().unwrap();
    assert_eq!(&text[span.range()], "AND");
}

proptest! {
    #[test]
    fn prop_integer_literals(n in (i64::MIN + 1)..=i64::MAX) {
        let expr = mapstyle_cql::expression(&n.to_string()).unwrap();
        prop_assert_eq!(expr, Expression::Literal(Value::Integer(n)));
    }

    #[test]
    fn prop_property_names_resolve(name in property_name()) {
        let expr = mapstyle_cql::expression(&name).unwrap();
        prop_assert_eq!(expr, Expression::property(name));
    }

    #[test]
    fn prop_hex_colors_resolve_through_fallback(hex in "[0-9A-F]{6}") {
        let text = format!("#{hex}");
        prop_assert!(parse_expression(&text, Grammar::Extended).is_err());
        let expr = mapstyle_cql::expression(&text).unwrap();
        let expected = Color::from_hex(&text).unwrap();
        prop_assert_eq!(expr.as_literal(), Some(&Value::Color(expected)));
    }

    #[test]
    fn prop_comparison_display_reparses(
        name in property_name(),
        value in -1000i64..1000,
        op in prop::sample::select(vec![
            ComparisonOp::Equal,
            ComparisonOp::NotEqual,
            ComparisonOp::Less,
            ComparisonOp::LessOrEqual,
            ComparisonOp::Greater,
            ComparisonOp::GreaterOrEqual,
        ]),
    ) {
        let filter = Filter::compare(op, Expression::property(name), value);
        let text = filter.to_string();
        prop_assert_eq!(parse_filter(&text, Grammar::Extended).unwrap(), filter.clone());
        prop_assert_eq!(parse_filter(&text, Grammar::Classic).unwrap(), filter);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "\\PC{0,40}") {
        let _ = mapstyle_cql::expression(&text);
        let _ = mapstyle_cql::filter(&text);
    }
}
