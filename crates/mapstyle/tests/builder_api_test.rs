//! Integration tests for the public builder API.
//!
//! These exercise whole trees through the crate's public surface: the
//! builder catalogue, root materialization and the self-resetting roots.

use float_cmp::approx_eq;
use proptest::prelude::*;

use mapstyle::{
    AnchorPointBuilder, BuildError, Builder, ChannelSelectionBuilder, ColorMapBuilder,
    ColorMapEntryBuilder, ColorReplacementBuilder, ContrastEnhancementBuilder,
    DescriptionBuilder, DisplacementBuilder, ExtentBuilder, ExternalGraphicBuilder,
    ExternalMarkBuilder, FeatureTypeConstraintBuilder, FeatureTypeStyleBuilder, FillBuilder,
    FontBuilder, GraphicBuilder, HaloBuilder, LinePlacementBuilder, LineSymbolizerBuilder,
    MarkBuilder, NamedLayerBuilder, PointPlacementBuilder, PointSymbolizerBuilder,
    PolygonSymbolizerBuilder, RasterSymbolizerBuilder, RuleBuilder, SelectedChannelBuilder,
    ShadedReliefBuilder, Status, StrokeBuilder, StyleBuilder, StyleKit,
    StyledLayerDescriptorBuilder, TextSymbolizerBuilder, UserLayerBuilder,
    color::Color,
    expr::{EvaluationContext, Expression},
    style::{ColorMapKind, LineCap, LineJoin},
};

fn literal(expr: Option<&Expression>) -> Option<f64> {
    expr.and_then(|e| e.literal_f64())
}

#[test]
fn test_unset_stroke_builds_nothing() {
    assert!(StrokeBuilder::new().unset().build().is_none());
}

/// Checks the laws every builder kind follows:
/// an unset builder builds nothing, a setter on an unset builder makes it
/// build, and a root is back to its defaults after building.
fn check_builder_laws<B: Builder + Default>(kind: &str, set: impl Fn(&B)) {
    let builder = B::default();
    assert_eq!(builder.status(), Status::Default, "{kind}: roots start populated");
    assert!(builder.unset().build().is_none(), "{kind}: unset builds nothing");

    set(&builder);
    assert_eq!(builder.status(), Status::Explicit, "{kind}: setter marks explicit");
    assert!(builder.build().is_some(), "{kind}: setter on unset builds");
    assert_eq!(builder.status(), Status::Default, "{kind}: root resets after build");
}

#[test]
fn test_every_builder_kind_follows_the_laws() {
    check_builder_laws::<AnchorPointBuilder>("anchor point", |b| {
        b.x(0.5);
    });
    check_builder_laws::<DisplacementBuilder>("displacement", |b| {
        b.x(2.0);
    });
    check_builder_laws::<DescriptionBuilder>("description", |b| {
        b.title("Roads");
    });
    check_builder_laws::<ExtentBuilder>("extent", |b| {
        b.name("time");
    });
    check_builder_laws::<FillBuilder>("fill", |b| {
        b.opacity(0.5);
    });
    check_builder_laws::<StrokeBuilder>("stroke", |b| {
        b.width(2.0);
    });
    check_builder_laws::<ExternalMarkBuilder>("external mark", |b| {
        b.uri("file:///shapes.ttf");
    });
    check_builder_laws::<ColorReplacementBuilder>("color replacement", |b| {
        b.property(Expression::property("kind"));
    });
    check_builder_laws::<MarkBuilder>("mark", |b| {
        b.well_known_name("circle");
    });
    check_builder_laws::<ExternalGraphicBuilder>("external graphic", |b| {
        b.uri("https://example.org/icon.png");
    });
    check_builder_laws::<GraphicBuilder>("graphic", |b| {
        b.size(8.0);
    });
    check_builder_laws::<HaloBuilder>("halo", |b| {
        b.radius(2.0);
    });
    check_builder_laws::<FontBuilder>("font", |b| {
        b.size(12.0);
    });
    check_builder_laws::<PointPlacementBuilder>("point placement", |b| {
        b.rotation(45.0);
    });
    check_builder_laws::<LinePlacementBuilder>("line placement", |b| {
        b.repeated(true);
    });
    check_builder_laws::<ShadedReliefBuilder>("shaded relief", |b| {
        b.relief_factor(30.0);
    });
    check_builder_laws::<ContrastEnhancementBuilder>("contrast enhancement", |b| {
        b.gamma(1.5);
    });
    check_builder_laws::<ColorMapEntryBuilder>("color map entry", |b| {
        b.quantity(1.0);
    });
    check_builder_laws::<ColorMapBuilder>("color map", |b| {
        b.kind(ColorMapKind::Intervals);
    });
    check_builder_laws::<SelectedChannelBuilder>("selected channel", |b| {
        b.channel_name("1");
    });
    check_builder_laws::<ChannelSelectionBuilder>("channel selection", |b| {
        b.gray();
    });
    check_builder_laws::<PointSymbolizerBuilder>("point symbolizer", |b| {
        b.graphic();
    });
    check_builder_laws::<LineSymbolizerBuilder>("line symbolizer", |b| {
        b.perpendicular_offset(1.0);
    });
    check_builder_laws::<PolygonSymbolizerBuilder>("polygon symbolizer", |b| {
        b.perpendicular_offset(1.0);
    });
    check_builder_laws::<TextSymbolizerBuilder>("text symbolizer", |b| {
        b.priority(10.0);
    });
    check_builder_laws::<RasterSymbolizerBuilder>("raster symbolizer", |b| {
        b.opacity(0.5);
    });
    check_builder_laws::<RuleBuilder>("rule", |b| {
        b.name("water");
    });
    check_builder_laws::<FeatureTypeStyleBuilder>("feature type style", |b| {
        b.name("roads");
    });
    check_builder_laws::<StyleBuilder>("style", |b| {
        b.name("roads");
    });
    check_builder_laws::<FeatureTypeConstraintBuilder>("feature type constraint", |b| {
        b.feature_type_name("roads");
    });
    check_builder_laws::<NamedLayerBuilder>("named layer", |b| {
        b.name("roads");
    });
    check_builder_laws::<UserLayerBuilder>("user layer", |b| {
        b.name("roads");
    });
    check_builder_laws::<StyledLayerDescriptorBuilder>("styled layer descriptor", |b| {
        b.name("basemap");
    });
}

#[test]
fn test_stroke_with_color_and_width() {
    let stroke = StrokeBuilder::new()
        .color("#FF0000")
        .width(2.0)
        .build()
        .expect("explicit stroke builds");

    let color = stroke
        .color()
        .map(|c| c.evaluate(&EvaluationContext::new()))
        .and_then(|v| v.to_color());
    assert_eq!(color, Color::from_hex("#FF0000").ok());
    assert!(approx_eq!(f64, literal(stroke.width()).unwrap(), 2.0));
    assert!(approx_eq!(f64, literal(stroke.opacity()).unwrap(), 1.0));
    assert_eq!(stroke.line_cap(), Some(&Expression::from(LineCap::Butt)));
    assert_eq!(stroke.line_join(), Some(&Expression::from(LineJoin::Miter)));
}

#[test]
fn test_fill_color_hex_evaluates_to_rgb() {
    let fill = FillBuilder::new()
        .color_hex("#00FF00")
        .expect("valid literal")
        .build()
        .unwrap();

    let color = fill
        .color()
        .unwrap()
        .evaluate(&EvaluationContext::new())
        .to_color()
        .unwrap();
    assert_eq!(color.to_rgb8(), [0, 255, 0]);
}

#[test]
fn test_color_hex_rejects_bad_literal() {
    let fill = FillBuilder::new();
    let err = fill.color_hex("#0F").unwrap_err();
    assert!(matches!(err, BuildError::InvalidColor { ref literal, .. } if literal == "#0F"));
    assert_eq!(fill.status(), Status::Default, "failed setter leaves the builder alone");
}

#[test]
fn test_color_map_entry_defaults_opacity_only() {
    let entry = ColorMapEntryBuilder::new()
        .quantity(10.0)
        .label("ten")
        .build()
        .unwrap();

    assert_eq!(entry.label(), Some("ten"));
    assert!(approx_eq!(f64, literal(entry.quantity()).unwrap(), 10.0));
    assert!(approx_eq!(f64, literal(entry.opacity()).unwrap(), 1.0));
    assert!(entry.color().is_none());
}

#[test]
fn test_style_root_resets_after_build() {
    let builder = StyleBuilder::new();
    builder
        .feature_type_style()
        .rule()
        .polygon()
        .fill()
        .color("#112233");

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();

    assert_eq!(first.feature_type_styles().len(), 1);
    let rule = &first.feature_type_styles()[0].rules()[0];
    let fill = rule.symbolizers()[0]
        .as_polygon()
        .and_then(|polygon| polygon.fill())
        .unwrap();
    assert_eq!(
        fill.color()
            .unwrap()
            .evaluate(&EvaluationContext::new())
            .to_color()
            .unwrap()
            .to_rgb8(),
        [0x11, 0x22, 0x33]
    );

    assert!(second.feature_type_styles().is_empty());
}

#[test]
fn test_build_style_from_deep_child_resets_root() {
    let root = StyleBuilder::new();
    let stroke = root.feature_type_style().rule().line().stroke();
    stroke.width(5.0);

    let style = stroke.build_style().unwrap().unwrap();
    let line = style.feature_type_styles()[0].rules()[0].symbolizers()[0]
        .as_line()
        .unwrap();
    assert!(approx_eq!(f64, literal(line.stroke().unwrap().width()).unwrap(), 5.0));

    assert!(root.build().unwrap().feature_type_styles().is_empty());
    assert_eq!(stroke.build_style(), Err(BuildError::Detached));
}

#[test]
fn test_build_sld_climbs_to_descriptor_root() {
    let sld = StyledLayerDescriptorBuilder::new();
    sld.name("basemap");
    let layer = sld.named_layer();
    layer.name("roads");
    let rule = layer.style().feature_type_style().rule();
    rule.cql_filter("class = 'motorway'").unwrap();
    rule.line().stroke().width(7.0);

    let built = rule.build_sld().unwrap().unwrap();
    assert_eq!(built.name(), Some("basemap"));
    assert_eq!(built.layers()[0].name(), Some("roads"));

    let rule = &built.layers()[0].styles()[0].feature_type_styles()[0].rules()[0];
    let ctx = EvaluationContext::new().with("class", "motorway");
    assert!(rule.filter().unwrap().evaluate(&ctx));
    let stroke = rule.symbolizers()[0].as_line().unwrap().stroke().unwrap();
    assert!(approx_eq!(f64, literal(stroke.width()).unwrap(), 7.0));
}

#[test]
fn test_lower_roots_are_wrapped() {
    let stroke = StrokeBuilder::new();
    stroke.width(3.0);
    let sld = stroke.build_sld().unwrap().unwrap();

    let style = sld.styles().next().unwrap();
    let symbolizer = &style.feature_type_styles()[0].rules()[0].symbolizers()[0];
    let line = symbolizer.as_line().expect("stroke becomes a line symbolizer");
    assert!(approx_eq!(f64, literal(line.stroke().unwrap().width()).unwrap(), 3.0));
}

#[test]
fn test_meaningless_roots_are_unsupported() {
    let entry = ColorMapEntryBuilder::new();
    entry.quantity(1.0);
    assert!(matches!(
        entry.build_style(),
        Err(BuildError::Unsupported { target: "style", .. })
    ));
    assert_eq!(entry.status(), Status::Explicit, "unsupported root is left alone");

    let sld = StyledLayerDescriptorBuilder::new();
    assert!(matches!(
        sld.named_layer().build_style(),
        Err(BuildError::Unsupported { .. })
    ));
}

#[test]
fn test_unset_root_materializes_nothing() {
    let line = LineSymbolizerBuilder::new();
    line.unset();
    assert_eq!(line.build_style(), Ok(None));
}

#[test]
fn test_classic_only_literal_resolves_by_fallback() {
    let kit = StyleKit::default();

    let color = kit.expression("#FF0000").unwrap();
    assert_eq!(
        color.evaluate(&EvaluationContext::new()).to_color(),
        Color::from_hex("#FF0000").ok()
    );

    assert!(kit.expression("1 +").is_err());
}

#[test]
fn test_rule_round_trip_through_reset_from() {
    let source = RuleBuilder::new();
    source.name("water").max_scale_denominator(50_000.0);
    source.polygon().fill().color("#0000FF");
    source.text().label(Expression::property("name"));
    let value = source.build().unwrap();

    let copy = RuleBuilder::new();
    copy.reset_from(Some(&value));
    assert_eq!(copy.status(), Status::Explicit);
    assert_eq!(copy.build(), Some(value));
}

proptest! {
    #[test]
    fn test_setter_on_unset_builder_builds(width in 0.0f64..100.0) {
        let stroke = StrokeBuilder::new();
        stroke.unset().width(width);
        let built = stroke.build();
        prop_assert!(built.is_some());
        prop_assert_eq!(literal(built.as_ref().and_then(|s| s.width())), Some(width));
    }

    #[test]
    fn test_root_stamps_independent_trees(rules in 1usize..6) {
        let style = StyleBuilder::new();
        let fts = style.feature_type_style();
        for _ in 0..rules {
            fts.rule().line();
        }

        let first = style.build().unwrap();
        prop_assert_eq!(first.feature_type_styles()[0].rules().len(), rules);
        prop_assert!(style.build().unwrap().feature_type_styles().is_empty());
    }

    #[test]
    fn test_scale_round_trip(min in 0.0f64..1e6, span in 0.0f64..1e6) {
        let rule = RuleBuilder::new();
        rule.min_scale_denominator(min).max_scale_denominator(min + span);
        let value = rule.build().unwrap();

        let copy = RuleBuilder::new();
        copy.reset_from(Some(&value));
        prop_assert_eq!(copy.build(), Some(value));
    }
}
