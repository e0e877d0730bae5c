//! Root materialization: building a style or a styled layer descriptor from
//! any node of a tree.
//!
//! The root of the tree is built with [`Cursor::build`] (which recycles it)
//! and lifted level by level until it reaches the requested target. A root
//! below the symbolizer level is first wrapped into the symbolizer that
//! draws it; every enclosing value added on the way up comes from the
//! factory defaults.

use log::debug;

use mapstyle_core::{
    factory::StyleFactory,
    style::{
        ChannelSelection, ColorMap, ContrastEnhancement, FeatureTypeStyle, Fill, Font, Graphic,
        GraphicalSymbol, Halo, LabelPlacement, Rule, ShadedRelief, Stroke, Style, StyledLayer,
        StyledLayerDescriptor, Symbolizer,
    },
};

use crate::{
    builder::{
        fill::FillNode,
        graphic::{ExternalGraphicNode, GraphicNode, MarkNode},
        layer::{NamedLayerNode, StyleNode, StyledLayerDescriptorNode, UserLayerNode},
        raster::{ChannelSelectionNode, ColorMapNode, ContrastEnhancementNode, ShadedReliefNode},
        rule::{FeatureTypeStyleNode, RuleNode},
        stroke::StrokeNode,
        symbolizer::{
            LineSymbolizerNode, PointSymbolizerNode, PolygonSymbolizerNode, RasterSymbolizerNode,
            TextSymbolizerNode,
        },
        text::{FontNode, HaloNode, LinePlacementNode, PointPlacementNode},
    },
    cursor::Cursor,
    error::BuildError,
    node::NodeKind,
};

/// Levels a root can be lifted from, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Symbolizer,
    Rule,
    FeatureTypeStyle,
    Style,
    Layer,
    Descriptor,
}

impl Level {
    /// The level a root of `kind` enters at, or `None` when it has no
    /// standalone meaning.
    fn of(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Stroke
            | NodeKind::Fill
            | NodeKind::Graphic
            | NodeKind::Mark
            | NodeKind::ExternalGraphic
            | NodeKind::Font
            | NodeKind::Halo
            | NodeKind::PointPlacement
            | NodeKind::LinePlacement
            | NodeKind::ChannelSelection
            | NodeKind::ColorMap
            | NodeKind::ContrastEnhancement
            | NodeKind::ShadedRelief
            | NodeKind::PointSymbolizer
            | NodeKind::LineSymbolizer
            | NodeKind::PolygonSymbolizer
            | NodeKind::TextSymbolizer
            | NodeKind::RasterSymbolizer => Some(Self::Symbolizer),
            NodeKind::Rule => Some(Self::Rule),
            NodeKind::FeatureTypeStyle => Some(Self::FeatureTypeStyle),
            NodeKind::Style => Some(Self::Style),
            NodeKind::NamedLayer | NodeKind::UserLayer => Some(Self::Layer),
            NodeKind::StyledLayerDescriptor => Some(Self::Descriptor),
            NodeKind::AnchorPoint
            | NodeKind::Displacement
            | NodeKind::Description
            | NodeKind::Extent
            | NodeKind::ExternalMark
            | NodeKind::ColorReplacement
            | NodeKind::ColorMapEntry
            | NodeKind::SelectedChannel
            | NodeKind::FeatureTypeConstraint => None,
        }
    }
}

/// A built root at its entry level.
enum Materialized {
    Symbolizer(Symbolizer),
    Rule(Rule),
    FeatureTypeStyle(FeatureTypeStyle),
    Style(Style),
    Layer(StyledLayer),
    Descriptor(StyledLayerDescriptor),
}

/// Builds the style enclosing the cursor's node.
pub(crate) fn build_style(cursor: &Cursor) -> Result<Option<Style>, BuildError> {
    let (root, kind) = locate_root(cursor)?;
    match Level::of(kind) {
        Some(level) if level <= Level::Style => {}
        _ => return Err(unsupported(kind, "style")),
    }
    debug!(builder = kind.name(), target = "style"; "Materializing from root");

    let factory = cursor.factory();
    let Some(built) = build_root(&root, kind, factory.as_ref()) else {
        return Ok(None);
    };
    lift_to_style(built, factory.as_ref())
        .map(Some)
        .ok_or_else(|| unsupported(kind, "style"))
}

/// Builds the styled layer descriptor enclosing the cursor's node.
pub(crate) fn build_sld(cursor: &Cursor) -> Result<Option<StyledLayerDescriptor>, BuildError> {
    let (root, kind) = locate_root(cursor)?;
    if Level::of(kind).is_none() {
        return Err(unsupported(kind, "styled layer descriptor"));
    }
    debug!(builder = kind.name(), target = "styled layer descriptor"; "Materializing from root");

    let factory = cursor.factory();
    let Some(built) = build_root(&root, kind, factory.as_ref()) else {
        return Ok(None);
    };
    Ok(Some(lift_to_descriptor(built, factory.as_ref())))
}

fn locate_root(cursor: &Cursor) -> Result<(Cursor, NodeKind), BuildError> {
    let root = cursor.root_id().map(|id| cursor.at(id)).ok_or(BuildError::Detached)?;
    let kind = root.kind().ok_or(BuildError::Detached)?;
    Ok((root, kind))
}

fn unsupported(kind: NodeKind, target: &'static str) -> BuildError {
    BuildError::Unsupported {
        builder: kind.name(),
        target,
    }
}

/// Builds the root and wraps parts below the symbolizer level.
fn build_root(root: &Cursor, kind: NodeKind, factory: &dyn StyleFactory) -> Option<Materialized> {
    let symbolizer = match kind {
        NodeKind::Stroke => line_with(factory, root.build::<StrokeNode>()?),
        NodeKind::Fill => polygon_with(factory, root.build::<FillNode>()?),
        NodeKind::Graphic => point_with(factory, root.build::<GraphicNode>()?),
        NodeKind::Mark => {
            let mark = root.build::<MarkNode>()?;
            point_with(factory, graphic_with(factory, GraphicalSymbol::Mark(mark)))
        }
        NodeKind::ExternalGraphic => {
            let external = root.build::<ExternalGraphicNode>()?;
            let symbol = GraphicalSymbol::ExternalGraphic(external);
            point_with(factory, graphic_with(factory, symbol))
        }
        NodeKind::Font => text_with(factory, TextPart::Font(root.build::<FontNode>()?)),
        NodeKind::Halo => text_with(factory, TextPart::Halo(root.build::<HaloNode>()?)),
        NodeKind::PointPlacement => {
            let placement = LabelPlacement::Point(root.build::<PointPlacementNode>()?);
            text_with(factory, TextPart::Placement(placement))
        }
        NodeKind::LinePlacement => {
            let placement = LabelPlacement::Line(root.build::<LinePlacementNode>()?);
            text_with(factory, TextPart::Placement(placement))
        }
        NodeKind::ChannelSelection => raster_with(
            factory,
            RasterPart::ChannelSelection(root.build::<ChannelSelectionNode>()?),
        ),
        NodeKind::ColorMap => {
            raster_with(factory, RasterPart::ColorMap(root.build::<ColorMapNode>()?))
        }
        NodeKind::ContrastEnhancement => raster_with(
            factory,
            RasterPart::Contrast(root.build::<ContrastEnhancementNode>()?),
        ),
        NodeKind::ShadedRelief => raster_with(
            factory,
            RasterPart::ShadedRelief(root.build::<ShadedReliefNode>()?),
        ),
        NodeKind::PointSymbolizer => Symbolizer::Point(root.build::<PointSymbolizerNode>()?),
        NodeKind::LineSymbolizer => Symbolizer::Line(root.build::<LineSymbolizerNode>()?),
        NodeKind::PolygonSymbolizer => {
            Symbolizer::Polygon(root.build::<PolygonSymbolizerNode>()?)
        }
        NodeKind::TextSymbolizer => Symbolizer::Text(root.build::<TextSymbolizerNode>()?),
        NodeKind::RasterSymbolizer => Symbolizer::Raster(root.build::<RasterSymbolizerNode>()?),
        NodeKind::Rule => return root.build::<RuleNode>().map(Materialized::Rule),
        NodeKind::FeatureTypeStyle => {
            return root
                .build::<FeatureTypeStyleNode>()
                .map(Materialized::FeatureTypeStyle);
        }
        NodeKind::Style => return root.build::<StyleNode>().map(Materialized::Style),
        NodeKind::NamedLayer => {
            return root
                .build::<NamedLayerNode>()
                .map(|layer| Materialized::Layer(StyledLayer::Named(layer)));
        }
        NodeKind::UserLayer => {
            return root
                .build::<UserLayerNode>()
                .map(|layer| Materialized::Layer(StyledLayer::User(layer)));
        }
        NodeKind::StyledLayerDescriptor => {
            return root
                .build::<StyledLayerDescriptorNode>()
                .map(Materialized::Descriptor);
        }
        _ => return None,
    };
    Some(Materialized::Symbolizer(symbolizer))
}

// ===== Wrapping =====

fn line_with(factory: &dyn StyleFactory, stroke: Stroke) -> Symbolizer {
    let base = factory.default_line_symbolizer();
    Symbolizer::Line(factory.line_symbolizer(
        base.info().clone(),
        Some(stroke),
        base.perpendicular_offset().cloned(),
    ))
}

fn polygon_with(factory: &dyn StyleFactory, fill: Fill) -> Symbolizer {
    let base = factory.default_polygon_symbolizer();
    Symbolizer::Polygon(factory.polygon_symbolizer(
        base.info().clone(),
        Some(fill),
        base.stroke().cloned(),
        base.displacement().cloned(),
        base.perpendicular_offset().cloned(),
    ))
}

fn point_with(factory: &dyn StyleFactory, graphic: Graphic) -> Symbolizer {
    let base = factory.default_point_symbolizer();
    Symbolizer::Point(factory.point_symbolizer(base.info().clone(), Some(graphic)))
}

fn graphic_with(factory: &dyn StyleFactory, symbol: GraphicalSymbol) -> Graphic {
    let base = factory.default_graphic();
    factory.graphic(
        vec![symbol],
        base.opacity().cloned(),
        base.size().cloned(),
        base.rotation().cloned(),
        base.anchor_point().cloned(),
        base.displacement().cloned(),
        base.gap().cloned(),
        base.initial_gap().cloned(),
    )
}

enum TextPart {
    Font(Font),
    Halo(Halo),
    Placement(LabelPlacement),
}

fn text_with(factory: &dyn StyleFactory, part: TextPart) -> Symbolizer {
    let base = factory.default_text_symbolizer();
    let mut fonts = base.fonts().to_vec();
    let mut halo = base.halo().cloned();
    let mut placement = base.placement().cloned();
    match part {
        TextPart::Font(font) => fonts = vec![font],
        TextPart::Halo(part) => halo = Some(part),
        TextPart::Placement(part) => placement = Some(part),
    }
    Symbolizer::Text(factory.text_symbolizer(
        base.info().clone(),
        base.label().cloned(),
        fonts,
        placement,
        halo,
        base.fill().cloned(),
        base.priority().cloned(),
        base.shield().cloned(),
    ))
}

enum RasterPart {
    ChannelSelection(ChannelSelection),
    ColorMap(ColorMap),
    Contrast(ContrastEnhancement),
    ShadedRelief(ShadedRelief),
}

fn raster_with(factory: &dyn StyleFactory, part: RasterPart) -> Symbolizer {
    let base = factory.default_raster_symbolizer();
    let mut channel_selection = base.channel_selection().cloned();
    let mut color_map = base.color_map().cloned();
    let mut contrast = base.contrast_enhancement().cloned();
    let mut shaded_relief = base.shaded_relief().cloned();
    match part {
        RasterPart::ChannelSelection(part) => channel_selection = Some(part),
        RasterPart::ColorMap(part) => color_map = Some(part),
        RasterPart::Contrast(part) => contrast = Some(part),
        RasterPart::ShadedRelief(part) => shaded_relief = Some(part),
    }
    Symbolizer::Raster(factory.raster_symbolizer(
        base.info().clone(),
        base.opacity().cloned(),
        channel_selection,
        base.overlap_behavior(),
        color_map,
        contrast,
        shaded_relief,
    ))
}

// ===== Lifting =====

fn rule_with(factory: &dyn StyleFactory, symbolizer: Symbolizer) -> Rule {
    let base = factory.default_rule();
    factory.rule(
        base.name().map(str::to_string),
        base.description().cloned(),
        base.legend().cloned(),
        base.min_scale_denominator(),
        base.max_scale_denominator(),
        vec![symbolizer],
        base.filter().cloned(),
        base.is_else_filter(),
    )
}

fn feature_type_style_with(factory: &dyn StyleFactory, rule: Rule) -> FeatureTypeStyle {
    let base = factory.default_feature_type_style();
    factory.feature_type_style(
        base.name().map(str::to_string),
        base.description().cloned(),
        base.feature_type_names().to_vec(),
        base.semantic_types().to_vec(),
        vec![rule],
        base.options().clone(),
        base.transformation().cloned(),
    )
}

fn style_with(factory: &dyn StyleFactory, feature_type_style: FeatureTypeStyle) -> Style {
    let base = factory.default_style();
    factory.style(
        base.name().map(str::to_string),
        base.description().cloned(),
        base.is_default(),
        vec![feature_type_style],
    )
}

fn layer_with(factory: &dyn StyleFactory, style: Style) -> StyledLayer {
    let base = factory.default_named_layer();
    StyledLayer::Named(factory.named_layer(
        base.name().map(str::to_string),
        vec![style],
        base.feature_constraints().to_vec(),
    ))
}

fn descriptor_with(factory: &dyn StyleFactory, layer: StyledLayer) -> StyledLayerDescriptor {
    let base = factory.default_styled_layer_descriptor();
    factory.styled_layer_descriptor(
        base.name().map(str::to_string),
        base.title().map(str::to_string),
        base.abstract_text().map(str::to_string),
        vec![layer],
    )
}

/// Lifts a value to a style; `None` for layers and descriptors.
fn lift_to_style(built: Materialized, factory: &dyn StyleFactory) -> Option<Style> {
    let feature_type_style = match built {
        Materialized::Symbolizer(symbolizer) => {
            feature_type_style_with(factory, rule_with(factory, symbolizer))
        }
        Materialized::Rule(rule) => feature_type_style_with(factory, rule),
        Materialized::FeatureTypeStyle(feature_type_style) => feature_type_style,
        Materialized::Style(style) => return Some(style),
        Materialized::Layer(_) | Materialized::Descriptor(_) => return None,
    };
    Some(style_with(factory, feature_type_style))
}

fn lift_to_descriptor(built: Materialized, factory: &dyn StyleFactory) -> StyledLayerDescriptor {
    let layer = match built {
        Materialized::Layer(layer) => layer,
        Materialized::Descriptor(descriptor) => return descriptor,
        lower => match lift_to_style(lower, factory) {
            Some(style) => layer_with(factory, style),
            None => return factory.default_styled_layer_descriptor(),
        },
    };
    descriptor_with(factory, layer)
}

#[cfg(test)]
mod tests {
    use mapstyle_core::expr::Expression;

    use super::*;
    use crate::builder::{
        AnchorPointBuilder, Builder, FeatureTypeConstraintBuilder, FontBuilder, MarkBuilder,
        NamedLayerBuilder, StrokeBuilder, StyleBuilder, StyledLayerDescriptorBuilder,
    };

    #[test]
    fn test_levels_are_ordered() {
        assert!(Level::Symbolizer < Level::Rule);
        assert!(Level::Style < Level::Layer);
        assert_eq!(Level::of(NodeKind::Mark), Some(Level::Symbolizer));
        assert_eq!(Level::of(NodeKind::Extent), None);
    }

    #[test]
    fn test_stroke_root_becomes_line_symbolizer() {
        let stroke = StrokeBuilder::new();
        stroke.width(5.0);
        let style = stroke.build_style().unwrap().unwrap();

        let rule = &style.feature_type_styles()[0].rules()[0];
        let line = rule.symbolizers()[0].as_line().unwrap();
        assert_eq!(line.stroke().unwrap().width().unwrap().literal_f64(), Some(5.0));
    }

    #[test]
    fn test_mark_root_becomes_point_symbolizer() {
        let mark = MarkBuilder::new();
        mark.well_known_name("triangle");
        let sld = mark.build_sld().unwrap().unwrap();
        let style = sld.styles().next().unwrap();
        let point = style.feature_type_styles()[0].rules()[0].symbolizers()[0]
            .as_point()
            .unwrap();
        assert_eq!(point.graphic().unwrap().marks().count(), 1);
    }

    #[test]
    fn test_font_root_replaces_default_font() {
        let font = FontBuilder::new();
        font.family("Noto Sans");
        let style = font.build_style().unwrap().unwrap();
        let text = style.feature_type_styles()[0].rules()[0].symbolizers()[0]
            .as_text()
            .unwrap();
        assert_eq!(text.fonts().len(), 1);
        assert_eq!(text.fonts()[0].family(), &[Expression::from("Noto Sans")]);
    }

    #[test]
    fn test_unsupported_roots() {
        let anchor = AnchorPointBuilder::new();
        assert_eq!(
            anchor.build_style(),
            Err(BuildError::Unsupported {
                builder: "anchor point",
                target: "style",
            })
        );
        assert!(FeatureTypeConstraintBuilder::new().build_sld().is_err());
        assert!(NamedLayerBuilder::new().build_style().is_err());
        assert!(StyledLayerDescriptorBuilder::new().build_style().is_err());
    }

    #[test]
    fn test_unsupported_root_is_not_recycled() {
        let layer = NamedLayerBuilder::new();
        layer.name("roads");
        assert!(layer.build_style().is_err());
        assert_eq!(layer.build().unwrap().name(), Some("roads"));
    }

    #[test]
    fn test_unset_root_yields_none() {
        let style = StyleBuilder::new();
        style.unset();
        assert_eq!(style.build_style(), Ok(None));
        assert_eq!(style.build_sld(), Ok(None));
    }

    #[test]
    fn test_style_root_wraps_into_named_layer() {
        let style = StyleBuilder::new();
        style.name("basic");
        let sld = style.build_sld().unwrap().unwrap();
        let layer = sld.layers()[0].as_named().unwrap();
        assert_eq!(layer.styles()[0].name(), Some("basic"));
    }
}
