//! Symbolizer builders.
//!
//! Every symbolizer shares a name, a description, a geometry expression, a
//! unit of measure and vendor options. The setters for those are generated by
//! `symbolizer_common!`; the rest is specific to each kind.

use mapstyle_core::{
    expr::Expression,
    factory::StyleFactory,
    style::{
        LabelPlacement, LineSymbolizer, OverlapBehavior, PointSymbolizer, PolygonSymbolizer,
        RasterSymbolizer, Symbolizer, SymbolizerInfo, TextSymbolizer, UnitOfMeasure,
        VendorOptions,
    },
};
use mapstyle_cql::CqlError;

use super::{
    ChannelSelectionBuilder, ColorMapBuilder, ContrastEnhancementBuilder, DisplacementBuilder,
    FillBuilder, FontBuilder, GraphicBuilder, HaloBuilder, LinePlacementBuilder,
    PointPlacementBuilder, ShadedReliefBuilder, StrokeBuilder,
    basic::{DescriptionNode, DisplacementNode},
    builder_handle, description_accessors,
    fill::FillNode,
    graphic::GraphicNode,
    raster::{ChannelSelectionNode, ColorMapNode, ContrastEnhancementNode, ShadedReliefNode},
    stroke::StrokeNode,
    text::{FontNode, HaloNode, LinePlacementNode, PointPlacementNode},
};
use crate::{
    arena::{Arena, ListFn, NodeId, SlotFn},
    node::{NodeData, NodeKind, State, Status, node_state},
};

/// Fields shared by every symbolizer; the description lives in a child node.
pub(crate) struct InfoFields {
    name: Option<String>,
    geometry: Option<Expression>,
    unit_of_measure: Option<UnitOfMeasure>,
    options: VendorOptions,
}

impl InfoFields {
    fn from_info(info: &SymbolizerInfo) -> Self {
        Self {
            name: info.name().map(str::to_string),
            geometry: info.geometry().cloned(),
            unit_of_measure: info.unit_of_measure(),
            options: info.options().clone(),
        }
    }

    fn assemble(&self, description: Option<NodeId>, arena: &Arena) -> SymbolizerInfo {
        arena.factory().symbolizer_info(
            self.name.clone(),
            arena.build_slot::<DescriptionNode>(description),
            self.geometry.clone(),
            self.unit_of_measure,
            self.options.clone(),
        )
    }
}

/// Generates the setters shared by all symbolizer builders.
macro_rules! symbolizer_common {
    ($builder:ident, $node:ty) => {
        impl $builder {
            pub fn name(&self, name: impl Into<String>) -> &Self {
                self.cursor
                    .update::<$node>(|fields| fields.info.name = Some(name.into()));
                self
            }

            /// The geometry to draw; `None` uses the feature's default geometry.
            pub fn geometry(&self, geometry: impl Into<Expression>) -> &Self {
                self.cursor
                    .update::<$node>(|fields| fields.info.geometry = Some(geometry.into()));
                self
            }

            /// Draws the geometry held in the named feature property.
            pub fn geometry_property(&self, property: impl Into<String>) -> &Self {
                self.geometry(Expression::property(property))
            }

            pub fn uom(&self, unit: UnitOfMeasure) -> &Self {
                self.cursor
                    .update::<$node>(|fields| fields.info.unit_of_measure = Some(unit));
                self
            }

            /// Sets a vendor option, replacing an earlier value for the same key.
            pub fn option(&self, key: impl Into<String>, value: impl Into<String>) -> &Self {
                self.cursor.update::<$node>(|fields| {
                    fields.info.options.insert(key.into(), value.into());
                });
                self
            }
        }

        description_accessors!($builder, $node);
    };
}

fn restore_description<P: NodeData>(
    arena: &mut Arena,
    id: NodeId,
    slot: SlotFn<P>,
    info: &SymbolizerInfo,
    status: Status,
) {
    arena.restore_slot::<P, DescriptionNode>(id, slot, info.description(), status);
}

// ===== Point =====

pub(crate) struct PointSymbolizerFields {
    info: InfoFields,
}

#[derive(Default)]
pub(crate) struct PointSymbolizerNode {
    state: State<PointSymbolizerFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) graphic: Option<NodeId>,
}

impl NodeData for PointSymbolizerNode {
    type Fields = PointSymbolizerFields;
    type Output = PointSymbolizer;

    node_state!(PointSymbolizerFields);

    fn children(&self) -> Vec<NodeId> {
        self.description.into_iter().chain(self.graphic).collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> PointSymbolizer {
        factory.default_point_symbolizer()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &PointSymbolizer, status: Status) {
        let fields = PointSymbolizerFields {
            info: InfoFields::from_info(value.info()),
        };
        arena.set_fields::<Self>(id, status, fields);
        restore_description::<Self>(arena, id, |node| &mut node.description, value.info(), status);
        arena.restore_slot::<Self, GraphicNode>(id, |node| &mut node.graphic, value.graphic(), status);
    }

    fn assemble(&self, fields: &PointSymbolizerFields, arena: &Arena) -> PointSymbolizer {
        arena.factory().point_symbolizer(
            fields.info.assemble(self.description, arena),
            arena.build_slot::<GraphicNode>(self.graphic),
        )
    }
}

builder_handle! {
    /// Builds a [`PointSymbolizer`] that draws a graphic at each point.
    PointSymbolizerBuilder => PointSymbolizerNode, PointSymbolizer
}

symbolizer_common!(PointSymbolizerBuilder, PointSymbolizerNode);

impl PointSymbolizerBuilder {
    pub fn graphic(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<PointSymbolizerNode, GraphicNode>(|node| &mut node.graphic),
        )
    }
}

// ===== Line =====

pub(crate) struct LineSymbolizerFields {
    info: InfoFields,
    perpendicular_offset: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct LineSymbolizerNode {
    state: State<LineSymbolizerFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) stroke: Option<NodeId>,
}

impl NodeData for LineSymbolizerNode {
    type Fields = LineSymbolizerFields;
    type Output = LineSymbolizer;

    node_state!(LineSymbolizerFields);

    fn children(&self) -> Vec<NodeId> {
        self.description.into_iter().chain(self.stroke).collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> LineSymbolizer {
        factory.default_line_symbolizer()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &LineSymbolizer, status: Status) {
        let fields = LineSymbolizerFields {
            info: InfoFields::from_info(value.info()),
            perpendicular_offset: value.perpendicular_offset().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        restore_description::<Self>(arena, id, |node| &mut node.description, value.info(), status);
        arena.restore_slot::<Self, StrokeNode>(id, |node| &mut node.stroke, value.stroke(), status);
    }

    fn assemble(&self, fields: &LineSymbolizerFields, arena: &Arena) -> LineSymbolizer {
        arena.factory().line_symbolizer(
            fields.info.assemble(self.description, arena),
            arena.build_slot::<StrokeNode>(self.stroke),
            fields.perpendicular_offset.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`LineSymbolizer`]. Starts with the default stroke.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, LineSymbolizerBuilder};
    ///
    /// let builder = LineSymbolizerBuilder::new();
    /// builder.name("roads").stroke().width(3.0);
    ///
    /// let line = builder.build().unwrap();
    /// assert_eq!(line.info().name(), Some("roads"));
    /// assert_eq!(line.stroke().unwrap().width().unwrap().literal_f64(), Some(3.0));
    /// ```
    LineSymbolizerBuilder => LineSymbolizerNode, LineSymbolizer
}

symbolizer_common!(LineSymbolizerBuilder, LineSymbolizerNode);

impl LineSymbolizerBuilder {
    pub fn perpendicular_offset(&self, offset: impl Into<Expression>) -> &Self {
        self.cursor.update::<LineSymbolizerNode>(|fields| {
            fields.perpendicular_offset = Some(offset.into());
        });
        self
    }

    pub fn stroke(&self) -> StrokeBuilder {
        StrokeBuilder::from_cursor(
            self.cursor
                .slot::<LineSymbolizerNode, StrokeNode>(|node| &mut node.stroke),
        )
    }
}

// ===== Polygon =====

pub(crate) struct PolygonSymbolizerFields {
    info: InfoFields,
    perpendicular_offset: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct PolygonSymbolizerNode {
    state: State<PolygonSymbolizerFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) fill: Option<NodeId>,
    pub(crate) stroke: Option<NodeId>,
    pub(crate) displacement: Option<NodeId>,
}

impl NodeData for PolygonSymbolizerNode {
    type Fields = PolygonSymbolizerFields;
    type Output = PolygonSymbolizer;

    node_state!(PolygonSymbolizerFields);

    fn children(&self) -> Vec<NodeId> {
        [self.description, self.fill, self.stroke, self.displacement]
            .into_iter()
            .flatten()
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> PolygonSymbolizer {
        factory.default_polygon_symbolizer()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &PolygonSymbolizer, status: Status) {
        let fields = PolygonSymbolizerFields {
            info: InfoFields::from_info(value.info()),
            perpendicular_offset: value.perpendicular_offset().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        restore_description::<Self>(arena, id, |node| &mut node.description, value.info(), status);
        arena.restore_slot::<Self, FillNode>(id, |node| &mut node.fill, value.fill(), status);
        arena.restore_slot::<Self, StrokeNode>(id, |node| &mut node.stroke, value.stroke(), status);
        arena.restore_slot::<Self, DisplacementNode>(
            id,
            |node| &mut node.displacement,
            value.displacement(),
            status,
        );
    }

    fn assemble(&self, fields: &PolygonSymbolizerFields, arena: &Arena) -> PolygonSymbolizer {
        arena.factory().polygon_symbolizer(
            fields.info.assemble(self.description, arena),
            arena.build_slot::<FillNode>(self.fill),
            arena.build_slot::<StrokeNode>(self.stroke),
            arena.build_slot::<DisplacementNode>(self.displacement),
            fields.perpendicular_offset.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`PolygonSymbolizer`]: an interior fill and an optional
    /// outline. Starts with the default fill and no stroke.
    PolygonSymbolizerBuilder => PolygonSymbolizerNode, PolygonSymbolizer
}

symbolizer_common!(PolygonSymbolizerBuilder, PolygonSymbolizerNode);

impl PolygonSymbolizerBuilder {
    pub fn perpendicular_offset(&self, offset: impl Into<Expression>) -> &Self {
        self.cursor.update::<PolygonSymbolizerNode>(|fields| {
            fields.perpendicular_offset = Some(offset.into());
        });
        self
    }

    pub fn fill(&self) -> FillBuilder {
        FillBuilder::from_cursor(
            self.cursor
                .slot::<PolygonSymbolizerNode, FillNode>(|node| &mut node.fill),
        )
    }

    pub fn stroke(&self) -> StrokeBuilder {
        StrokeBuilder::from_cursor(
            self.cursor
                .slot::<PolygonSymbolizerNode, StrokeNode>(|node| &mut node.stroke),
        )
    }

    pub fn displacement(&self) -> DisplacementBuilder {
        DisplacementBuilder::from_cursor(
            self.cursor
                .slot::<PolygonSymbolizerNode, DisplacementNode>(|node| &mut node.displacement),
        )
    }
}

// ===== Text =====

pub(crate) struct TextSymbolizerFields {
    info: InfoFields,
    label: Option<Expression>,
    priority: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct TextSymbolizerNode {
    state: State<TextSymbolizerFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) fonts: Vec<NodeId>,
    /// Holds a point or a line placement node.
    pub(crate) placement: Option<NodeId>,
    pub(crate) halo: Option<NodeId>,
    pub(crate) fill: Option<NodeId>,
    pub(crate) shield: Option<NodeId>,
}

impl NodeData for TextSymbolizerNode {
    type Fields = TextSymbolizerFields;
    type Output = TextSymbolizer;

    node_state!(TextSymbolizerFields);

    fn children(&self) -> Vec<NodeId> {
        let mut children = self.fonts.clone();
        children.extend(
            [
                self.description,
                self.placement,
                self.halo,
                self.fill,
                self.shield,
            ]
            .into_iter()
            .flatten(),
        );
        children
    }

    fn default_value(factory: &dyn StyleFactory) -> TextSymbolizer {
        factory.default_text_symbolizer()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &TextSymbolizer, status: Status) {
        let fields = TextSymbolizerFields {
            info: InfoFields::from_info(value.info()),
            label: value.label().cloned(),
            priority: value.priority().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        restore_description::<Self>(arena, id, |node| &mut node.description, value.info(), status);
        arena.restore_list::<Self, FontNode>(id, |node| &mut node.fonts, value.fonts(), status);

        let placement: SlotFn<Self> = |node| &mut node.placement;
        match value.placement() {
            Some(LabelPlacement::Point(point)) => {
                arena.restore_slot::<Self, PointPlacementNode>(id, placement, Some(point), status);
            }
            Some(LabelPlacement::Line(line)) => {
                arena.restore_slot::<Self, LinePlacementNode>(id, placement, Some(line), status);
            }
            None => arena.restore_slot::<Self, PointPlacementNode>(id, placement, None, status),
        }

        arena.restore_slot::<Self, HaloNode>(id, |node| &mut node.halo, value.halo(), status);
        arena.restore_slot::<Self, FillNode>(id, |node| &mut node.fill, value.fill(), status);
        arena.restore_slot::<Self, GraphicNode>(id, |node| &mut node.shield, value.shield(), status);
    }

    fn assemble(&self, fields: &TextSymbolizerFields, arena: &Arena) -> TextSymbolizer {
        let placement = self.placement.and_then(|id| match arena.kind(id)? {
            NodeKind::PointPlacement => arena
                .build::<PointPlacementNode>(id)
                .map(LabelPlacement::Point),
            NodeKind::LinePlacement => arena
                .build::<LinePlacementNode>(id)
                .map(LabelPlacement::Line),
            _ => None,
        });

        arena.factory().text_symbolizer(
            fields.info.assemble(self.description, arena),
            fields.label.clone(),
            arena.build_list::<FontNode>(&self.fonts),
            placement,
            arena.build_slot::<HaloNode>(self.halo),
            arena.build_slot::<FillNode>(self.fill),
            fields.priority.clone(),
            arena.build_slot::<GraphicNode>(self.shield),
        )
    }
}

builder_handle! {
    /// Builds a [`TextSymbolizer`] that draws labels.
    ///
    /// Starts with one default font and a black fill. The placement is either
    /// a point or a line placement; asking for one kind replaces the other.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, TextSymbolizerBuilder};
    ///
    /// let builder = TextSymbolizerBuilder::new();
    /// builder.label_cql("name").unwrap();
    /// builder.font().family("Noto Sans").size(12.0);
    /// builder.halo().radius(2.0);
    /// builder.line_placement().repeated(true);
    ///
    /// let text = builder.build().unwrap();
    /// assert_eq!(text.fonts().len(), 1);
    /// assert!(text.placement().unwrap().as_line().unwrap().is_repeated());
    /// ```
    TextSymbolizerBuilder => TextSymbolizerNode, TextSymbolizer
}

symbolizer_common!(TextSymbolizerBuilder, TextSymbolizerNode);

impl TextSymbolizerBuilder {
    pub fn label(&self, label: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<TextSymbolizerNode>(|fields| fields.label = Some(label.into()));
        self
    }

    /// Compiles the label from CQL text.
    ///
    /// # Errors
    ///
    /// Returns a [`CqlError`] when the text is valid in neither grammar; the
    /// builder is left unchanged.
    pub fn label_cql(&self, text: &str) -> Result<&Self, CqlError> {
        let label = mapstyle_cql::expression(text)?;
        Ok(self.label(label))
    }

    pub fn priority(&self, priority: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<TextSymbolizerNode>(|fields| fields.priority = Some(priority.into()));
        self
    }

    /// Returns the first font, appending one when there is none.
    pub fn font(&self) -> FontBuilder {
        let fonts: ListFn<TextSymbolizerNode> = |node| &mut node.fonts;
        self.cursor.touch::<TextSymbolizerNode>();
        match self.cursor.list_ids::<TextSymbolizerNode>(fonts).first() {
            Some(&first) => FontBuilder::from_cursor(self.cursor.at(first)),
            None => self.new_font(),
        }
    }

    /// Appends a fallback font.
    pub fn new_font(&self) -> FontBuilder {
        FontBuilder::from_cursor(
            self.cursor
                .append::<TextSymbolizerNode, FontNode>(|node| &mut node.fonts),
        )
    }

    /// Places labels at points, replacing a line placement.
    pub fn point_placement(&self) -> PointPlacementBuilder {
        PointPlacementBuilder::from_cursor(
            self.cursor
                .slot::<TextSymbolizerNode, PointPlacementNode>(|node| &mut node.placement),
        )
    }

    /// Places labels along lines, replacing a point placement.
    pub fn line_placement(&self) -> LinePlacementBuilder {
        LinePlacementBuilder::from_cursor(
            self.cursor
                .slot::<TextSymbolizerNode, LinePlacementNode>(|node| &mut node.placement),
        )
    }

    pub fn halo(&self) -> HaloBuilder {
        HaloBuilder::from_cursor(
            self.cursor
                .slot::<TextSymbolizerNode, HaloNode>(|node| &mut node.halo),
        )
    }

    pub fn fill(&self) -> FillBuilder {
        FillBuilder::from_cursor(
            self.cursor
                .slot::<TextSymbolizerNode, FillNode>(|node| &mut node.fill),
        )
    }

    /// The graphic drawn behind the label, as on road shields.
    pub fn shield(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<TextSymbolizerNode, GraphicNode>(|node| &mut node.shield),
        )
    }
}

// ===== Raster =====

pub(crate) struct RasterSymbolizerFields {
    info: InfoFields,
    opacity: Option<Expression>,
    overlap_behavior: Option<OverlapBehavior>,
}

#[derive(Default)]
pub(crate) struct RasterSymbolizerNode {
    state: State<RasterSymbolizerFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) channel_selection: Option<NodeId>,
    pub(crate) color_map: Option<NodeId>,
    pub(crate) contrast_enhancement: Option<NodeId>,
    pub(crate) shaded_relief: Option<NodeId>,
}

impl NodeData for RasterSymbolizerNode {
    type Fields = RasterSymbolizerFields;
    type Output = RasterSymbolizer;

    node_state!(RasterSymbolizerFields);

    fn children(&self) -> Vec<NodeId> {
        [
            self.description,
            self.channel_selection,
            self.color_map,
            self.contrast_enhancement,
            self.shaded_relief,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> RasterSymbolizer {
        factory.default_raster_symbolizer()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &RasterSymbolizer, status: Status) {
        let fields = RasterSymbolizerFields {
            info: InfoFields::from_info(value.info()),
            opacity: value.opacity().cloned(),
            overlap_behavior: value.overlap_behavior(),
        };
        arena.set_fields::<Self>(id, status, fields);
        restore_description::<Self>(arena, id, |node| &mut node.description, value.info(), status);
        arena.restore_slot::<Self, ChannelSelectionNode>(
            id,
            |node| &mut node.channel_selection,
            value.channel_selection(),
            status,
        );
        arena.restore_slot::<Self, ColorMapNode>(
            id,
            |node| &mut node.color_map,
            value.color_map(),
            status,
        );
        arena.restore_slot::<Self, ContrastEnhancementNode>(
            id,
            |node| &mut node.contrast_enhancement,
            value.contrast_enhancement(),
            status,
        );
        arena.restore_slot::<Self, ShadedReliefNode>(
            id,
            |node| &mut node.shaded_relief,
            value.shaded_relief(),
            status,
        );
    }

    fn assemble(&self, fields: &RasterSymbolizerFields, arena: &Arena) -> RasterSymbolizer {
        arena.factory().raster_symbolizer(
            fields.info.assemble(self.description, arena),
            fields.opacity.clone(),
            arena.build_slot::<ChannelSelectionNode>(self.channel_selection),
            fields.overlap_behavior,
            arena.build_slot::<ColorMapNode>(self.color_map),
            arena.build_slot::<ContrastEnhancementNode>(self.contrast_enhancement),
            arena.build_slot::<ShadedReliefNode>(self.shaded_relief),
        )
    }
}

builder_handle! {
    /// Builds a [`RasterSymbolizer`] for coverage data.
    RasterSymbolizerBuilder => RasterSymbolizerNode, RasterSymbolizer
}

symbolizer_common!(RasterSymbolizerBuilder, RasterSymbolizerNode);

impl RasterSymbolizerBuilder {
    pub fn opacity(&self, opacity: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<RasterSymbolizerNode>(|fields| fields.opacity = Some(opacity.into()));
        self
    }

    pub fn overlap_behavior(&self, behavior: OverlapBehavior) -> &Self {
        self.cursor
            .update::<RasterSymbolizerNode>(|fields| fields.overlap_behavior = Some(behavior));
        self
    }

    pub fn channel_selection(&self) -> ChannelSelectionBuilder {
        ChannelSelectionBuilder::from_cursor(
            self.cursor
                .slot::<RasterSymbolizerNode, ChannelSelectionNode>(|node| {
                    &mut node.channel_selection
                }),
        )
    }

    pub fn color_map(&self) -> ColorMapBuilder {
        ColorMapBuilder::from_cursor(
            self.cursor
                .slot::<RasterSymbolizerNode, ColorMapNode>(|node| &mut node.color_map),
        )
    }

    pub fn contrast_enhancement(&self) -> ContrastEnhancementBuilder {
        ContrastEnhancementBuilder::from_cursor(
            self.cursor
                .slot::<RasterSymbolizerNode, ContrastEnhancementNode>(|node| {
                    &mut node.contrast_enhancement
                }),
        )
    }

    pub fn shaded_relief(&self) -> ShadedReliefBuilder {
        ShadedReliefBuilder::from_cursor(
            self.cursor
                .slot::<RasterSymbolizerNode, ShadedReliefNode>(|node| &mut node.shaded_relief),
        )
    }
}

// ===== Mixed lists =====

/// Builds a symbolizer child of any kind.
pub(crate) fn build_symbolizer(arena: &Arena, id: NodeId) -> Option<Symbolizer> {
    match arena.kind(id)? {
        NodeKind::PointSymbolizer => arena
            .build::<PointSymbolizerNode>(id)
            .map(Symbolizer::Point),
        NodeKind::LineSymbolizer => arena
            .build::<LineSymbolizerNode>(id)
            .map(Symbolizer::Line),
        NodeKind::PolygonSymbolizer => arena
            .build::<PolygonSymbolizerNode>(id)
            .map(Symbolizer::Polygon),
        NodeKind::TextSymbolizer => arena
            .build::<TextSymbolizerNode>(id)
            .map(Symbolizer::Text),
        NodeKind::RasterSymbolizer => arena
            .build::<RasterSymbolizerNode>(id)
            .map(Symbolizer::Raster),
        _ => None,
    }
}

/// Appends a child of the matching kind, populated from `symbolizer`.
pub(crate) fn push_symbolizer<P: NodeData>(
    arena: &mut Arena,
    parent: NodeId,
    list: ListFn<P>,
    symbolizer: &Symbolizer,
    status: Status,
) {
    match symbolizer {
        Symbolizer::Point(point) => {
            arena.push_child::<P, PointSymbolizerNode>(parent, list, point, status);
        }
        Symbolizer::Line(line) => {
            arena.push_child::<P, LineSymbolizerNode>(parent, list, line, status);
        }
        Symbolizer::Polygon(polygon) => {
            arena.push_child::<P, PolygonSymbolizerNode>(parent, list, polygon, status);
        }
        Symbolizer::Text(text) => {
            arena.push_child::<P, TextSymbolizerNode>(parent, list, text, status);
        }
        Symbolizer::Raster(raster) => {
            arena.push_child::<P, RasterSymbolizerNode>(parent, list, raster, status);
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use mapstyle_core::{
        expr::EvaluationContext,
        style::{ContrastMethod, Description},
    };

    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_common_setters() {
        let builder = PolygonSymbolizerBuilder::new();
        builder
            .name("lakes")
            .title("Lakes")
            .geometry_property("the_geom")
            .uom(UnitOfMeasure::Metre)
            .option("graphic-margin", "2")
            .option("graphic-margin", "4");
        let polygon = builder.build().unwrap();

        let info = polygon.info();
        assert_eq!(info.name(), Some("lakes"));
        assert_eq!(info.description().and_then(Description::title), Some("Lakes"));
        assert_eq!(info.geometry().and_then(Expression::as_property), Some("the_geom"));
        assert_eq!(info.unit_of_measure(), Some(UnitOfMeasure::Metre));
        assert_eq!(info.options().get("graphic-margin").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_polygon_defaults_have_no_stroke() {
        let polygon = PolygonSymbolizerBuilder::new().build().unwrap();
        assert!(polygon.fill().is_some());
        assert!(polygon.stroke().is_none());
        assert!(polygon.info().description().is_none());
    }

    #[test]
    fn test_polygon_stroke_accessor_builds_default_stroke() {
        let builder = PolygonSymbolizerBuilder::new();
        builder.stroke().width(0.5);
        let stroke = builder.build().unwrap().stroke().cloned().unwrap();
        assert!(approx_eq!(f64, stroke.width().unwrap().literal_f64().unwrap(), 0.5));
        assert!(approx_eq!(f64, stroke.opacity().unwrap().literal_f64().unwrap(), 1.0));
    }

    #[test]
    fn test_point_symbolizer_round_trip() {
        let source = PointSymbolizerBuilder::new();
        source.graphic().size(12.0).mark().well_known_name("circle");
        let value = source.build().unwrap();
        assert_eq!(value.graphic().unwrap().symbols().len(), 1);

        let copy = PointSymbolizerBuilder::new();
        assert_eq!(copy.reset_from(Some(&value)).build(), Some(value));
    }

    #[test]
    fn test_text_defaults() {
        let text = TextSymbolizerBuilder::new().build().unwrap();
        assert_eq!(text.fonts().len(), 1);
        assert!(text.label().is_none());
        assert!(text.placement().is_none());
        assert!(text.halo().is_none());
        let color = text.fill().unwrap().color().unwrap();
        let color = color.evaluate(&EvaluationContext::new()).to_color().unwrap();
        assert_eq!(color.to_hex(), "#000000");
    }

    #[test]
    fn test_font_reuses_first_and_new_font_appends() {
        let builder = TextSymbolizerBuilder::new();
        builder.font().family("Arial");
        builder.font().size(14.0);
        builder.new_font().family("DejaVu Sans");
        let text = builder.build().unwrap();

        assert_eq!(text.fonts().len(), 2);
        assert_eq!(text.fonts()[0].family(), &[Expression::from("Arial")]);
        assert!(approx_eq!(
            f64,
            text.fonts()[0].size().unwrap().literal_f64().unwrap(),
            14.0
        ));
        assert_eq!(text.fonts()[1].family(), &[Expression::from("DejaVu Sans")]);
    }

    #[test]
    fn test_placement_kinds_replace_each_other() {
        let builder = TextSymbolizerBuilder::new();
        let point = builder.point_placement();
        point.rotation(45.0);
        builder.line_placement().gap(10.0);
        assert!(point.is_unset(), "replaced placement is released");
        assert!(point.build().is_none());

        let text = builder.build().unwrap();
        assert!(text.placement().and_then(LabelPlacement::as_line).is_some());
    }

    #[test]
    fn test_text_round_trip_keeps_placement_variant() {
        let source = TextSymbolizerBuilder::new();
        source.label("name").priority(Expression::property("population"));
        source.point_placement().anchor_point().x(0.5);
        source.halo().fill().color("#FFFF00");
        let value = source.build().unwrap();

        let copy = TextSymbolizerBuilder::new();
        copy.reset_from(Some(&value));
        assert_eq!(copy.build(), Some(value));
    }

    #[test]
    fn test_label_cql_rejects_bad_text() {
        let builder = TextSymbolizerBuilder::new();
        assert!(builder.label_cql("name +").is_err());
        assert_eq!(builder.status(), Status::Default);

        builder.label_cql("strConcat(name, ' road')").unwrap();
        assert!(builder.build().unwrap().label().is_some());
    }

    #[test]
    fn test_raster_symbolizer_parts() {
        let builder = RasterSymbolizerBuilder::new();
        builder
            .opacity(0.8)
            .overlap_behavior(OverlapBehavior::Average);
        builder.contrast_enhancement().method(ContrastMethod::Histogram);
        builder.shaded_relief().relief_factor(30.0);
        builder.channel_selection().gray().channel_name("1");
        let raster = builder.build().unwrap();

        assert!(approx_eq!(f64, raster.opacity().unwrap().literal_f64().unwrap(), 0.8));
        assert_eq!(raster.overlap_behavior(), Some(OverlapBehavior::Average));
        assert_eq!(
            raster.contrast_enhancement().map(|contrast| contrast.method()),
            Some(ContrastMethod::Histogram)
        );
        assert!(raster.channel_selection().and_then(|sel| sel.gray()).is_some());
        assert!(raster.color_map().is_none());
    }

    #[test]
    fn test_build_symbolizer_dispatches_on_kind() {
        let builder = LineSymbolizerBuilder::new();
        let arena = builder.cursor.arena();
        let id = builder.cursor.root_id().unwrap();
        let symbolizer = build_symbolizer(&arena, id).unwrap();
        assert!(symbolizer.as_line().is_some());
    }
}
