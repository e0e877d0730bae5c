//! Graphic builders: graphics, their marks and external images.

use mapstyle_core::{
    expr::Expression,
    factory::StyleFactory,
    style::{ColorReplacement, ExternalGraphic, ExternalMark, Graphic, GraphicalSymbol, Mark},
};

use super::{
    AnchorPointBuilder, DisplacementBuilder, FillBuilder, StrokeBuilder,
    basic::{AnchorPointNode, DisplacementNode},
    builder_handle,
    fill::FillNode,
    stroke::StrokeNode,
};
use crate::{
    arena::{Arena, ListFn, NodeId},
    node::{NodeData, NodeKind, State, Status, node_state},
};

// ===== External mark =====

pub(crate) struct ExternalMarkFields {
    uri: Option<String>,
    inline_content: Option<Vec<u8>>,
    format: Option<String>,
    mark_index: i32,
}

#[derive(Default)]
pub(crate) struct ExternalMarkNode {
    state: State<ExternalMarkFields>,
}

impl NodeData for ExternalMarkNode {
    type Fields = ExternalMarkFields;
    type Output = ExternalMark;

    node_state!(ExternalMarkFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> ExternalMark {
        factory.default_external_mark()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ExternalMark, status: Status) {
        let fields = ExternalMarkFields {
            uri: value.uri().map(str::to_string),
            inline_content: value.inline_content().map(<[u8]>::to_vec),
            format: value.format().map(str::to_string),
            mark_index: value.mark_index(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ExternalMarkFields, arena: &Arena) -> ExternalMark {
        arena.factory().external_mark(
            fields.uri.clone(),
            fields.inline_content.clone(),
            fields.format.clone(),
            fields.mark_index,
        )
    }
}

builder_handle! {
    /// Builds an [`ExternalMark`]: a glyph taken from a font or symbol file.
    ExternalMarkBuilder => ExternalMarkNode, ExternalMark
}

impl ExternalMarkBuilder {
    pub fn uri(&self, uri: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExternalMarkNode>(|fields| fields.uri = Some(uri.into()));
        self
    }

    pub fn inline_content(&self, content: impl Into<Vec<u8>>) -> &Self {
        self.cursor.update::<ExternalMarkNode>(|fields| {
            fields.inline_content = Some(content.into());
        });
        self
    }

    /// MIME type of the referenced resource.
    pub fn format(&self, format: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExternalMarkNode>(|fields| fields.format = Some(format.into()));
        self
    }

    pub fn mark_index(&self, index: i32) -> &Self {
        self.cursor
            .update::<ExternalMarkNode>(|fields| fields.mark_index = index);
        self
    }
}

// ===== Color replacement =====

pub(crate) struct ColorReplacementFields {
    property: Option<Expression>,
    mapping: Vec<(Expression, Expression)>,
}

#[derive(Default)]
pub(crate) struct ColorReplacementNode {
    state: State<ColorReplacementFields>,
}

impl NodeData for ColorReplacementNode {
    type Fields = ColorReplacementFields;
    type Output = ColorReplacement;

    node_state!(ColorReplacementFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> ColorReplacement {
        factory.default_color_replacement()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ColorReplacement, status: Status) {
        let fields = ColorReplacementFields {
            property: value.property().cloned(),
            mapping: value.mapping().to_vec(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ColorReplacementFields, arena: &Arena) -> ColorReplacement {
        arena
            .factory()
            .color_replacement(fields.property.clone(), fields.mapping.clone())
    }
}

builder_handle! {
    /// Builds a [`ColorReplacement`] that recodes colors of an external graphic.
    ColorReplacementBuilder => ColorReplacementNode, ColorReplacement
}

impl ColorReplacementBuilder {
    /// The input the recoding reads, usually a color property.
    pub fn property(&self, property: impl Into<Expression>) -> &Self {
        self.cursor.update::<ColorReplacementNode>(|fields| {
            fields.property = Some(property.into());
        });
        self
    }

    /// Adds a mapping from one color to another; a repeated source replaces
    /// the earlier target.
    pub fn map(&self, from: impl Into<Expression>, to: impl Into<Expression>) -> &Self {
        let (from, to) = (from.into(), to.into());
        self.cursor.update::<ColorReplacementNode>(|fields| {
            match fields.mapping.iter_mut().find(|(source, _)| *source == from) {
                Some(pair) => pair.1 = to,
                None => fields.mapping.push((from, to)),
            }
        });
        self
    }
}

// ===== Mark =====

pub(crate) struct MarkFields {
    well_known_name: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct MarkNode {
    state: State<MarkFields>,
    pub(crate) external_mark: Option<NodeId>,
    pub(crate) fill: Option<NodeId>,
    pub(crate) stroke: Option<NodeId>,
}

impl NodeData for MarkNode {
    type Fields = MarkFields;
    type Output = Mark;

    node_state!(MarkFields);

    fn children(&self) -> Vec<NodeId> {
        [self.external_mark, self.fill, self.stroke]
            .into_iter()
            .flatten()
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> Mark {
        factory.default_mark()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Mark, status: Status) {
        let fields = MarkFields {
            well_known_name: value.well_known_name().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, ExternalMarkNode>(
            id,
            |node| &mut node.external_mark,
            value.external_mark(),
            status,
        );
        arena.restore_slot::<Self, FillNode>(id, |node| &mut node.fill, value.fill(), status);
        arena.restore_slot::<Self, StrokeNode>(id, |node| &mut node.stroke, value.stroke(), status);
    }

    fn assemble(&self, fields: &MarkFields, arena: &Arena) -> Mark {
        arena.factory().mark(
            fields.well_known_name.clone(),
            arena.build_slot::<ExternalMarkNode>(self.external_mark),
            arena.build_slot::<FillNode>(self.fill),
            arena.build_slot::<StrokeNode>(self.stroke),
        )
    }
}

builder_handle! {
    /// Builds a [`Mark`]: a well-known shape such as `square`, `circle` or
    /// `triangle`, or a glyph from an external mark, with its own fill and
    /// outline.
    ///
    /// Building does not check that a shape was chosen; a mark without a
    /// well-known name or external mark builds with neither.
    MarkBuilder => MarkNode, Mark
}

impl MarkBuilder {
    pub fn well_known_name(&self, name: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<MarkNode>(|fields| fields.well_known_name = Some(name.into()));
        self
    }

    /// Clears the well-known name, leaving the shape to the external mark.
    pub fn clear_well_known_name(&self) -> &Self {
        self.cursor
            .update::<MarkNode>(|fields| fields.well_known_name = None);
        self
    }

    pub fn external_mark(&self) -> ExternalMarkBuilder {
        ExternalMarkBuilder::from_cursor(
            self.cursor
                .slot::<MarkNode, ExternalMarkNode>(|node| &mut node.external_mark),
        )
    }

    pub fn fill(&self) -> FillBuilder {
        FillBuilder::from_cursor(self.cursor.slot::<MarkNode, FillNode>(|node| &mut node.fill))
    }

    pub fn stroke(&self) -> StrokeBuilder {
        StrokeBuilder::from_cursor(
            self.cursor
                .slot::<MarkNode, StrokeNode>(|node| &mut node.stroke),
        )
    }
}

// ===== External graphic =====

pub(crate) struct ExternalGraphicFields {
    uri: Option<String>,
    inline_content: Option<Vec<u8>>,
    format: Option<String>,
}

#[derive(Default)]
pub(crate) struct ExternalGraphicNode {
    state: State<ExternalGraphicFields>,
    pub(crate) color_replacements: Vec<NodeId>,
}

impl NodeData for ExternalGraphicNode {
    type Fields = ExternalGraphicFields;
    type Output = ExternalGraphic;

    node_state!(ExternalGraphicFields);

    fn children(&self) -> Vec<NodeId> {
        self.color_replacements.clone()
    }

    fn default_value(factory: &dyn StyleFactory) -> ExternalGraphic {
        factory.default_external_graphic()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ExternalGraphic, status: Status) {
        let fields = ExternalGraphicFields {
            uri: value.uri().map(str::to_string),
            inline_content: value.inline_content().map(<[u8]>::to_vec),
            format: value.format().map(str::to_string),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_list::<Self, ColorReplacementNode>(
            id,
            |node| &mut node.color_replacements,
            value.color_replacements(),
            status,
        );
    }

    fn assemble(&self, fields: &ExternalGraphicFields, arena: &Arena) -> ExternalGraphic {
        arena.factory().external_graphic(
            fields.uri.clone(),
            fields.inline_content.clone(),
            fields.format.clone(),
            arena.build_list::<ColorReplacementNode>(&self.color_replacements),
        )
    }
}

builder_handle! {
    /// Builds an [`ExternalGraphic`]: an image referenced by URI or embedded
    /// inline.
    ExternalGraphicBuilder => ExternalGraphicNode, ExternalGraphic
}

impl ExternalGraphicBuilder {
    pub fn uri(&self, uri: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExternalGraphicNode>(|fields| fields.uri = Some(uri.into()));
        self
    }

    pub fn inline_content(&self, content: impl Into<Vec<u8>>) -> &Self {
        self.cursor.update::<ExternalGraphicNode>(|fields| {
            fields.inline_content = Some(content.into());
        });
        self
    }

    pub fn format(&self, format: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExternalGraphicNode>(|fields| fields.format = Some(format.into()));
        self
    }

    /// Appends a color replacement.
    pub fn color_replacement(&self) -> ColorReplacementBuilder {
        ColorReplacementBuilder::from_cursor(
            self.cursor
                .append::<ExternalGraphicNode, ColorReplacementNode>(|node| {
                    &mut node.color_replacements
                }),
        )
    }
}

// ===== Graphic =====

pub(crate) struct GraphicFields {
    opacity: Option<Expression>,
    size: Option<Expression>,
    rotation: Option<Expression>,
    gap: Option<Expression>,
    initial_gap: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct GraphicNode {
    state: State<GraphicFields>,
    pub(crate) symbols: Vec<NodeId>,
    pub(crate) anchor_point: Option<NodeId>,
    pub(crate) displacement: Option<NodeId>,
}

impl NodeData for GraphicNode {
    type Fields = GraphicFields;
    type Output = Graphic;

    node_state!(GraphicFields);

    fn children(&self) -> Vec<NodeId> {
        self.symbols
            .iter()
            .copied()
            .chain(self.anchor_point)
            .chain(self.displacement)
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> Graphic {
        factory.default_graphic()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Graphic, status: Status) {
        let fields = GraphicFields {
            opacity: value.opacity().cloned(),
            size: value.size().cloned(),
            rotation: value.rotation().cloned(),
            gap: value.gap().cloned(),
            initial_gap: value.initial_gap().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);

        let symbols: ListFn<Self> = |node| &mut node.symbols;
        arena.clear_list::<Self>(id, symbols);
        for symbol in value.symbols() {
            match symbol {
                GraphicalSymbol::Mark(mark) => {
                    arena.push_child::<Self, MarkNode>(id, symbols, mark, status);
                }
                GraphicalSymbol::ExternalGraphic(graphic) => {
                    arena.push_child::<Self, ExternalGraphicNode>(id, symbols, graphic, status);
                }
            }
        }

        arena.restore_slot::<Self, AnchorPointNode>(
            id,
            |node| &mut node.anchor_point,
            value.anchor_point(),
            status,
        );
        arena.restore_slot::<Self, DisplacementNode>(
            id,
            |node| &mut node.displacement,
            value.displacement(),
            status,
        );
    }

    fn assemble(&self, fields: &GraphicFields, arena: &Arena) -> Graphic {
        let symbols = self
            .symbols
            .iter()
            .filter_map(|&id| match arena.kind(id)? {
                NodeKind::Mark => arena.build::<MarkNode>(id).map(GraphicalSymbol::Mark),
                NodeKind::ExternalGraphic => arena
                    .build::<ExternalGraphicNode>(id)
                    .map(GraphicalSymbol::ExternalGraphic),
                _ => None,
            })
            .collect();

        arena.factory().graphic(
            symbols,
            fields.opacity.clone(),
            fields.size.clone(),
            fields.rotation.clone(),
            arena.build_slot::<AnchorPointNode>(self.anchor_point),
            arena.build_slot::<DisplacementNode>(self.displacement),
            fields.gap.clone(),
            fields.initial_gap.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`Graphic`]: an ordered list of marks and external graphics
    /// drawn as one symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, GraphicBuilder};
    ///
    /// let builder = GraphicBuilder::new();
    /// builder.size(12.0);
    /// builder.mark().well_known_name("circle").fill().color("#FF8800");
    ///
    /// let graphic = builder.build().unwrap();
    /// assert_eq!(graphic.marks().count(), 1);
    /// ```
    GraphicBuilder => GraphicNode, Graphic
}

impl GraphicBuilder {
    pub fn opacity(&self, opacity: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<GraphicNode>(|fields| fields.opacity = Some(opacity.into()));
        self
    }

    pub fn size(&self, size: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<GraphicNode>(|fields| fields.size = Some(size.into()));
        self
    }

    /// Rotation in degrees, clockwise.
    pub fn rotation(&self, rotation: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<GraphicNode>(|fields| fields.rotation = Some(rotation.into()));
        self
    }

    pub fn gap(&self, gap: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<GraphicNode>(|fields| fields.gap = Some(gap.into()));
        self
    }

    pub fn initial_gap(&self, gap: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<GraphicNode>(|fields| fields.initial_gap = Some(gap.into()));
        self
    }

    /// Appends a mark to the symbol list.
    pub fn mark(&self) -> MarkBuilder {
        MarkBuilder::from_cursor(
            self.cursor
                .append::<GraphicNode, MarkNode>(|node| &mut node.symbols),
        )
    }

    /// Appends an external graphic to the symbol list.
    pub fn external_graphic(&self) -> ExternalGraphicBuilder {
        ExternalGraphicBuilder::from_cursor(
            self.cursor
                .append::<GraphicNode, ExternalGraphicNode>(|node| &mut node.symbols),
        )
    }

    pub fn anchor_point(&self) -> AnchorPointBuilder {
        AnchorPointBuilder::from_cursor(
            self.cursor
                .slot::<GraphicNode, AnchorPointNode>(|node| &mut node.anchor_point),
        )
    }

    pub fn displacement(&self) -> DisplacementBuilder {
        DisplacementBuilder::from_cursor(
            self.cursor
                .slot::<GraphicNode, DisplacementNode>(|node| &mut node.displacement),
        )
    }
}
