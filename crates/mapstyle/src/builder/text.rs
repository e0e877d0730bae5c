//! Label builders: halos, fonts and placements.

use mapstyle_core::{
    expr::Expression,
    factory::StyleFactory,
    style::{Font, Halo, LinePlacement, PointPlacement},
};

use super::{
    AnchorPointBuilder, DisplacementBuilder, FillBuilder,
    basic::{AnchorPointNode, DisplacementNode},
    builder_handle,
    fill::FillNode,
};
use crate::{
    arena::{Arena, NodeId},
    node::{NodeData, State, Status, node_state},
};

// ===== Halo =====

pub(crate) struct HaloFields {
    radius: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct HaloNode {
    state: State<HaloFields>,
    pub(crate) fill: Option<NodeId>,
}

impl NodeData for HaloNode {
    type Fields = HaloFields;
    type Output = Halo;

    node_state!(HaloFields);

    fn children(&self) -> Vec<NodeId> {
        self.fill.into_iter().collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> Halo {
        factory.default_halo()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Halo, status: Status) {
        let fields = HaloFields {
            radius: value.radius().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, FillNode>(id, |node| &mut node.fill, value.fill(), status);
    }

    fn assemble(&self, fields: &HaloFields, arena: &Arena) -> Halo {
        arena
            .factory()
            .halo(arena.build_slot::<FillNode>(self.fill), fields.radius.clone())
    }
}

builder_handle! {
    /// Builds a [`Halo`]: the outline painted behind label glyphs. Defaults
    /// to a white fill with a radius of one pixel.
    HaloBuilder => HaloNode, Halo
}

impl HaloBuilder {
    pub fn radius(&self, radius: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<HaloNode>(|fields| fields.radius = Some(radius.into()));
        self
    }

    pub fn fill(&self) -> FillBuilder {
        FillBuilder::from_cursor(self.cursor.slot::<HaloNode, FillNode>(|node| &mut node.fill))
    }
}

// ===== Font =====

pub(crate) struct FontFields {
    family: Vec<Expression>,
    /// Set while `family` still holds the factory defaults.
    default_family: bool,
    style: Option<Expression>,
    weight: Option<Expression>,
    size: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct FontNode {
    state: State<FontFields>,
}

impl NodeData for FontNode {
    type Fields = FontFields;
    type Output = Font;

    node_state!(FontFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> Font {
        factory.default_font()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Font, status: Status) {
        let fields = FontFields {
            family: value.family().to_vec(),
            default_family: status == Status::Default,
            style: value.style().cloned(),
            weight: value.weight().cloned(),
            size: value.size().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &FontFields, arena: &Arena) -> Font {
        arena.factory().font(
            fields.family.clone(),
            fields.style.clone(),
            fields.weight.clone(),
            fields.size.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`Font`].
    ///
    /// The family is a preference list. The first [`family`](Self::family)
    /// call after a reset replaces the default family; later calls append
    /// fallbacks.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, FontBuilder};
    /// use mapstyle_core::{expr::Expression, style::FontWeight};
    ///
    /// let font = FontBuilder::new()
    ///     .family("Noto Sans")
    ///     .family("DejaVu Sans")
    ///     .weight(FontWeight::Bold)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(font.family(), &[Expression::from("Noto Sans"), Expression::from("DejaVu Sans")]);
    /// ```
    FontBuilder => FontNode, Font
}

impl FontBuilder {
    pub fn family(&self, family: impl Into<Expression>) -> &Self {
        self.cursor.update::<FontNode>(|fields| {
            if fields.default_family {
                fields.family.clear();
                fields.default_family = false;
            }
            fields.family.push(family.into());
        });
        self
    }

    /// Accepts a [`FontStyle`](mapstyle_core::style::FontStyle) or any expression.
    pub fn style(&self, style: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<FontNode>(|fields| fields.style = Some(style.into()));
        self
    }

    /// Accepts a [`FontWeight`](mapstyle_core::style::FontWeight) or any expression.
    pub fn weight(&self, weight: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<FontNode>(|fields| fields.weight = Some(weight.into()));
        self
    }

    pub fn size(&self, size: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<FontNode>(|fields| fields.size = Some(size.into()));
        self
    }
}

// ===== Point placement =====

pub(crate) struct PointPlacementFields {
    rotation: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct PointPlacementNode {
    state: State<PointPlacementFields>,
    pub(crate) anchor_point: Option<NodeId>,
    pub(crate) displacement: Option<NodeId>,
}

impl NodeData for PointPlacementNode {
    type Fields = PointPlacementFields;
    type Output = PointPlacement;

    node_state!(PointPlacementFields);

    fn children(&self) -> Vec<NodeId> {
        self.anchor_point
            .into_iter()
            .chain(self.displacement)
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> PointPlacement {
        factory.default_point_placement()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &PointPlacement, status: Status) {
        let fields = PointPlacementFields {
            rotation: value.rotation().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
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

    fn assemble(&self, fields: &PointPlacementFields, arena: &Arena) -> PointPlacement {
        arena.factory().point_placement(
            arena.build_slot::<AnchorPointNode>(self.anchor_point),
            arena.build_slot::<DisplacementNode>(self.displacement),
            fields.rotation.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`PointPlacement`] for labels placed at a point. The default
    /// anchor is `(0, 0.5)`: labels start at the point, vertically centered.
    PointPlacementBuilder => PointPlacementNode, PointPlacement
}

impl PointPlacementBuilder {
    pub fn rotation(&self, rotation: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<PointPlacementNode>(|fields| fields.rotation = Some(rotation.into()));
        self
    }

    pub fn anchor_point(&self) -> AnchorPointBuilder {
        AnchorPointBuilder::from_cursor(
            self.cursor
                .slot::<PointPlacementNode, AnchorPointNode>(|node| &mut node.anchor_point),
        )
    }

    pub fn displacement(&self) -> DisplacementBuilder {
        DisplacementBuilder::from_cursor(
            self.cursor
                .slot::<PointPlacementNode, DisplacementNode>(|node| &mut node.displacement),
        )
    }
}

// ===== Line placement =====

pub(crate) struct LinePlacementFields {
    perpendicular_offset: Option<Expression>,
    initial_gap: Option<Expression>,
    gap: Option<Expression>,
    repeated: bool,
    aligned: bool,
    generalize_line: bool,
}

#[derive(Default)]
pub(crate) struct LinePlacementNode {
    state: State<LinePlacementFields>,
}

impl NodeData for LinePlacementNode {
    type Fields = LinePlacementFields;
    type Output = LinePlacement;

    node_state!(LinePlacementFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> LinePlacement {
        factory.default_line_placement()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &LinePlacement, status: Status) {
        let fields = LinePlacementFields {
            perpendicular_offset: value.perpendicular_offset().cloned(),
            initial_gap: value.initial_gap().cloned(),
            gap: value.gap().cloned(),
            repeated: value.is_repeated(),
            aligned: value.is_aligned(),
            generalize_line: value.is_generalize_line(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &LinePlacementFields, arena: &Arena) -> LinePlacement {
        arena.factory().line_placement(
            fields.perpendicular_offset.clone(),
            fields.initial_gap.clone(),
            fields.gap.clone(),
            fields.repeated,
            fields.aligned,
            fields.generalize_line,
        )
    }
}

builder_handle! {
    /// Builds a [`LinePlacement`] for labels that follow a line.
    ///
    /// [`reset_from`](crate::Builder::reset_from) only accepts a line
    /// placement; a text symbolizer chooses between point and line builders
    /// by the variant of its [`LabelPlacement`](mapstyle_core::style::LabelPlacement).
    LinePlacementBuilder => LinePlacementNode, LinePlacement
}

impl LinePlacementBuilder {
    /// Offset from the line in pixels; positive values are to the left.
    pub fn perpendicular_offset(&self, offset: impl Into<Expression>) -> &Self {
        self.cursor.update::<LinePlacementNode>(|fields| {
            fields.perpendicular_offset = Some(offset.into());
        });
        self
    }

    pub fn initial_gap(&self, gap: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<LinePlacementNode>(|fields| fields.initial_gap = Some(gap.into()));
        self
    }

    pub fn gap(&self, gap: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<LinePlacementNode>(|fields| fields.gap = Some(gap.into()));
        self
    }

    pub fn repeated(&self, repeated: bool) -> &Self {
        self.cursor
            .update::<LinePlacementNode>(|fields| fields.repeated = repeated);
        self
    }

    pub fn aligned(&self, aligned: bool) -> &Self {
        self.cursor
            .update::<LinePlacementNode>(|fields| fields.aligned = aligned);
        self
    }

    pub fn generalize_line(&self, generalize: bool) -> &Self {
        self.cursor
            .update::<LinePlacementNode>(|fields| fields.generalize_line = generalize);
        self
    }
}
