//! Fill builder.

use mapstyle_core::{expr::Expression, factory::StyleFactory, style::Fill};

use super::{GraphicBuilder, builder_handle, graphic::GraphicNode, parse_hex};
use crate::{
    arena::{Arena, NodeId},
    error::BuildError,
    node::{NodeData, State, Status, node_state},
};

pub(crate) struct FillFields {
    color: Option<Expression>,
    opacity: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct FillNode {
    state: State<FillFields>,
    pub(crate) graphic_fill: Option<NodeId>,
}

impl NodeData for FillNode {
    type Fields = FillFields;
    type Output = Fill;

    node_state!(FillFields);

    fn children(&self) -> Vec<NodeId> {
        self.graphic_fill.into_iter().collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> Fill {
        factory.default_fill()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Fill, status: Status) {
        let fields = FillFields {
            color: value.color().cloned(),
            opacity: value.opacity().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, GraphicNode>(
            id,
            |node| &mut node.graphic_fill,
            value.graphic_fill(),
            status,
        );
    }

    fn assemble(&self, fields: &FillFields, arena: &Arena) -> Fill {
        arena.factory().fill(
            fields.color.clone(),
            fields.opacity.clone(),
            arena.build_slot::<GraphicNode>(self.graphic_fill),
        )
    }
}

builder_handle! {
    /// Builds a [`Fill`] for polygon interiors, marks and text.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, FillBuilder};
    /// use mapstyle_core::expr::EvaluationContext;
    ///
    /// let fill = FillBuilder::new().color_hex("#00FF00").unwrap().build().unwrap();
    /// let color = fill.color().unwrap().evaluate(&EvaluationContext::new());
    /// assert_eq!(color.to_color().unwrap().to_rgb8(), [0, 255, 0]);
    /// ```
    FillBuilder => FillNode, Fill
}

impl FillBuilder {
    pub fn color(&self, color: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<FillNode>(|fields| fields.color = Some(color.into()));
        self
    }

    /// Sets the color from a `#RRGGBB` or `#RRGGBBAA` literal.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidColor`] when the literal is not a hex color.
    pub fn color_hex(&self, literal: &str) -> Result<&Self, BuildError> {
        let color = parse_hex(literal)?;
        Ok(self.color(color))
    }

    pub fn opacity(&self, opacity: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<FillNode>(|fields| fields.opacity = Some(opacity.into()));
        self
    }

    /// The graphic repeated to fill the area instead of a solid color.
    pub fn graphic_fill(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<FillNode, GraphicNode>(|node| &mut node.graphic_fill),
        )
    }
}
