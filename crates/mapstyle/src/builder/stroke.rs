//! Stroke builder.

use mapstyle_core::{expr::Expression, factory::StyleFactory, style::Stroke};

use super::{GraphicBuilder, builder_handle, graphic::GraphicNode, parse_hex};
use crate::{
    arena::{Arena, NodeId},
    error::BuildError,
    node::{NodeData, State, Status, node_state},
};

pub(crate) struct StrokeFields {
    color: Option<Expression>,
    width: Option<Expression>,
    opacity: Option<Expression>,
    line_join: Option<Expression>,
    line_cap: Option<Expression>,
    dash_array: Vec<f32>,
    dash_expressions: Vec<Expression>,
    dash_offset: Option<Expression>,
}

impl StrokeFields {
    /// The expression list wins over the float array when both are present.
    fn dashes(&self) -> Vec<Expression> {
        if !self.dash_expressions.is_empty() {
            return self.dash_expressions.clone();
        }
        self.dash_array
            .iter()
            .map(|&dash| Expression::literal(dash))
            .collect()
    }
}

#[derive(Default)]
pub(crate) struct StrokeNode {
    state: State<StrokeFields>,
    pub(crate) graphic_fill: Option<NodeId>,
    pub(crate) graphic_stroke: Option<NodeId>,
}

impl NodeData for StrokeNode {
    type Fields = StrokeFields;
    type Output = Stroke;

    node_state!(StrokeFields);

    fn children(&self) -> Vec<NodeId> {
        self.graphic_fill
            .into_iter()
            .chain(self.graphic_stroke)
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> Stroke {
        factory.default_stroke()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Stroke, status: Status) {
        let fields = StrokeFields {
            color: value.color().cloned(),
            width: value.width().cloned(),
            opacity: value.opacity().cloned(),
            line_join: value.line_join().cloned(),
            line_cap: value.line_cap().cloned(),
            dash_array: Vec::new(),
            dash_expressions: value.dash_array().to_vec(),
            dash_offset: value.dash_offset().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, GraphicNode>(
            id,
            |node| &mut node.graphic_fill,
            value.graphic_fill(),
            status,
        );
        arena.restore_slot::<Self, GraphicNode>(
            id,
            |node| &mut node.graphic_stroke,
            value.graphic_stroke(),
            status,
        );
    }

    fn assemble(&self, fields: &StrokeFields, arena: &Arena) -> Stroke {
        arena.factory().stroke(
            fields.color.clone(),
            fields.width.clone(),
            fields.opacity.clone(),
            fields.line_join.clone(),
            fields.line_cap.clone(),
            fields.dashes(),
            fields.dash_offset.clone(),
            arena.build_slot::<GraphicNode>(self.graphic_fill),
            arena.build_slot::<GraphicNode>(self.graphic_stroke),
        )
    }
}

builder_handle! {
    /// Builds a [`Stroke`] for lines and outlines.
    ///
    /// Defaults to a solid black line one pixel wide with mitred joins and
    /// butt caps.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, StrokeBuilder};
    /// use mapstyle_core::style::LineCap;
    ///
    /// let stroke = StrokeBuilder::new()
    ///     .color("#FF0000")
    ///     .width(2.0)
    ///     .line_cap(LineCap::Round)
    ///     .dash_array(&[4.0, 2.0])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(stroke.dash_array_floats(), Some(vec![4.0, 2.0]));
    /// ```
    StrokeBuilder => StrokeNode, Stroke
}

impl StrokeBuilder {
    pub fn color(&self, color: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.color = Some(color.into()));
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

    pub fn width(&self, width: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.width = Some(width.into()));
        self
    }

    pub fn opacity(&self, opacity: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.opacity = Some(opacity.into()));
        self
    }

    /// Accepts a [`LineJoin`](mapstyle_core::style::LineJoin) or any expression.
    pub fn line_join(&self, line_join: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.line_join = Some(line_join.into()));
        self
    }

    /// Accepts a [`LineCap`](mapstyle_core::style::LineCap) or any expression.
    pub fn line_cap(&self, line_cap: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.line_cap = Some(line_cap.into()));
        self
    }

    /// Sets the dash pattern as alternating dash and gap lengths.
    pub fn dash_array(&self, dashes: &[f32]) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.dash_array = dashes.to_vec());
        self
    }

    /// Sets the dash pattern as expressions; takes precedence over
    /// [`dash_array`](Self::dash_array) when not empty.
    pub fn dash_array_expressions(&self, dashes: impl IntoIterator<Item = Expression>) -> &Self {
        let dashes: Vec<Expression> = dashes.into_iter().collect();
        self.cursor
            .update::<StrokeNode>(|fields| fields.dash_expressions = dashes);
        self
    }

    pub fn dash_offset(&self, offset: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<StrokeNode>(|fields| fields.dash_offset = Some(offset.into()));
        self
    }

    pub fn graphic_fill(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<StrokeNode, GraphicNode>(|node| &mut node.graphic_fill),
        )
    }

    /// The graphic repeated along the line.
    pub fn graphic_stroke(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<StrokeNode, GraphicNode>(|node| &mut node.graphic_stroke),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use mapstyle_core::{
        color::Color,
        expr::{EvaluationContext, Value},
        style::{LineCap, LineJoin},
    };

    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_unset_stroke_builds_nothing() {
        assert!(StrokeBuilder::new().unset().build().is_none());
    }

    #[test]
    fn test_color_and_width_keep_other_defaults() {
        let stroke = StrokeBuilder::new()
            .color("#FF0000")
            .width(2.0)
            .build()
            .unwrap();

        let ctx = EvaluationContext::new();
        let color = stroke.color().unwrap().evaluate(&ctx).to_color();
        assert_eq!(color, Color::from_hex("#FF0000").ok());
        assert!(approx_eq!(f64, stroke.width().unwrap().literal_f64().unwrap(), 2.0));
        assert!(approx_eq!(f64, stroke.opacity().unwrap().literal_f64().unwrap(), 1.0));
        assert_eq!(stroke.line_join(), Some(&Expression::from(LineJoin::Miter)));
        assert_eq!(stroke.line_cap(), Some(&Expression::from(LineCap::Butt)));
        assert!(stroke.dash_array().is_empty());
    }

    #[test]
    fn test_dash_expressions_win_over_floats() {
        let stroke = StrokeBuilder::new()
            .dash_array(&[1.0, 1.0])
            .dash_array_expressions([Expression::property("dash"), Expression::from(3.0)])
            .build()
            .unwrap();
        assert_eq!(stroke.dash_array()[0].as_property(), Some("dash"));
        assert_eq!(stroke.dash_array().len(), 2);
    }

    #[test]
    fn test_round_trip_with_graphic_stroke() {
        let source = StrokeBuilder::new();
        source.width(3.0).graphic_stroke().size(6.0);
        let value = source.build().unwrap();

        let copy = StrokeBuilder::new();
        copy.reset_from(Some(&value));
        assert_eq!(copy.status(), Status::Explicit);
        assert_eq!(copy.build(), Some(value));
    }

    #[test]
    fn test_reset_from_none_unsets() {
        let builder = StrokeBuilder::new();
        builder.width(4.0).reset_from(None);
        assert!(builder.is_unset());
        assert!(builder.build().is_none());
    }

    #[test]
    fn test_root_build_resets_graphic_children() {
        let builder = StrokeBuilder::new();
        let graphic = builder.graphic_fill();
        graphic.size(4.0);

        let first = builder.build().unwrap();
        assert!(first.graphic_fill().is_some());

        let second = builder.build().unwrap();
        assert!(second.graphic_fill().is_none());
        assert!(graphic.is_unset(), "single slot returns to its initial state");
        assert_eq!(
            second.width().and_then(|width| width.as_literal()),
            Some(&Value::Float(1.0))
        );
    }
}
