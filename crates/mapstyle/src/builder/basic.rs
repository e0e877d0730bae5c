//! Leaf builders for small shared values.

use mapstyle_core::{
    expr::Expression,
    factory::StyleFactory,
    style::{AnchorPoint, Description, Displacement, Extent},
};

use super::builder_handle;
use crate::{
    arena::{Arena, NodeId},
    node::{NodeData, State, Status, node_state},
};

// ===== Anchor point =====

pub(crate) struct AnchorPointFields {
    x: Expression,
    y: Expression,
}

#[derive(Default)]
pub(crate) struct AnchorPointNode {
    state: State<AnchorPointFields>,
}

impl NodeData for AnchorPointNode {
    type Fields = AnchorPointFields;
    type Output = AnchorPoint;

    node_state!(AnchorPointFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> AnchorPoint {
        factory.default_anchor_point()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &AnchorPoint, status: Status) {
        let fields = AnchorPointFields {
            x: value.x().clone(),
            y: value.y().clone(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &AnchorPointFields, arena: &Arena) -> AnchorPoint {
        arena
            .factory()
            .anchor_point(fields.x.clone(), fields.y.clone())
    }
}

builder_handle! {
    /// Builds an [`AnchorPoint`], the relative position of a graphic or label
    /// against its geometry. Defaults to the center, `(0.5, 0.5)`.
    AnchorPointBuilder => AnchorPointNode, AnchorPoint
}

impl AnchorPointBuilder {
    /// Sets the horizontal fraction: `0.0` is the left edge, `1.0` the right.
    pub fn x(&self, x: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<AnchorPointNode>(|fields| fields.x = x.into());
        self
    }

    /// Sets the vertical fraction: `0.0` is the bottom edge, `1.0` the top.
    pub fn y(&self, y: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<AnchorPointNode>(|fields| fields.y = y.into());
        self
    }
}

// ===== Displacement =====

pub(crate) struct DisplacementFields {
    x: Expression,
    y: Expression,
}

#[derive(Default)]
pub(crate) struct DisplacementNode {
    state: State<DisplacementFields>,
}

impl NodeData for DisplacementNode {
    type Fields = DisplacementFields;
    type Output = Displacement;

    node_state!(DisplacementFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> Displacement {
        factory.default_displacement()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Displacement, status: Status) {
        let fields = DisplacementFields {
            x: value.x().clone(),
            y: value.y().clone(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &DisplacementFields, arena: &Arena) -> Displacement {
        arena
            .factory()
            .displacement(fields.x.clone(), fields.y.clone())
    }
}

builder_handle! {
    /// Builds a [`Displacement`] offset in pixels.
    DisplacementBuilder => DisplacementNode, Displacement
}

impl DisplacementBuilder {
    /// Sets the offset to the right.
    pub fn x(&self, x: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<DisplacementNode>(|fields| fields.x = x.into());
        self
    }

    /// Sets the upward offset.
    pub fn y(&self, y: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<DisplacementNode>(|fields| fields.y = y.into());
        self
    }
}

// ===== Description =====

pub(crate) struct DescriptionFields {
    title: Option<String>,
    abstract_text: Option<String>,
}

#[derive(Default)]
pub(crate) struct DescriptionNode {
    state: State<DescriptionFields>,
}

impl NodeData for DescriptionNode {
    type Fields = DescriptionFields;
    type Output = Description;

    node_state!(DescriptionFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> Description {
        factory.default_description()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Description, status: Status) {
        let fields = DescriptionFields {
            title: value.title().map(str::to_string),
            abstract_text: value.abstract_text().map(str::to_string),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &DescriptionFields, arena: &Arena) -> Description {
        arena
            .factory()
            .description(fields.title.clone(), fields.abstract_text.clone())
    }
}

builder_handle! {
    /// Builds a [`Description`]: a human readable title and abstract.
    DescriptionBuilder => DescriptionNode, Description
}

impl DescriptionBuilder {
    /// Sets the short title shown in legends.
    pub fn title(&self, title: impl Into<String>) -> &Self {
        self.cursor
            .update::<DescriptionNode>(|fields| fields.title = Some(title.into()));
        self
    }

    /// Sets the longer free-text description.
    pub fn abstract_text(&self, abstract_text: impl Into<String>) -> &Self {
        self.cursor.update::<DescriptionNode>(|fields| {
            fields.abstract_text = Some(abstract_text.into());
        });
        self
    }
}

// ===== Extent =====

pub(crate) struct ExtentFields {
    name: String,
    value: String,
}

#[derive(Default)]
pub(crate) struct ExtentNode {
    state: State<ExtentFields>,
}

impl NodeData for ExtentNode {
    type Fields = ExtentFields;
    type Output = Extent;

    node_state!(ExtentFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> Extent {
        factory.default_extent()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Extent, status: Status) {
        let fields = ExtentFields {
            name: value.name().to_string(),
            value: value.value().to_string(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ExtentFields, arena: &Arena) -> Extent {
        arena
            .factory()
            .extent(fields.name.clone(), fields.value.clone())
    }
}

builder_handle! {
    /// Builds a named [`Extent`] of a feature type constraint.
    ExtentBuilder => ExtentNode, Extent
}

impl ExtentBuilder {
    /// Sets the dimension name, such as `time` or `elevation`.
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExtentNode>(|fields| fields.name = name.into());
        self
    }

    /// Sets the allowed values, as the textual range or list.
    pub fn value(&self, value: impl Into<String>) -> &Self {
        self.cursor
            .update::<ExtentNode>(|fields| fields.value = value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_anchor_point_defaults_to_center() {
        let anchor = AnchorPointBuilder::new().build().unwrap();
        assert!(approx_eq!(f64, anchor.x().literal_f64().unwrap(), 0.5));
        assert!(approx_eq!(f64, anchor.y().literal_f64().unwrap(), 0.5));
    }

    #[test]
    fn test_anchor_point_accepts_property_expressions() {
        let anchor = AnchorPointBuilder::new()
            .x(Expression::property("anchor_x"))
            .y(1.0)
            .build()
            .unwrap();
        assert_eq!(anchor.x().as_property(), Some("anchor_x"));
        assert!(approx_eq!(f64, anchor.y().literal_f64().unwrap(), 1.0));
    }

    #[test]
    fn test_displacement_round_trip() {
        let value = Displacement::new(3.0.into(), (-2.0).into());
        let builder = DisplacementBuilder::new();
        assert_eq!(builder.reset_from(Some(&value)).build(), Some(value));
    }

    #[test]
    fn test_description_builds_title_only() {
        let builder = DescriptionBuilder::new();
        assert_eq!(builder.status(), Status::Default);

        let description = builder.title("Roads").build().unwrap();
        assert_eq!(description.title(), Some("Roads"));
        assert_eq!(description.abstract_text(), None);
    }

    #[test]
    fn test_extent_unset_builds_nothing() {
        let builder = ExtentBuilder::new();
        builder.name("time").value("2024-01-01/2024-12-31");
        assert!(builder.unset().build().is_none());
        assert!(builder.is_unset());
    }

    #[test]
    fn test_setter_populates_unset_builder() {
        let builder = ExtentBuilder::new();
        builder.unset();
        let extent = builder.name("elevation").build().unwrap();
        assert_eq!(extent.name(), "elevation");
        assert_eq!(extent.value(), "");
    }
}
