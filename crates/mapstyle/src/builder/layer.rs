//! Style, layer and descriptor builders: the top of the tree.

use mapstyle_core::{
    expr::Filter,
    factory::StyleFactory,
    style::{
        FeatureTypeConstraint, NamedLayer, Style, StyledLayer, StyledLayerDescriptor, UserLayer,
    },
};
use mapstyle_cql::CqlError;

use super::{
    ExtentBuilder, FeatureTypeStyleBuilder,
    basic::{DescriptionNode, ExtentNode},
    builder_handle, description_accessors,
    rule::FeatureTypeStyleNode,
};
use crate::{
    arena::{Arena, ListFn, NodeId},
    node::{NodeData, NodeKind, State, Status, node_state},
};

// ===== Style =====

pub(crate) struct StyleFields {
    name: Option<String>,
    is_default: bool,
}

#[derive(Default)]
pub(crate) struct StyleNode {
    state: State<StyleFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) feature_type_styles: Vec<NodeId>,
}

impl NodeData for StyleNode {
    type Fields = StyleFields;
    type Output = Style;

    node_state!(StyleFields);

    fn children(&self) -> Vec<NodeId> {
        let mut children = self.feature_type_styles.clone();
        children.extend(self.description);
        children
    }

    fn default_value(factory: &dyn StyleFactory) -> Style {
        factory.default_style()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Style, status: Status) {
        let fields = StyleFields {
            name: value.name().map(str::to_string),
            is_default: value.is_default(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, DescriptionNode>(
            id,
            |node| &mut node.description,
            value.description(),
            status,
        );
        arena.restore_list::<Self, FeatureTypeStyleNode>(
            id,
            |node| &mut node.feature_type_styles,
            value.feature_type_styles(),
            status,
        );
    }

    fn assemble(&self, fields: &StyleFields, arena: &Arena) -> Style {
        arena.factory().style(
            fields.name.clone(),
            arena.build_slot::<DescriptionNode>(self.description),
            fields.is_default,
            arena.build_list::<FeatureTypeStyleNode>(&self.feature_type_styles),
        )
    }
}

builder_handle! {
    /// Builds a [`Style`]: an ordered list of feature type styles.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, StyleBuilder};
    ///
    /// let style = StyleBuilder::new();
    /// style.name("roads").default_style(true);
    /// style
    ///     .feature_type_style()
    ///     .rule()
    ///     .line()
    ///     .stroke()
    ///     .color("#333333")
    ///     .width(2.0);
    ///
    /// let built = style.build().unwrap();
    /// assert!(built.is_default());
    /// assert_eq!(built.feature_type_styles()[0].rules().len(), 1);
    /// ```
    StyleBuilder => StyleNode, Style
}

description_accessors!(StyleBuilder, StyleNode);

impl StyleBuilder {
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<StyleNode>(|fields| fields.name = Some(name.into()));
        self
    }

    /// Marks the style as the layer's default.
    pub fn default_style(&self, is_default: bool) -> &Self {
        self.cursor
            .update::<StyleNode>(|fields| fields.is_default = is_default);
        self
    }

    pub fn feature_type_style(&self) -> FeatureTypeStyleBuilder {
        FeatureTypeStyleBuilder::from_cursor(
            self.cursor
                .append::<StyleNode, FeatureTypeStyleNode>(|node| &mut node.feature_type_styles),
        )
    }
}

// ===== Feature type constraint =====

pub(crate) struct FeatureTypeConstraintFields {
    feature_type_name: Option<String>,
    filter: Option<Filter>,
}

#[derive(Default)]
pub(crate) struct FeatureTypeConstraintNode {
    state: State<FeatureTypeConstraintFields>,
    pub(crate) extents: Vec<NodeId>,
}

impl NodeData for FeatureTypeConstraintNode {
    type Fields = FeatureTypeConstraintFields;
    type Output = FeatureTypeConstraint;

    node_state!(FeatureTypeConstraintFields);

    fn children(&self) -> Vec<NodeId> {
        self.extents.clone()
    }

    fn default_value(factory: &dyn StyleFactory) -> FeatureTypeConstraint {
        factory.default_feature_type_constraint()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &FeatureTypeConstraint, status: Status) {
        let fields = FeatureTypeConstraintFields {
            feature_type_name: value.feature_type_name().map(str::to_string),
            filter: value.filter().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_list::<Self, ExtentNode>(
            id,
            |node| &mut node.extents,
            value.extents(),
            status,
        );
    }

    fn assemble(&self, fields: &FeatureTypeConstraintFields, arena: &Arena) -> FeatureTypeConstraint {
        arena.factory().feature_type_constraint(
            fields.feature_type_name.clone(),
            fields.filter.clone(),
            arena.build_list::<ExtentNode>(&self.extents),
        )
    }
}

builder_handle! {
    /// Builds a [`FeatureTypeConstraint`] restricting which features of a
    /// layer are drawn.
    FeatureTypeConstraintBuilder => FeatureTypeConstraintNode, FeatureTypeConstraint
}

impl FeatureTypeConstraintBuilder {
    pub fn feature_type_name(&self, name: impl Into<String>) -> &Self {
        self.cursor.update::<FeatureTypeConstraintNode>(|fields| {
            fields.feature_type_name = Some(name.into());
        });
        self
    }

    pub fn filter(&self, filter: Filter) -> &Self {
        self.cursor
            .update::<FeatureTypeConstraintNode>(|fields| fields.filter = Some(filter));
        self
    }

    /// Compiles the filter from CQL text.
    ///
    /// # Errors
    ///
    /// Returns a [`CqlError`] when the text is valid in neither grammar.
    pub fn cql_filter(&self, text: &str) -> Result<&Self, CqlError> {
        let filter = mapstyle_cql::filter(text)?;
        Ok(self.filter(filter))
    }

    pub fn extent(&self) -> ExtentBuilder {
        ExtentBuilder::from_cursor(
            self.cursor
                .append::<FeatureTypeConstraintNode, ExtentNode>(|node| &mut node.extents),
        )
    }
}

// ===== Layers =====

pub(crate) struct LayerFields {
    name: Option<String>,
}

/// Declares a layer node and its builder; named and user layers share a shape.
macro_rules! layer_kind {
    ($(#[$meta:meta])* $builder:ident => $node:ident, $output:ident, $default:ident, $construct:ident) => {
        #[derive(Default)]
        pub(crate) struct $node {
            state: State<LayerFields>,
            pub(crate) styles: Vec<NodeId>,
            pub(crate) constraints: Vec<NodeId>,
        }

        impl NodeData for $node {
            type Fields = LayerFields;
            type Output = $output;

            node_state!(LayerFields);

            fn children(&self) -> Vec<NodeId> {
                self.styles
                    .iter()
                    .chain(&self.constraints)
                    .copied()
                    .collect()
            }

            fn default_value(factory: &dyn StyleFactory) -> $output {
                factory.$default()
            }

            fn restore(arena: &mut Arena, id: NodeId, value: &$output, status: Status) {
                let fields = LayerFields {
                    name: value.name().map(str::to_string),
                };
                arena.set_fields::<Self>(id, status, fields);
                arena.restore_list::<Self, StyleNode>(
                    id,
                    |node| &mut node.styles,
                    value.styles(),
                    status,
                );
                arena.restore_list::<Self, FeatureTypeConstraintNode>(
                    id,
                    |node| &mut node.constraints,
                    value.feature_constraints(),
                    status,
                );
            }

            fn assemble(&self, fields: &LayerFields, arena: &Arena) -> $output {
                arena.factory().$construct(
                    fields.name.clone(),
                    arena.build_list::<StyleNode>(&self.styles),
                    arena.build_list::<FeatureTypeConstraintNode>(&self.constraints),
                )
            }
        }

        builder_handle! {
            $(#[$meta])*
            $builder => $node, $output
        }

        impl $builder {
            pub fn name(&self, name: impl Into<String>) -> &Self {
                self.cursor
                    .update::<$node>(|fields| fields.name = Some(name.into()));
                self
            }

            pub fn style(&self) -> StyleBuilder {
                StyleBuilder::from_cursor(
                    self.cursor
                        .append::<$node, StyleNode>(|node| &mut node.styles),
                )
            }

            pub fn feature_type_constraint(&self) -> FeatureTypeConstraintBuilder {
                FeatureTypeConstraintBuilder::from_cursor(
                    self.cursor
                        .append::<$node, FeatureTypeConstraintNode>(|node| &mut node.constraints),
                )
            }
        }
    };
}

layer_kind! {
    /// Builds a [`NamedLayer`]: styles for a layer the server already knows.
    NamedLayerBuilder => NamedLayerNode, NamedLayer, default_named_layer, named_layer
}

layer_kind! {
    /// Builds a [`UserLayer`]: styles for a layer defined by the request.
    UserLayerBuilder => UserLayerNode, UserLayer, default_user_layer, user_layer
}

// ===== Styled layer descriptor =====

pub(crate) struct StyledLayerDescriptorFields {
    name: Option<String>,
    title: Option<String>,
    abstract_text: Option<String>,
}

#[derive(Default)]
pub(crate) struct StyledLayerDescriptorNode {
    state: State<StyledLayerDescriptorFields>,
    /// Named and user layers, in document order.
    pub(crate) layers: Vec<NodeId>,
}

impl NodeData for StyledLayerDescriptorNode {
    type Fields = StyledLayerDescriptorFields;
    type Output = StyledLayerDescriptor;

    node_state!(StyledLayerDescriptorFields);

    fn children(&self) -> Vec<NodeId> {
        self.layers.clone()
    }

    fn default_value(factory: &dyn StyleFactory) -> StyledLayerDescriptor {
        factory.default_styled_layer_descriptor()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &StyledLayerDescriptor, status: Status) {
        let fields = StyledLayerDescriptorFields {
            name: value.name().map(str::to_string),
            title: value.title().map(str::to_string),
            abstract_text: value.abstract_text().map(str::to_string),
        };
        arena.set_fields::<Self>(id, status, fields);

        let layers: ListFn<Self> = |node| &mut node.layers;
        arena.clear_list::<Self>(id, layers);
        for layer in value.layers() {
            match layer {
                StyledLayer::Named(named) => {
                    arena.push_child::<Self, NamedLayerNode>(id, layers, named, status);
                }
                StyledLayer::User(user) => {
                    arena.push_child::<Self, UserLayerNode>(id, layers, user, status);
                }
            }
        }
    }

    fn assemble(&self, fields: &StyledLayerDescriptorFields, arena: &Arena) -> StyledLayerDescriptor {
        let layers = self
            .layers
            .iter()
            .filter_map(|&id| match arena.kind(id)? {
                NodeKind::NamedLayer => arena.build::<NamedLayerNode>(id).map(StyledLayer::Named),
                NodeKind::UserLayer => arena.build::<UserLayerNode>(id).map(StyledLayer::User),
                _ => None,
            })
            .collect();

        arena.factory().styled_layer_descriptor(
            fields.name.clone(),
            fields.title.clone(),
            fields.abstract_text.clone(),
            layers,
        )
    }
}

builder_handle! {
    /// Builds a [`StyledLayerDescriptor`], the document root.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, StyledLayerDescriptorBuilder};
    ///
    /// let sld = StyledLayerDescriptorBuilder::new();
    /// sld.name("basemap");
    /// sld.named_layer().name("roads").style().name("default");
    /// sld.user_layer().name("annotations");
    ///
    /// let built = sld.build().unwrap();
    /// assert_eq!(built.layers().len(), 2);
    /// assert_eq!(built.styles().count(), 1);
    /// ```
    StyledLayerDescriptorBuilder => StyledLayerDescriptorNode, StyledLayerDescriptor
}

impl StyledLayerDescriptorBuilder {
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<StyledLayerDescriptorNode>(|fields| fields.name = Some(name.into()));
        self
    }

    pub fn title(&self, title: impl Into<String>) -> &Self {
        self.cursor
            .update::<StyledLayerDescriptorNode>(|fields| fields.title = Some(title.into()));
        self
    }

    pub fn abstract_text(&self, abstract_text: impl Into<String>) -> &Self {
        self.cursor.update::<StyledLayerDescriptorNode>(|fields| {
            fields.abstract_text = Some(abstract_text.into());
        });
        self
    }

    pub fn named_layer(&self) -> NamedLayerBuilder {
        NamedLayerBuilder::from_cursor(
            self.cursor
                .append::<StyledLayerDescriptorNode, NamedLayerNode>(|node| &mut node.layers),
        )
    }

    pub fn user_layer(&self) -> UserLayerBuilder {
        UserLayerBuilder::from_cursor(
            self.cursor
                .append::<StyledLayerDescriptorNode, UserLayerNode>(|node| &mut node.layers),
        )
    }
}

#[cfg(test)]
mod tests {
    use mapstyle_core::expr::EvaluationContext;

    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_style_defaults() {
        let style = StyleBuilder::new().build().unwrap();
        assert!(!style.is_default());
        assert!(style.name().is_none());
        assert!(style.feature_type_styles().is_empty());
    }

    #[test]
    fn test_style_title() {
        let style = StyleBuilder::new();
        style.title("Roads");
        let built = style.build().unwrap();
        assert_eq!(built.description().and_then(|d| d.title()), Some("Roads"));
    }

    #[test]
    fn test_constraint_with_extents() {
        let constraint = FeatureTypeConstraintBuilder::new();
        constraint
            .feature_type_name("roads")
            .cql_filter("lanes >= 2")
            .unwrap();
        constraint.extent().name("time").value("2024");
        let built = constraint.build().unwrap();

        assert_eq!(built.feature_type_name(), Some("roads"));
        assert_eq!(built.extents().len(), 1);
        assert!(
            built
                .filter()
                .unwrap()
                .evaluate(&EvaluationContext::new().with("lanes", 4))
        );
    }

    #[test]
    fn test_layers_keep_document_order() {
        let sld = StyledLayerDescriptorBuilder::new();
        sld.user_layer().name("first");
        sld.named_layer().name("second");
        let built = sld.build().unwrap();

        let names: Vec<_> = built.layers().iter().map(StyledLayer::name).collect();
        assert_eq!(names, [Some("first"), Some("second")]);
        assert!(built.layers()[0].as_user().is_some());
        assert!(built.layers()[1].as_named().is_some());
    }

    #[test]
    fn test_sld_round_trip() {
        let source = StyledLayerDescriptorBuilder::new();
        source.title("Basemap").abstract_text("Roads and water");
        let layer = source.named_layer();
        layer.name("water");
        layer.feature_type_constraint().feature_type_name("lakes");
        layer
            .style()
            .feature_type_style()
            .rule()
            .polygon()
            .fill()
            .color("#0000FF");
        source.user_layer().name("labels").style().default_style(true);
        let value = source.build().unwrap();

        let copy = StyledLayerDescriptorBuilder::new();
        copy.reset_from(Some(&value));
        assert_eq!(copy.status(), Status::Explicit);
        assert_eq!(copy.build(), Some(value));
    }

    #[test]
    fn test_unset_layer_is_skipped() {
        let sld = StyledLayerDescriptorBuilder::new();
        sld.named_layer().name("kept");
        sld.named_layer().unset();
        assert_eq!(sld.build().unwrap().layers().len(), 1);
    }
}
