//! Rule and feature type style builders.

use mapstyle_core::{
    expr::{Expression, Filter},
    factory::StyleFactory,
    style::{FeatureTypeStyle, Rule, SemanticType, VendorOptions},
};
use mapstyle_cql::CqlError;

use super::{
    GraphicBuilder, LineSymbolizerBuilder, PointSymbolizerBuilder, PolygonSymbolizerBuilder,
    RasterSymbolizerBuilder, TextSymbolizerBuilder,
    basic::DescriptionNode,
    builder_handle, description_accessors,
    graphic::GraphicNode,
    symbolizer::{
        LineSymbolizerNode, PointSymbolizerNode, PolygonSymbolizerNode, RasterSymbolizerNode,
        TextSymbolizerNode, build_symbolizer, push_symbolizer,
    },
};
use crate::{
    arena::{Arena, ListFn, NodeId},
    node::{NodeData, State, Status, node_state},
};

// ===== Rule =====

pub(crate) struct RuleFields {
    name: Option<String>,
    min_scale_denominator: f64,
    max_scale_denominator: f64,
    filter: Option<Filter>,
    else_filter: bool,
}

#[derive(Default)]
pub(crate) struct RuleNode {
    state: State<RuleFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) legend: Option<NodeId>,
    /// Symbolizers of any kind, in drawing order.
    pub(crate) symbolizers: Vec<NodeId>,
}

impl NodeData for RuleNode {
    type Fields = RuleFields;
    type Output = Rule;

    node_state!(RuleFields);

    fn children(&self) -> Vec<NodeId> {
        let mut children = self.symbolizers.clone();
        children.extend(self.description);
        children.extend(self.legend);
        children
    }

    fn default_value(factory: &dyn StyleFactory) -> Rule {
        factory.default_rule()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &Rule, status: Status) {
        let fields = RuleFields {
            name: value.name().map(str::to_string),
            min_scale_denominator: value.min_scale_denominator(),
            max_scale_denominator: value.max_scale_denominator(),
            filter: value.filter().cloned(),
            else_filter: value.is_else_filter(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, DescriptionNode>(
            id,
            |node| &mut node.description,
            value.description(),
            status,
        );
        arena.restore_slot::<Self, GraphicNode>(id, |node| &mut node.legend, value.legend(), status);

        let symbolizers: ListFn<Self> = |node| &mut node.symbolizers;
        arena.clear_list::<Self>(id, symbolizers);
        for symbolizer in value.symbolizers() {
            push_symbolizer::<Self>(arena, id, symbolizers, symbolizer, status);
        }
    }

    fn assemble(&self, fields: &RuleFields, arena: &Arena) -> Rule {
        let symbolizers = self
            .symbolizers
            .iter()
            .filter_map(|&id| build_symbolizer(arena, id))
            .collect();

        arena.factory().rule(
            fields.name.clone(),
            arena.build_slot::<DescriptionNode>(self.description),
            arena.build_slot::<GraphicNode>(self.legend),
            fields.min_scale_denominator,
            fields.max_scale_denominator,
            symbolizers,
            fields.filter.clone(),
            fields.else_filter,
        )
    }
}

builder_handle! {
    /// Builds a [`Rule`]: a filter, a scale range and the symbolizers drawn
    /// for matching features.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, RuleBuilder};
    ///
    /// let rule = RuleBuilder::new();
    /// rule.name("major roads")
    ///     .max_scale_denominator(50_000.0)
    ///     .cql_filter("class IN ('motorway', 'trunk')")
    ///     .unwrap();
    /// rule.line().stroke().width(4.0);
    /// rule.text().label_cql("name").unwrap();
    ///
    /// let built = rule.build().unwrap();
    /// assert_eq!(built.symbolizers().len(), 2);
    /// assert!(built.filter().is_some());
    /// ```
    RuleBuilder => RuleNode, Rule
}

description_accessors!(RuleBuilder, RuleNode);

impl RuleBuilder {
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<RuleNode>(|fields| fields.name = Some(name.into()));
        self
    }

    pub fn min_scale_denominator(&self, scale: f64) -> &Self {
        self.cursor
            .update::<RuleNode>(|fields| fields.min_scale_denominator = scale);
        self
    }

    pub fn max_scale_denominator(&self, scale: f64) -> &Self {
        self.cursor
            .update::<RuleNode>(|fields| fields.max_scale_denominator = scale);
        self
    }

    pub fn filter(&self, filter: Filter) -> &Self {
        self.cursor
            .update::<RuleNode>(|fields| fields.filter = Some(filter));
        self
    }

    /// Compiles the filter from CQL text.
    ///
    /// # Errors
    ///
    /// Returns a [`CqlError`] when the text is valid in neither grammar; the
    /// builder is left unchanged.
    pub fn cql_filter(&self, text: &str) -> Result<&Self, CqlError> {
        let filter = mapstyle_cql::filter(text)?;
        Ok(self.filter(filter))
    }

    /// Marks the rule as applying to features no sibling rule matched.
    pub fn else_filter(&self, else_filter: bool) -> &Self {
        self.cursor
            .update::<RuleNode>(|fields| fields.else_filter = else_filter);
        self
    }

    pub fn legend(&self) -> GraphicBuilder {
        GraphicBuilder::from_cursor(
            self.cursor
                .slot::<RuleNode, GraphicNode>(|node| &mut node.legend),
        )
    }

    pub fn point(&self) -> PointSymbolizerBuilder {
        PointSymbolizerBuilder::from_cursor(
            self.cursor
                .append::<RuleNode, PointSymbolizerNode>(|node| &mut node.symbolizers),
        )
    }

    pub fn line(&self) -> LineSymbolizerBuilder {
        LineSymbolizerBuilder::from_cursor(
            self.cursor
                .append::<RuleNode, LineSymbolizerNode>(|node| &mut node.symbolizers),
        )
    }

    pub fn polygon(&self) -> PolygonSymbolizerBuilder {
        PolygonSymbolizerBuilder::from_cursor(
            self.cursor
                .append::<RuleNode, PolygonSymbolizerNode>(|node| &mut node.symbolizers),
        )
    }

    pub fn text(&self) -> TextSymbolizerBuilder {
        TextSymbolizerBuilder::from_cursor(
            self.cursor
                .append::<RuleNode, TextSymbolizerNode>(|node| &mut node.symbolizers),
        )
    }

    pub fn raster(&self) -> RasterSymbolizerBuilder {
        RasterSymbolizerBuilder::from_cursor(
            self.cursor
                .append::<RuleNode, RasterSymbolizerNode>(|node| &mut node.symbolizers),
        )
    }
}

// ===== Feature type style =====

pub(crate) struct FeatureTypeStyleFields {
    name: Option<String>,
    feature_type_names: Vec<String>,
    semantic_types: Vec<SemanticType>,
    options: VendorOptions,
    transformation: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct FeatureTypeStyleNode {
    state: State<FeatureTypeStyleFields>,
    pub(crate) description: Option<NodeId>,
    pub(crate) rules: Vec<NodeId>,
}

impl NodeData for FeatureTypeStyleNode {
    type Fields = FeatureTypeStyleFields;
    type Output = FeatureTypeStyle;

    node_state!(FeatureTypeStyleFields);

    fn children(&self) -> Vec<NodeId> {
        let mut children = self.rules.clone();
        children.extend(self.description);
        children
    }

    fn default_value(factory: &dyn StyleFactory) -> FeatureTypeStyle {
        factory.default_feature_type_style()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &FeatureTypeStyle, status: Status) {
        let fields = FeatureTypeStyleFields {
            name: value.name().map(str::to_string),
            feature_type_names: value.feature_type_names().to_vec(),
            semantic_types: value.semantic_types().to_vec(),
            options: value.options().clone(),
            transformation: value.transformation().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, DescriptionNode>(
            id,
            |node| &mut node.description,
            value.description(),
            status,
        );
        arena.restore_list::<Self, RuleNode>(id, |node| &mut node.rules, value.rules(), status);
    }

    fn assemble(&self, fields: &FeatureTypeStyleFields, arena: &Arena) -> FeatureTypeStyle {
        arena.factory().feature_type_style(
            fields.name.clone(),
            arena.build_slot::<DescriptionNode>(self.description),
            fields.feature_type_names.clone(),
            fields.semantic_types.clone(),
            arena.build_list::<RuleNode>(&self.rules),
            fields.options.clone(),
            fields.transformation.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`FeatureTypeStyle`]: the rules applied to one feature type.
    FeatureTypeStyleBuilder => FeatureTypeStyleNode, FeatureTypeStyle
}

description_accessors!(FeatureTypeStyleBuilder, FeatureTypeStyleNode);

impl FeatureTypeStyleBuilder {
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<FeatureTypeStyleNode>(|fields| fields.name = Some(name.into()));
        self
    }

    /// Adds a feature type the style applies to.
    pub fn feature_type_name(&self, name: impl Into<String>) -> &Self {
        self.cursor
            .update::<FeatureTypeStyleNode>(|fields| fields.feature_type_names.push(name.into()));
        self
    }

    pub fn semantic_type(&self, semantic_type: SemanticType) -> &Self {
        self.cursor
            .update::<FeatureTypeStyleNode>(|fields| fields.semantic_types.push(semantic_type));
        self
    }

    /// A rendering transformation applied to the data before the rules.
    pub fn transformation(&self, transformation: impl Into<Expression>) -> &Self {
        self.cursor.update::<FeatureTypeStyleNode>(|fields| {
            fields.transformation = Some(transformation.into());
        });
        self
    }

    /// Sets a vendor option, replacing an earlier value for the same key.
    pub fn option(&self, key: impl Into<String>, value: impl Into<String>) -> &Self {
        self.cursor.update::<FeatureTypeStyleNode>(|fields| {
            fields.options.insert(key.into(), value.into());
        });
        self
    }

    pub fn rule(&self) -> RuleBuilder {
        RuleBuilder::from_cursor(
            self.cursor
                .append::<FeatureTypeStyleNode, RuleNode>(|node| &mut node.rules),
        )
    }
}
