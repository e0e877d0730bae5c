//! Raster symbolization builders.

use indexmap::IndexMap;
use mapstyle_core::{
    expr::Expression,
    factory::StyleFactory,
    style::{
        ChannelSelection, ColorMap, ColorMapEntry, ColorMapKind, ContrastEnhancement,
        ContrastMethod, SelectedChannel, ShadedRelief,
    },
};

use super::{builder_handle, parse_hex};
use crate::{
    arena::{Arena, NodeId, SlotFn},
    error::BuildError,
    node::{NodeData, State, Status, node_state},
};

// ===== Shaded relief =====

pub(crate) struct ShadedReliefFields {
    brightness_only: bool,
    relief_factor: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct ShadedReliefNode {
    state: State<ShadedReliefFields>,
}

impl NodeData for ShadedReliefNode {
    type Fields = ShadedReliefFields;
    type Output = ShadedRelief;

    node_state!(ShadedReliefFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> ShadedRelief {
        factory.default_shaded_relief()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ShadedRelief, status: Status) {
        let fields = ShadedReliefFields {
            brightness_only: value.brightness_only(),
            relief_factor: value.relief_factor().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ShadedReliefFields, arena: &Arena) -> ShadedRelief {
        arena
            .factory()
            .shaded_relief(fields.brightness_only, fields.relief_factor.clone())
    }
}

builder_handle! {
    /// Builds a [`ShadedRelief`] hill-shading effect.
    ShadedReliefBuilder => ShadedReliefNode, ShadedRelief
}

impl ShadedReliefBuilder {
    pub fn brightness_only(&self, brightness_only: bool) -> &Self {
        self.cursor
            .update::<ShadedReliefNode>(|fields| fields.brightness_only = brightness_only);
        self
    }

    pub fn relief_factor(&self, factor: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<ShadedReliefNode>(|fields| fields.relief_factor = Some(factor.into()));
        self
    }
}

// ===== Contrast enhancement =====

pub(crate) struct ContrastEnhancementFields {
    method: ContrastMethod,
    gamma: Option<Expression>,
    options: IndexMap<String, Expression>,
}

#[derive(Default)]
pub(crate) struct ContrastEnhancementNode {
    state: State<ContrastEnhancementFields>,
}

impl NodeData for ContrastEnhancementNode {
    type Fields = ContrastEnhancementFields;
    type Output = ContrastEnhancement;

    node_state!(ContrastEnhancementFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> ContrastEnhancement {
        factory.default_contrast_enhancement()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ContrastEnhancement, status: Status) {
        let fields = ContrastEnhancementFields {
            method: value.method(),
            gamma: value.gamma().cloned(),
            options: value.options().clone(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ContrastEnhancementFields, arena: &Arena) -> ContrastEnhancement {
        arena.factory().contrast_enhancement(
            fields.method,
            fields.gamma.clone(),
            fields.options.clone(),
        )
    }
}

builder_handle! {
    /// Builds a [`ContrastEnhancement`] for a raster or a single channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, ContrastEnhancementBuilder};
    /// use mapstyle_core::style::ContrastMethod;
    ///
    /// let contrast = ContrastEnhancementBuilder::new()
    ///     .method(ContrastMethod::Normalize)
    ///     .option("algorithm", "StretchToMinimumMaximum")
    ///     .option("minValue", 50)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(contrast.options().len(), 2);
    /// ```
    ContrastEnhancementBuilder => ContrastEnhancementNode, ContrastEnhancement
}

impl ContrastEnhancementBuilder {
    pub fn method(&self, method: ContrastMethod) -> &Self {
        self.cursor
            .update::<ContrastEnhancementNode>(|fields| fields.method = method);
        self
    }

    pub fn gamma(&self, gamma: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<ContrastEnhancementNode>(|fields| fields.gamma = Some(gamma.into()));
        self
    }

    /// Sets an algorithm parameter, replacing an earlier value for the same key.
    pub fn option(&self, key: impl Into<String>, value: impl Into<Expression>) -> &Self {
        self.cursor.update::<ContrastEnhancementNode>(|fields| {
            fields.options.insert(key.into(), value.into());
        });
        self
    }
}

// ===== Color map entry =====

pub(crate) struct ColorMapEntryFields {
    label: Option<String>,
    color: Option<Expression>,
    opacity: Option<Expression>,
    quantity: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct ColorMapEntryNode {
    state: State<ColorMapEntryFields>,
}

impl NodeData for ColorMapEntryNode {
    type Fields = ColorMapEntryFields;
    type Output = ColorMapEntry;

    node_state!(ColorMapEntryFields);

    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn default_value(factory: &dyn StyleFactory) -> ColorMapEntry {
        factory.default_color_map_entry()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ColorMapEntry, status: Status) {
        let fields = ColorMapEntryFields {
            label: value.label().map(str::to_string),
            color: value.color().cloned(),
            opacity: value.opacity().cloned(),
            quantity: value.quantity().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
    }

    fn assemble(&self, fields: &ColorMapEntryFields, arena: &Arena) -> ColorMapEntry {
        arena.factory().color_map_entry(
            fields.label.clone(),
            fields.color.clone(),
            fields.opacity.clone(),
            fields.quantity.clone(),
        )
    }
}

builder_handle! {
    /// Builds one [`ColorMapEntry`] stop.
    ColorMapEntryBuilder => ColorMapEntryNode, ColorMapEntry
}

impl ColorMapEntryBuilder {
    pub fn label(&self, label: impl Into<String>) -> &Self {
        self.cursor
            .update::<ColorMapEntryNode>(|fields| fields.label = Some(label.into()));
        self
    }

    pub fn color(&self, color: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<ColorMapEntryNode>(|fields| fields.color = Some(color.into()));
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
            .update::<ColorMapEntryNode>(|fields| fields.opacity = Some(opacity.into()));
        self
    }

    pub fn quantity(&self, quantity: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<ColorMapEntryNode>(|fields| fields.quantity = Some(quantity.into()));
        self
    }
}

// ===== Color map =====

pub(crate) struct ColorMapFields {
    kind: ColorMapKind,
    extended_colors: bool,
}

#[derive(Default)]
pub(crate) struct ColorMapNode {
    state: State<ColorMapFields>,
    pub(crate) entries: Vec<NodeId>,
}

impl NodeData for ColorMapNode {
    type Fields = ColorMapFields;
    type Output = ColorMap;

    node_state!(ColorMapFields);

    fn children(&self) -> Vec<NodeId> {
        self.entries.clone()
    }

    fn default_value(factory: &dyn StyleFactory) -> ColorMap {
        factory.default_color_map()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ColorMap, status: Status) {
        let fields = ColorMapFields {
            kind: value.kind(),
            extended_colors: value.extended_colors(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_list::<Self, ColorMapEntryNode>(
            id,
            |node| &mut node.entries,
            value.entries(),
            status,
        );
    }

    fn assemble(&self, fields: &ColorMapFields, arena: &Arena) -> ColorMap {
        arena.factory().color_map(
            fields.kind,
            fields.extended_colors,
            arena.build_list::<ColorMapEntryNode>(&self.entries),
        )
    }
}

builder_handle! {
    /// Builds a [`ColorMap`] from an ordered list of entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle::{Builder, ColorMapBuilder};
    /// use mapstyle_core::style::ColorMapKind;
    ///
    /// let builder = ColorMapBuilder::new();
    /// builder.kind(ColorMapKind::Intervals);
    /// builder.entry().color_hex("#0000FF").unwrap().quantity(0.0);
    /// builder.entry().color_hex("#FF0000").unwrap().quantity(100.0);
    ///
    /// let map = builder.build().unwrap();
    /// assert_eq!(map.entries().len(), 2);
    /// ```
    ColorMapBuilder => ColorMapNode, ColorMap
}

impl ColorMapBuilder {
    pub fn kind(&self, kind: ColorMapKind) -> &Self {
        self.cursor.update::<ColorMapNode>(|fields| fields.kind = kind);
        self
    }

    pub fn extended_colors(&self, extended: bool) -> &Self {
        self.cursor
            .update::<ColorMapNode>(|fields| fields.extended_colors = extended);
        self
    }

    /// Appends a new entry.
    pub fn entry(&self) -> ColorMapEntryBuilder {
        ColorMapEntryBuilder::from_cursor(
            self.cursor
                .append::<ColorMapNode, ColorMapEntryNode>(|node| &mut node.entries),
        )
    }
}

// ===== Selected channel =====

pub(crate) struct SelectedChannelFields {
    channel_name: Option<Expression>,
}

#[derive(Default)]
pub(crate) struct SelectedChannelNode {
    state: State<SelectedChannelFields>,
    pub(crate) contrast_enhancement: Option<NodeId>,
}

impl NodeData for SelectedChannelNode {
    type Fields = SelectedChannelFields;
    type Output = SelectedChannel;

    node_state!(SelectedChannelFields);

    fn children(&self) -> Vec<NodeId> {
        self.contrast_enhancement.into_iter().collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> SelectedChannel {
        factory.default_selected_channel()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &SelectedChannel, status: Status) {
        let fields = SelectedChannelFields {
            channel_name: value.channel_name().cloned(),
        };
        arena.set_fields::<Self>(id, status, fields);
        arena.restore_slot::<Self, ContrastEnhancementNode>(
            id,
            |node| &mut node.contrast_enhancement,
            value.contrast_enhancement(),
            status,
        );
    }

    fn assemble(&self, fields: &SelectedChannelFields, arena: &Arena) -> SelectedChannel {
        arena.factory().selected_channel(
            fields.channel_name.clone(),
            arena.build_slot::<ContrastEnhancementNode>(self.contrast_enhancement),
        )
    }
}

builder_handle! {
    /// Builds a [`SelectedChannel`]: a source band name with optional contrast.
    SelectedChannelBuilder => SelectedChannelNode, SelectedChannel
}

impl SelectedChannelBuilder {
    pub fn channel_name(&self, name: impl Into<Expression>) -> &Self {
        self.cursor
            .update::<SelectedChannelNode>(|fields| fields.channel_name = Some(name.into()));
        self
    }

    pub fn contrast_enhancement(&self) -> ContrastEnhancementBuilder {
        ContrastEnhancementBuilder::from_cursor(
            self.cursor
                .slot::<SelectedChannelNode, ContrastEnhancementNode>(|node| {
                    &mut node.contrast_enhancement
                }),
        )
    }
}

// ===== Channel selection =====

pub(crate) struct ChannelSelectionFields;

#[derive(Default)]
pub(crate) struct ChannelSelectionNode {
    state: State<ChannelSelectionFields>,
    pub(crate) gray: Option<NodeId>,
    pub(crate) red: Option<NodeId>,
    pub(crate) green: Option<NodeId>,
    pub(crate) blue: Option<NodeId>,
}

impl ChannelSelectionNode {
    fn rgb_slots() -> [SlotFn<Self>; 3] {
        [
            |node| &mut node.red,
            |node| &mut node.green,
            |node| &mut node.blue,
        ]
    }
}

impl NodeData for ChannelSelectionNode {
    type Fields = ChannelSelectionFields;
    type Output = ChannelSelection;

    node_state!(ChannelSelectionFields);

    fn children(&self) -> Vec<NodeId> {
        [self.gray, self.red, self.green, self.blue]
            .into_iter()
            .flatten()
            .collect()
    }

    fn default_value(factory: &dyn StyleFactory) -> ChannelSelection {
        factory.default_channel_selection()
    }

    fn restore(arena: &mut Arena, id: NodeId, value: &ChannelSelection, status: Status) {
        arena.set_fields::<Self>(id, status, ChannelSelectionFields);
        let gray: SlotFn<Self> = |node| &mut node.gray;
        match value {
            ChannelSelection::Gray(channel) => {
                arena.restore_slot::<Self, SelectedChannelNode>(id, gray, Some(channel), status);
                for slot in Self::rgb_slots() {
                    arena.clear_slot::<Self>(id, slot);
                }
            }
            ChannelSelection::Rgb { .. } => {
                arena.clear_slot::<Self>(id, gray);
                for (slot, channel) in Self::rgb_slots().into_iter().zip(value.rgb()) {
                    arena.restore_slot::<Self, SelectedChannelNode>(id, slot, channel, status);
                }
            }
        }
    }

    fn assemble(&self, _fields: &ChannelSelectionFields, arena: &Arena) -> ChannelSelection {
        let factory = arena.factory();
        if let Some(gray) = arena.build_slot::<SelectedChannelNode>(self.gray) {
            return factory.channel_selection_gray(gray);
        }
        factory.channel_selection_rgb(
            arena.build_slot::<SelectedChannelNode>(self.red),
            arena.build_slot::<SelectedChannelNode>(self.green),
            arena.build_slot::<SelectedChannelNode>(self.blue),
        )
    }
}

builder_handle! {
    /// Builds a [`ChannelSelection`].
    ///
    /// A populated gray channel takes precedence: the selection is then built
    /// as [`ChannelSelection::Gray`] and the color channels are ignored.
    ChannelSelectionBuilder => ChannelSelectionNode, ChannelSelection
}

impl ChannelSelectionBuilder {
    pub fn gray(&self) -> SelectedChannelBuilder {
        SelectedChannelBuilder::from_cursor(
            self.cursor
                .slot::<ChannelSelectionNode, SelectedChannelNode>(|node| &mut node.gray),
        )
    }

    pub fn red(&self) -> SelectedChannelBuilder {
        SelectedChannelBuilder::from_cursor(
            self.cursor
                .slot::<ChannelSelectionNode, SelectedChannelNode>(|node| &mut node.red),
        )
    }

    pub fn green(&self) -> SelectedChannelBuilder {
        SelectedChannelBuilder::from_cursor(
            self.cursor
                .slot::<ChannelSelectionNode, SelectedChannelNode>(|node| &mut node.green),
        )
    }

    pub fn blue(&self) -> SelectedChannelBuilder {
        SelectedChannelBuilder::from_cursor(
            self.cursor
                .slot::<ChannelSelectionNode, SelectedChannelNode>(|node| &mut node.blue),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_shaded_relief_defaults() {
        let relief = ShadedReliefBuilder::new().build().unwrap();
        assert!(!relief.brightness_only());
        assert!(approx_eq!(
            f64,
            relief.relief_factor().unwrap().literal_f64().unwrap(),
            55.0
        ));
    }

    #[test]
    fn test_contrast_option_replaces_same_key() {
        let contrast = ContrastEnhancementBuilder::new()
            .option("minValue", 10)
            .option("maxValue", 200)
            .option("minValue", 20)
            .build()
            .unwrap();
        let keys: Vec<&str> = contrast.options().keys().map(String::as_str).collect();
        assert_eq!(keys, ["minValue", "maxValue"]);
        assert_eq!(contrast.options()["minValue"], Expression::from(20));
        assert_eq!(contrast.method(), ContrastMethod::None);
    }

    #[test]
    fn test_color_map_entries_keep_order() {
        let builder = ColorMapBuilder::new();
        builder.entry().label("low").quantity(0.0);
        builder.entry().label("high").quantity(1000.0);
        let map = builder.build().unwrap();

        let labels: Vec<_> = map.entries().iter().map(|entry| entry.label()).collect();
        assert_eq!(labels, [Some("low"), Some("high")]);
        assert_eq!(map.kind(), ColorMapKind::Ramp);
        assert!(builder.build().unwrap().entries().is_empty());
    }

    #[test]
    fn test_color_map_entry_default_opacity() {
        let entry = ColorMapEntryBuilder::new()
            .color_hex("#00FF00")
            .unwrap()
            .build()
            .unwrap();
        assert!(approx_eq!(f64, entry.opacity().unwrap().literal_f64().unwrap(), 1.0));
        assert!(entry.quantity().is_none());
    }

    #[test]
    fn test_unset_entry_is_skipped() {
        let builder = ColorMapBuilder::new();
        builder.entry().quantity(1.0);
        builder.entry().unset();
        assert_eq!(builder.build().unwrap().entries().len(), 1);
    }

    #[test]
    fn test_channel_selection_defaults_to_empty_rgb() {
        let selection = ChannelSelectionBuilder::new().build().unwrap();
        assert_eq!(selection.rgb(), [None, None, None]);
        assert!(selection.gray().is_none());
    }

    #[test]
    fn test_gray_channel_wins() {
        let builder = ChannelSelectionBuilder::new();
        builder.red().channel_name("1");
        builder.gray().channel_name("4");
        let selection = builder.build().unwrap();
        assert_eq!(
            selection.gray().and_then(|gray| gray.channel_name()),
            Some(&Expression::from("4"))
        );
    }

    #[test]
    fn test_rgb_channels_with_contrast() {
        let builder = ChannelSelectionBuilder::new();
        builder.red().channel_name("3");
        builder.green().channel_name("2");
        builder
            .blue()
            .channel_name("1")
            .contrast_enhancement()
            .gamma(1.5);
        let selection = builder.build().unwrap();

        let [red, green, blue] = selection.rgb();
        assert!(red.is_some() && green.is_some());
        let gamma = blue
            .and_then(|blue| blue.contrast_enhancement())
            .and_then(|contrast| contrast.gamma())
            .and_then(Expression::literal_f64);
        assert_eq!(gamma, Some(1.5));
    }

    #[test]
    fn test_restore_switches_variant() {
        let builder = ChannelSelectionBuilder::new();
        builder.gray().channel_name("1");
        let gray = builder.build().unwrap();

        let rgb = ChannelSelection::Rgb {
            red: Some(SelectedChannel::new(Some("1".into()), None)),
            green: None,
            blue: None,
        };
        builder.reset_from(Some(&rgb));
        assert_eq!(builder.build(), Some(rgb));

        builder.reset_from(Some(&gray));
        assert_eq!(builder.build(), Some(gray));
    }
}
