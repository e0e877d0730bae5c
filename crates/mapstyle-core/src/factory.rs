//! The descriptor factory.
//!
//! A [`StyleFactory`] turns already-resolved field values into immutable
//! value objects, one constructor per node type, and supplies the default
//! value each builder starts from. Builders receive the factory explicitly at
//! construction; there is no global instance.
//!
//! Every method has a default implementation, so a custom factory only needs
//! [`StyleFactory::defaults`] and overrides what it wants to change. The
//! `default_*` providers go through the constructors, so overriding a
//! constructor also affects the defaults built with it.
//!
//! # Examples
//!
//! ```
//! use mapstyle_core::factory::{DefaultStyleFactory, StyleDefaults, StyleFactory};
//!
//! let mut defaults = StyleDefaults::default();
//! defaults.stroke_width = 0.5;
//!
//! let factory = DefaultStyleFactory::new(defaults);
//! let stroke = factory.default_stroke();
//! assert_eq!(stroke.width().and_then(|w| w.literal_f64()), Some(0.5));
//! ```

use indexmap::IndexMap;

use crate::{
    color::Color,
    expr::{Expression, Filter},
    style::{
        AnchorPoint, ChannelSelection, ColorMap, ColorMapEntry, ColorMapKind, ColorReplacement,
        ContrastEnhancement, ContrastMethod, Description, Displacement, Extent, ExternalGraphic,
        ExternalMark, FeatureTypeConstraint, FeatureTypeStyle, Fill, Font, FontStyle, FontWeight,
        Graphic, GraphicalSymbol, Halo, LineCap, LineJoin, LinePlacement, LineSymbolizer, Mark,
        NamedLayer, OverlapBehavior, PointPlacement, PointSymbolizer, PolygonSymbolizer,
        RasterSymbolizer, Rule, SelectedChannel, SemanticType, ShadedRelief, Stroke, Style,
        StyledLayer, StyledLayerDescriptor, Symbolizer, SymbolizerInfo, TextSymbolizer,
        UserLayer, VendorOptions,
    },
};

/// Values the default providers are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub text_color: Color,
    pub halo_color: Color,
    pub halo_radius: f64,
    pub font_family: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    pub font_weight: FontWeight,
    pub mark_name: String,
    /// Anchor of a standalone anchor point, `(x, y)`.
    pub anchor: (f64, f64),
    /// Anchor of a label's point placement, `(x, y)`.
    pub label_anchor: (f64, f64),
    pub relief_factor: f64,
    pub raster_opacity: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            stroke_color: Color::default(),
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            fill_color: Color::from_hex("#808080").expect("#808080 is a valid hex color"),
            fill_opacity: 1.0,
            text_color: Color::default(),
            halo_color: Color::from_hex("#FFFFFF").expect("#FFFFFF is a valid hex color"),
            halo_radius: 1.0,
            font_family: "Serif".to_string(),
            font_size: 10.0,
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Normal,
            mark_name: "square".to_string(),
            anchor: (0.5, 0.5),
            label_anchor: (0.0, 0.5),
            relief_factor: 55.0,
            raster_opacity: 1.0,
        }
    }
}

/// Constructs style values and provides their defaults.
pub trait StyleFactory {
    /// Returns the values the `default_*` providers use.
    fn defaults(&self) -> &StyleDefaults;

    // ===== Leaf values =====

    fn anchor_point(&self, x: Expression, y: Expression) -> AnchorPoint {
        AnchorPoint::new(x, y)
    }

    fn displacement(&self, x: Expression, y: Expression) -> Displacement {
        Displacement::new(x, y)
    }

    fn description(&self, title: Option<String>, abstract_text: Option<String>) -> Description {
        Description::new(title, abstract_text)
    }

    fn extent(&self, name: String, value: String) -> Extent {
        Extent::new(name, value)
    }

    fn shaded_relief(&self, brightness_only: bool, relief_factor: Option<Expression>) -> ShadedRelief {
        ShadedRelief::new(brightness_only, relief_factor)
    }

    fn contrast_enhancement(
        &self,
        method: ContrastMethod,
        gamma: Option<Expression>,
        options: IndexMap<String, Expression>,
    ) -> ContrastEnhancement {
        ContrastEnhancement::new(method, gamma, options)
    }

    fn color_map_entry(
        &self,
        label: Option<String>,
        color: Option<Expression>,
        opacity: Option<Expression>,
        quantity: Option<Expression>,
    ) -> ColorMapEntry {
        ColorMapEntry::new(label, color, opacity, quantity)
    }

    fn color_replacement(
        &self,
        property: Option<Expression>,
        mapping: Vec<(Expression, Expression)>,
    ) -> ColorReplacement {
        ColorReplacement::new(property, mapping)
    }

    fn external_mark(
        &self,
        uri: Option<String>,
        inline_content: Option<Vec<u8>>,
        format: Option<String>,
        mark_index: i32,
    ) -> ExternalMark {
        ExternalMark::new(uri, inline_content, format, mark_index)
    }

    // ===== Composite values =====

    fn fill(
        &self,
        color: Option<Expression>,
        opacity: Option<Expression>,
        graphic_fill: Option<Graphic>,
    ) -> Fill {
        Fill::new(color, opacity, graphic_fill)
    }

    #[allow(clippy::too_many_arguments)]
    fn stroke(
        &self,
        color: Option<Expression>,
        width: Option<Expression>,
        opacity: Option<Expression>,
        line_join: Option<Expression>,
        line_cap: Option<Expression>,
        dash_array: Vec<Expression>,
        dash_offset: Option<Expression>,
        graphic_fill: Option<Graphic>,
        graphic_stroke: Option<Graphic>,
    ) -> Stroke {
        Stroke::new(
            color,
            width,
            opacity,
            line_join,
            line_cap,
            dash_array,
            dash_offset,
            graphic_fill,
            graphic_stroke,
        )
    }

    fn mark(
        &self,
        well_known_name: Option<Expression>,
        external_mark: Option<ExternalMark>,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    ) -> Mark {
        Mark::new(well_known_name, external_mark, fill, stroke)
    }

    fn external_graphic(
        &self,
        uri: Option<String>,
        inline_content: Option<Vec<u8>>,
        format: Option<String>,
        color_replacements: Vec<ColorReplacement>,
    ) -> ExternalGraphic {
        ExternalGraphic::new(uri, inline_content, format, color_replacements)
    }

    #[allow(clippy::too_many_arguments)]
    fn graphic(
        &self,
        symbols: Vec<GraphicalSymbol>,
        opacity: Option<Expression>,
        size: Option<Expression>,
        rotation: Option<Expression>,
        anchor_point: Option<AnchorPoint>,
        displacement: Option<Displacement>,
        gap: Option<Expression>,
        initial_gap: Option<Expression>,
    ) -> Graphic {
        Graphic::new(
            symbols,
            opacity,
            size,
            rotation,
            anchor_point,
            displacement,
            gap,
            initial_gap,
        )
    }

    fn halo(&self, fill: Option<Fill>, radius: Option<Expression>) -> Halo {
        Halo::new(fill, radius)
    }

    fn font(
        &self,
        family: Vec<Expression>,
        style: Option<Expression>,
        weight: Option<Expression>,
        size: Option<Expression>,
    ) -> Font {
        Font::new(family, style, weight, size)
    }

    fn point_placement(
        &self,
        anchor_point: Option<AnchorPoint>,
        displacement: Option<Displacement>,
        rotation: Option<Expression>,
    ) -> PointPlacement {
        PointPlacement::new(anchor_point, displacement, rotation)
    }

    fn line_placement(
        &self,
        perpendicular_offset: Option<Expression>,
        initial_gap: Option<Expression>,
        gap: Option<Expression>,
        repeated: bool,
        aligned: bool,
        generalize_line: bool,
    ) -> LinePlacement {
        LinePlacement::new(
            perpendicular_offset,
            initial_gap,
            gap,
            repeated,
            aligned,
            generalize_line,
        )
    }

    fn selected_channel(
        &self,
        channel_name: Option<Expression>,
        contrast_enhancement: Option<ContrastEnhancement>,
    ) -> SelectedChannel {
        SelectedChannel::new(channel_name, contrast_enhancement)
    }

    fn channel_selection_gray(&self, gray: SelectedChannel) -> ChannelSelection {
        ChannelSelection::Gray(gray)
    }

    fn channel_selection_rgb(
        &self,
        red: Option<SelectedChannel>,
        green: Option<SelectedChannel>,
        blue: Option<SelectedChannel>,
    ) -> ChannelSelection {
        ChannelSelection::Rgb { red, green, blue }
    }

    fn color_map(
        &self,
        kind: ColorMapKind,
        extended_colors: bool,
        entries: Vec<ColorMapEntry>,
    ) -> ColorMap {
        ColorMap::new(kind, extended_colors, entries)
    }

    fn feature_type_constraint(
        &self,
        feature_type_name: Option<String>,
        filter: Option<Filter>,
        extents: Vec<Extent>,
    ) -> FeatureTypeConstraint {
        FeatureTypeConstraint::new(feature_type_name, filter, extents)
    }

    // ===== Symbolizers =====

    fn symbolizer_info(
        &self,
        name: Option<String>,
        description: Option<Description>,
        geometry: Option<Expression>,
        unit_of_measure: Option<crate::style::UnitOfMeasure>,
        options: VendorOptions,
    ) -> SymbolizerInfo {
        SymbolizerInfo::new(name, description, geometry, unit_of_measure, options)
    }

    fn point_symbolizer(&self, info: SymbolizerInfo, graphic: Option<Graphic>) -> PointSymbolizer {
        PointSymbolizer::new(info, graphic)
    }

    fn line_symbolizer(
        &self,
        info: SymbolizerInfo,
        stroke: Option<Stroke>,
        perpendicular_offset: Option<Expression>,
    ) -> LineSymbolizer {
        LineSymbolizer::new(info, stroke, perpendicular_offset)
    }

    fn polygon_symbolizer(
        &self,
        info: SymbolizerInfo,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
        displacement: Option<Displacement>,
        perpendicular_offset: Option<Expression>,
    ) -> PolygonSymbolizer {
        PolygonSymbolizer::new(info, fill, stroke, displacement, perpendicular_offset)
    }

    #[allow(clippy::too_many_arguments)]
    fn text_symbolizer(
        &self,
        info: SymbolizerInfo,
        label: Option<Expression>,
        fonts: Vec<Font>,
        placement: Option<crate::style::LabelPlacement>,
        halo: Option<Halo>,
        fill: Option<Fill>,
        priority: Option<Expression>,
        shield: Option<Graphic>,
    ) -> TextSymbolizer {
        TextSymbolizer::new(info, label, fonts, placement, halo, fill, priority, shield)
    }

    #[allow(clippy::too_many_arguments)]
    fn raster_symbolizer(
        &self,
        info: SymbolizerInfo,
        opacity: Option<Expression>,
        channel_selection: Option<ChannelSelection>,
        overlap_behavior: Option<OverlapBehavior>,
        color_map: Option<ColorMap>,
        contrast_enhancement: Option<ContrastEnhancement>,
        shaded_relief: Option<ShadedRelief>,
    ) -> RasterSymbolizer {
        RasterSymbolizer::new(
            info,
            opacity,
            channel_selection,
            overlap_behavior,
            color_map,
            contrast_enhancement,
            shaded_relief,
        )
    }

    // ===== Structure =====

    #[allow(clippy::too_many_arguments)]
    fn rule(
        &self,
        name: Option<String>,
        description: Option<Description>,
        legend: Option<Graphic>,
        min_scale_denominator: f64,
        max_scale_denominator: f64,
        symbolizers: Vec<Symbolizer>,
        filter: Option<Filter>,
        else_filter: bool,
    ) -> Rule {
        Rule::new(
            name,
            description,
            legend,
            min_scale_denominator,
            max_scale_denominator,
            symbolizers,
            filter,
            else_filter,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn feature_type_style(
        &self,
        name: Option<String>,
        description: Option<Description>,
        feature_type_names: Vec<String>,
        semantic_types: Vec<SemanticType>,
        rules: Vec<Rule>,
        options: VendorOptions,
        transformation: Option<Expression>,
    ) -> FeatureTypeStyle {
        FeatureTypeStyle::new(
            name,
            description,
            feature_type_names,
            semantic_types,
            rules,
            options,
            transformation,
        )
    }

    fn style(
        &self,
        name: Option<String>,
        description: Option<Description>,
        is_default: bool,
        feature_type_styles: Vec<FeatureTypeStyle>,
    ) -> Style {
        Style::new(name, description, is_default, feature_type_styles)
    }

    fn named_layer(
        &self,
        name: Option<String>,
        styles: Vec<Style>,
        feature_constraints: Vec<FeatureTypeConstraint>,
    ) -> NamedLayer {
        NamedLayer::new(name, styles, feature_constraints)
    }

    fn user_layer(
        &self,
        name: Option<String>,
        styles: Vec<Style>,
        feature_constraints: Vec<FeatureTypeConstraint>,
    ) -> UserLayer {
        UserLayer::new(name, styles, feature_constraints)
    }

    fn styled_layer_descriptor(
        &self,
        name: Option<String>,
        title: Option<String>,
        abstract_text: Option<String>,
        layers: Vec<StyledLayer>,
    ) -> StyledLayerDescriptor {
        StyledLayerDescriptor::new(name, title, abstract_text, layers)
    }

    // ===== Defaults =====

    fn default_anchor_point(&self) -> AnchorPoint {
        let (x, y) = self.defaults().anchor;
        self.anchor_point(x.into(), y.into())
    }

    fn default_displacement(&self) -> Displacement {
        self.displacement(0.0.into(), 0.0.into())
    }

    fn default_description(&self) -> Description {
        self.description(None, None)
    }

    fn default_extent(&self) -> Extent {
        self.extent(String::new(), String::new())
    }

    fn default_shaded_relief(&self) -> ShadedRelief {
        self.shaded_relief(false, Some(self.defaults().relief_factor.into()))
    }

    fn default_contrast_enhancement(&self) -> ContrastEnhancement {
        self.contrast_enhancement(ContrastMethod::None, None, IndexMap::new())
    }

    fn default_color_map_entry(&self) -> ColorMapEntry {
        self.color_map_entry(None, None, Some(1.0.into()), None)
    }

    fn default_color_replacement(&self) -> ColorReplacement {
        self.color_replacement(None, Vec::new())
    }

    fn default_external_mark(&self) -> ExternalMark {
        self.external_mark(None, None, None, 0)
    }

    fn default_fill(&self) -> Fill {
        let defaults = self.defaults();
        self.fill(
            Some(defaults.fill_color.into()),
            Some(defaults.fill_opacity.into()),
            None,
        )
    }

    fn default_stroke(&self) -> Stroke {
        let defaults = self.defaults();
        self.stroke(
            Some(defaults.stroke_color.into()),
            Some(defaults.stroke_width.into()),
            Some(defaults.stroke_opacity.into()),
            Some(defaults.line_join.into()),
            Some(defaults.line_cap.into()),
            Vec::new(),
            Some(0.0.into()),
            None,
            None,
        )
    }

    fn default_mark(&self) -> Mark {
        self.mark(
            Some(self.defaults().mark_name.as_str().into()),
            None,
            Some(self.default_fill()),
            Some(self.default_stroke()),
        )
    }

    fn default_external_graphic(&self) -> ExternalGraphic {
        self.external_graphic(None, None, None, Vec::new())
    }

    /// A graphic with no symbols; renderers draw their default square.
    fn default_graphic(&self) -> Graphic {
        self.graphic(
            Vec::new(),
            Some(1.0.into()),
            None,
            Some(0.0.into()),
            None,
            None,
            None,
            None,
        )
    }

    fn default_halo(&self) -> Halo {
        let defaults = self.defaults();
        self.halo(
            Some(self.fill(Some(defaults.halo_color.into()), Some(1.0.into()), None)),
            Some(defaults.halo_radius.into()),
        )
    }

    fn default_font(&self) -> Font {
        let defaults = self.defaults();
        self.font(
            vec![defaults.font_family.as_str().into()],
            Some(defaults.font_style.into()),
            Some(defaults.font_weight.into()),
            Some(defaults.font_size.into()),
        )
    }

    fn default_point_placement(&self) -> PointPlacement {
        let (x, y) = self.defaults().label_anchor;
        self.point_placement(
            Some(self.anchor_point(x.into(), y.into())),
            Some(self.default_displacement()),
            Some(0.0.into()),
        )
    }

    fn default_line_placement(&self) -> LinePlacement {
        self.line_placement(Some(0.0.into()), None, None, false, true, false)
    }

    fn default_selected_channel(&self) -> SelectedChannel {
        self.selected_channel(None, None)
    }

    fn default_channel_selection(&self) -> ChannelSelection {
        self.channel_selection_rgb(None, None, None)
    }

    fn default_color_map(&self) -> ColorMap {
        self.color_map(ColorMapKind::Ramp, false, Vec::new())
    }

    fn default_feature_type_constraint(&self) -> FeatureTypeConstraint {
        self.feature_type_constraint(None, None, Vec::new())
    }

    fn default_symbolizer_info(&self) -> SymbolizerInfo {
        self.symbolizer_info(None, None, None, None, VendorOptions::new())
    }

    fn default_point_symbolizer(&self) -> PointSymbolizer {
        self.point_symbolizer(self.default_symbolizer_info(), Some(self.default_graphic()))
    }

    fn default_line_symbolizer(&self) -> LineSymbolizer {
        self.line_symbolizer(
            self.default_symbolizer_info(),
            Some(self.default_stroke()),
            None,
        )
    }

    /// A polygon with the default fill and no outline.
    fn default_polygon_symbolizer(&self) -> PolygonSymbolizer {
        self.polygon_symbolizer(
            self.default_symbolizer_info(),
            Some(self.default_fill()),
            None,
            None,
            None,
        )
    }

    fn default_text_symbolizer(&self) -> TextSymbolizer {
        let text_fill = self.fill(Some(self.defaults().text_color.into()), Some(1.0.into()), None);
        self.text_symbolizer(
            self.default_symbolizer_info(),
            None,
            vec![self.default_font()],
            None,
            None,
            Some(text_fill),
            None,
            None,
        )
    }

    fn default_raster_symbolizer(&self) -> RasterSymbolizer {
        self.raster_symbolizer(
            self.default_symbolizer_info(),
            Some(self.defaults().raster_opacity.into()),
            None,
            None,
            None,
            None,
            None,
        )
    }

    fn default_rule(&self) -> Rule {
        self.rule(None, None, None, 0.0, f64::INFINITY, Vec::new(), None, false)
    }

    fn default_feature_type_style(&self) -> FeatureTypeStyle {
        self.feature_type_style(
            None,
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            VendorOptions::new(),
            None,
        )
    }

    fn default_style(&self) -> Style {
        self.style(None, None, false, Vec::new())
    }

    fn default_named_layer(&self) -> NamedLayer {
        self.named_layer(None, Vec::new(), Vec::new())
    }

    fn default_user_layer(&self) -> UserLayer {
        self.user_layer(None, Vec::new(), Vec::new())
    }

    fn default_styled_layer_descriptor(&self) -> StyledLayerDescriptor {
        self.styled_layer_descriptor(None, None, None, Vec::new())
    }
}

/// The stock factory: plain constructors and configurable defaults.
#[derive(Debug, Clone, Default)]
pub struct DefaultStyleFactory {
    defaults: StyleDefaults,
}

impl DefaultStyleFactory {
    /// Creates a factory with the given defaults.
    pub fn new(defaults: StyleDefaults) -> Self {
        Self { defaults }
    }
}

impl StyleFactory for DefaultStyleFactory {
    fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::expr::{EvaluationContext, Value};

    fn literal(expr: Option<&Expression>) -> Value {
        expr.map(|e| e.evaluate(&EvaluationContext::new()))
            .unwrap_or_default()
    }

    #[test]
    fn test_default_stroke() {
        let factory = DefaultStyleFactory::default();
        let stroke = factory.default_stroke();

        assert_eq!(literal(stroke.color()).to_color(), Some(Color::default()));
        assert_eq!(literal(stroke.width()), Value::Float(1.0));
        assert_eq!(literal(stroke.opacity()), Value::Float(1.0));
        assert_eq!(literal(stroke.line_cap()), Value::from("butt"));
        assert_eq!(literal(stroke.line_join()), Value::from("mitre"));
        assert!(stroke.dash_array().is_empty());
        assert!(stroke.graphic_fill().is_none());
    }

    #[test]
    fn test_default_fill_is_gray() {
        let factory = DefaultStyleFactory::default();
        let fill = factory.default_fill();
        let color = literal(fill.color()).to_color().unwrap();
        assert_eq!(color.to_rgb8(), [128, 128, 128]);
    }

    #[test]
    fn test_default_mark_is_square_with_fill_and_stroke() {
        let factory = DefaultStyleFactory::default();
        let mark = factory.default_mark();
        assert_eq!(literal(mark.well_known_name()), Value::from("square"));
        assert!(mark.fill().is_some());
        assert!(mark.stroke().is_some());
    }

    #[test]
    fn test_default_text_symbolizer() {
        let factory = DefaultStyleFactory::default();
        let text = factory.default_text_symbolizer();
        assert_eq!(text.fonts().len(), 1);
        assert!(text.label().is_none());
        assert!(text.halo().is_none());
        assert!(text.placement().is_none());

        let font = &text.fonts()[0];
        assert_eq!(literal(font.family().first()), Value::from("Serif"));
        assert!(approx_eq!(f64, literal(font.size()).as_f64().unwrap(), 10.0));
    }

    #[test]
    fn test_custom_defaults_flow_into_providers() {
        let defaults = StyleDefaults {
            font_family: "Noto Sans".to_string(),
            mark_name: "circle".to_string(),
            ..StyleDefaults::default()
        };
        let factory = DefaultStyleFactory::new(defaults);

        assert_eq!(
            literal(factory.default_font().family().first()),
            Value::from("Noto Sans")
        );
        assert_eq!(literal(factory.default_mark().well_known_name()), Value::from("circle"));
    }

    #[test]
    fn test_default_rule_is_unbounded() {
        let factory = DefaultStyleFactory::default();
        let rule = factory.default_rule();
        assert!(approx_eq!(f64, rule.min_scale_denominator(), 0.0));
        assert!(rule.max_scale_denominator().is_infinite());
        assert!(!rule.is_else_filter());
    }

    struct ThinStrokes(StyleDefaults);

    impl StyleFactory for ThinStrokes {
        fn defaults(&self) -> &StyleDefaults {
            &self.0
        }

        #[allow(clippy::too_many_arguments)]
        fn stroke(
            &self,
            color: Option<Expression>,
            _width: Option<Expression>,
            opacity: Option<Expression>,
            line_join: Option<Expression>,
            line_cap: Option<Expression>,
            dash_array: Vec<Expression>,
            dash_offset: Option<Expression>,
            graphic_fill: Option<Graphic>,
            graphic_stroke: Option<Graphic>,
        ) -> Stroke {
            Stroke::new(
                color,
                Some(0.25.into()),
                opacity,
                line_join,
                line_cap,
                dash_array,
                dash_offset,
                graphic_fill,
                graphic_stroke,
            )
        }
    }

    #[test]
    fn test_overridden_constructor_affects_defaults() {
        let factory = ThinStrokes(StyleDefaults::default());
        assert_eq!(literal(factory.default_stroke().width()), Value::Float(0.25));
        let mark_stroke = factory.default_mark().stroke().cloned().unwrap();
        assert_eq!(literal(mark_stroke.width()), Value::Float(0.25));
    }
}
