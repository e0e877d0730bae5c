//! Mapstyle - fluent builders for immutable styled layer descriptor trees.
//!
//! Every element of a styled layer descriptor (SLD) has a builder: a cheap,
//! clonable handle onto one node of a shared tree. Setters chain, accessors
//! hand out child builders, and any builder can materialize the whole
//! enclosing style with [`Builder::build_style`] or [`Builder::build_sld`].
//! Expressions and filters can be given as CQL text and are compiled by
//! [`mapstyle_cql`].
//!
//! # Examples
//!
//! ```
//! use mapstyle::{Builder, StyleKit};
//!
//! let kit = StyleKit::default();
//! let style = kit.style();
//! style.name("roads");
//!
//! let rule = style.feature_type_style().rule();
//! rule.cql_filter("type = 'highway'").unwrap();
//! rule.line().stroke().color_hex("#FF8800").unwrap().width(3.0);
//!
//! let built = style.build().unwrap();
//! assert_eq!(built.name(), Some("roads"));
//! assert_eq!(built.feature_type_styles()[0].rules().len(), 1);
//! ```

pub mod config;

mod arena;
mod builder;
mod cursor;
mod error;
mod materialize;
mod node;

pub use mapstyle_core::{color, expr, factory, style};
pub use mapstyle_cql::{CqlError, ExpressionResolver};

pub use builder::*;
pub use error::{BuildError, MapStyleError};
pub use node::Status;

use std::rc::Rc;

use log::{debug, info, trace};

use mapstyle_core::{
    expr::{Expression, Filter},
    factory::{DefaultStyleFactory, StyleFactory},
};

use config::AppConfig;

/// Entry point tying a configuration, a factory and the CQL resolver
/// together.
///
/// Builders created through a kit share its factory, so configured
/// defaults flow into every tree they produce.
///
/// # Examples
///
/// ```
/// use mapstyle::{Builder, StyleKit, config::AppConfig};
///
/// let config = AppConfig::from_toml_str("[defaults]\nstroke_width = 4.0").unwrap();
/// let kit = StyleKit::new(config).unwrap();
///
/// let stroke = kit.stroke().build().unwrap();
/// assert_eq!(stroke.width().and_then(|w| w.literal_f64()), Some(4.0));
/// ```
pub struct StyleKit {
    factory: Rc<dyn StyleFactory>,
    resolver: ExpressionResolver,
}

impl StyleKit {
    /// Creates a kit whose factory uses the defaults from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MapStyleError::Config`] when a configured value is invalid.
    pub fn new(config: AppConfig) -> Result<Self, MapStyleError> {
        let defaults = config.style_defaults()?;
        debug!(defaults:?; "Style defaults resolved");
        Ok(Self::with_factory(Rc::new(DefaultStyleFactory::new(defaults))))
    }

    /// Creates a kit around a custom factory.
    pub fn with_factory(factory: Rc<dyn StyleFactory>) -> Self {
        Self {
            factory,
            resolver: ExpressionResolver::new(),
        }
    }

    /// Returns the factory shared by every builder of this kit.
    pub fn factory(&self) -> Rc<dyn StyleFactory> {
        Rc::clone(&self.factory)
    }

    /// Compiles CQL text into an expression.
    ///
    /// # Errors
    ///
    /// Returns [`MapStyleError::Cql`] when the text fails both grammars.
    pub fn expression(&self, text: &str) -> Result<Expression, MapStyleError> {
        info!(text; "Compiling expression");
        let expression = self.resolver.resolve_expression(text)?;
        trace!(expression:?; "Compiled expression");
        Ok(expression)
    }

    /// Compiles CQL text into a filter.
    ///
    /// # Errors
    ///
    /// Returns [`MapStyleError::Cql`] when the text fails both grammars.
    pub fn filter(&self, text: &str) -> Result<Filter, MapStyleError> {
        info!(text; "Compiling filter");
        let filter = self.resolver.resolve_filter(text)?;
        trace!(filter:?; "Compiled filter");
        Ok(filter)
    }

    pub fn sld(&self) -> StyledLayerDescriptorBuilder {
        StyledLayerDescriptorBuilder::with_factory(self.factory())
    }

    pub fn named_layer(&self) -> NamedLayerBuilder {
        NamedLayerBuilder::with_factory(self.factory())
    }

    pub fn user_layer(&self) -> UserLayerBuilder {
        UserLayerBuilder::with_factory(self.factory())
    }

    pub fn style(&self) -> StyleBuilder {
        StyleBuilder::with_factory(self.factory())
    }

    pub fn feature_type_style(&self) -> FeatureTypeStyleBuilder {
        FeatureTypeStyleBuilder::with_factory(self.factory())
    }

    pub fn rule(&self) -> RuleBuilder {
        RuleBuilder::with_factory(self.factory())
    }

    pub fn point(&self) -> PointSymbolizerBuilder {
        PointSymbolizerBuilder::with_factory(self.factory())
    }

    pub fn line(&self) -> LineSymbolizerBuilder {
        LineSymbolizerBuilder::with_factory(self.factory())
    }

    pub fn polygon(&self) -> PolygonSymbolizerBuilder {
        PolygonSymbolizerBuilder::with_factory(self.factory())
    }

    pub fn text(&self) -> TextSymbolizerBuilder {
        TextSymbolizerBuilder::with_factory(self.factory())
    }

    pub fn raster(&self) -> RasterSymbolizerBuilder {
        RasterSymbolizerBuilder::with_factory(self.factory())
    }

    pub fn stroke(&self) -> StrokeBuilder {
        StrokeBuilder::with_factory(self.factory())
    }

    pub fn fill(&self) -> FillBuilder {
        FillBuilder::with_factory(self.factory())
    }

    pub fn graphic(&self) -> GraphicBuilder {
        GraphicBuilder::with_factory(self.factory())
    }

    pub fn mark(&self) -> MarkBuilder {
        MarkBuilder::with_factory(self.factory())
    }

    pub fn font(&self) -> FontBuilder {
        FontBuilder::with_factory(self.factory())
    }
}

impl Default for StyleKit {
    fn default() -> Self {
        Self::with_factory(Rc::new(DefaultStyleFactory::default()))
    }
}

#[cfg(test)]
mod tests {
    use mapstyle_core::expr::{EvaluationContext, Value};

    use super::*;

    #[test]
    fn test_kit_builders_share_configured_factory() {
        let config = AppConfig::from_toml_str(
            r##"
            [defaults]
            fill_color = "#00FF00"
            font_size = 14.0
            "##,
        )
        .unwrap();
        let kit = StyleKit::new(config).unwrap();

        let polygon = kit.polygon().build().unwrap();
        let color = polygon
            .fill()
            .and_then(|fill| fill.color())
            .map(|c| c.evaluate(&EvaluationContext::new()))
            .and_then(|v| v.to_color())
            .unwrap();
        assert_eq!(color.to_rgb8(), [0, 255, 0]);

        let font = kit.font().build().unwrap();
        assert_eq!(font.size().and_then(|s| s.literal_f64()), Some(14.0));
    }

    #[test]
    fn test_kit_rejects_invalid_config() {
        let config = AppConfig::from_toml_str("[defaults]\nstroke_color = \"nope\"").unwrap();
        let err = StyleKit::new(config).err().unwrap();
        assert!(matches!(err, MapStyleError::Config(_)));
    }

    #[test]
    fn test_kit_compiles_cql() {
        let kit = StyleKit::default();

        let expr = kit.expression("width * 2").unwrap();
        let ctx = EvaluationContext::new().with("width", 3);
        assert_eq!(expr.evaluate(&ctx), Value::Integer(6));

        let filter = kit.filter("width BETWEEN 1 AND 5").unwrap();
        assert!(filter.evaluate(&ctx));

        assert!(matches!(
            kit.filter("width >"),
            Err(MapStyleError::Cql(_))
        ));
    }
}
