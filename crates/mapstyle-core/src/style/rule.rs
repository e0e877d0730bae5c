//! Rules and feature type styles.
//!
//! # Overview
//!
//! - [`Rule`]: symbolizers applied to the features that pass a filter,
//!   within a scale range
//! - [`FeatureTypeStyle`]: an ordered list of rules for one or more feature
//!   types, with an optional rendering transformation
//! - [`SemanticType`]: the `generic:*` geometry classes a feature type style
//!   declares it is meant for
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::expr::{ComparisonOp, EvaluationContext, Expression, Filter};
//! use mapstyle_core::style::Rule;
//!
//! let filter = Filter::compare(ComparisonOp::Greater, Expression::property("pop"), 100_000i64);
//! let rule = Rule::new(
//!     Some("cities".to_string()),
//!     None,
//!     None,
//!     0.0,
//!     1_000_000.0,
//!     vec![],
//!     Some(filter),
//!     false,
//! );
//!
//! assert!(rule.applies_at_scale(250_000.0));
//! assert!(!rule.applies_at_scale(5_000_000.0));
//! let big = EvaluationContext::new().with("pop", 2_000_000);
//! assert!(rule.filter().is_some_and(|f| f.evaluate(&big)));
//! ```

use std::{fmt, str::FromStr};

use crate::{
    expr::{Expression, Filter},
    style::{Description, Graphic, Symbolizer, VendorOptions},
};

/// A set of symbolizers applied to features that pass a filter within a
/// scale range.
///
/// The scale range is half open: a rule is active from
/// `min_scale_denominator` (inclusive) up to `max_scale_denominator`
/// (exclusive). A rule without a filter applies to every feature; an else
/// rule applies only to features no sibling rule matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    name: Option<String>,
    description: Option<Description>,
    legend: Option<Graphic>,
    min_scale_denominator: f64,
    max_scale_denominator: f64,
    symbolizers: Vec<Symbolizer>,
    filter: Option<Filter>,
    else_filter: bool,
}

impl Rule {
    /// Creates a rule.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Option<String>,
        description: Option<Description>,
        legend: Option<Graphic>,
        min_scale_denominator: f64,
        max_scale_denominator: f64,
        symbolizers: Vec<Symbolizer>,
        filter: Option<Filter>,
        else_filter: bool,
    ) -> Self {
        Self {
            name,
            description,
            legend,
            min_scale_denominator,
            max_scale_denominator,
            symbolizers,
            filter,
            else_filter,
        }
    }

    /// Returns the rule name, shown in legends.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Returns the graphic drawn for this rule in a legend.
    pub fn legend(&self) -> Option<&Graphic> {
        self.legend.as_ref()
    }

    /// Returns the lower scale bound; `0.0` when unbounded.
    pub fn min_scale_denominator(&self) -> f64 {
        self.min_scale_denominator
    }

    /// Returns the upper scale bound; `f64::INFINITY` when unbounded.
    pub fn max_scale_denominator(&self) -> f64 {
        self.max_scale_denominator
    }

    /// Returns the symbolizers in drawing order.
    pub fn symbolizers(&self) -> &[Symbolizer] {
        &self.symbolizers
    }

    /// Returns the filter features must pass; `None` accepts every feature.
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Returns `true` if the rule applies only to features no other rule matched.
    pub fn is_else_filter(&self) -> bool {
        self.else_filter
    }

    /// Returns `true` if the rule is active at the given scale denominator.
    pub fn applies_at_scale(&self, scale_denominator: f64) -> bool {
        scale_denominator >= self.min_scale_denominator
            && scale_denominator < self.max_scale_denominator
    }
}

/// Geometry class a feature type style is intended for.
///
/// Parsed with or without the `generic:` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Any geometry
    Any,
    /// Points and multi-points
    Point,
    /// Lines and multi-lines
    Line,
    /// Polygons and multi-polygons
    Polygon,
    /// Text annotations
    Text,
    /// Raster coverages
    Raster,
}

impl SemanticType {
    /// Returns the SLD identifier, e.g. `generic:point`.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Any => "generic:any",
            Self::Point => "generic:point",
            Self::Line => "generic:line",
            Self::Polygon => "generic:polygon",
            Self::Text => "generic:text",
            Self::Raster => "generic:raster",
        }
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("generic:").unwrap_or(s) {
            "any" => Ok(Self::Any),
            "point" => Ok(Self::Point),
            "line" => Ok(Self::Line),
            "polygon" => Ok(Self::Polygon),
            "text" => Ok(Self::Text),
            "raster" => Ok(Self::Raster),
            _ => Err(format!(
                "invalid semantic type `{s}`, valid values: any, point, line, polygon, text, raster"
            )),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Rules applied together to one or more feature types.
///
/// Every rule whose filter and scale range match a feature draws it, in rule
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTypeStyle {
    name: Option<String>,
    description: Option<Description>,
    feature_type_names: Vec<String>,
    semantic_types: Vec<SemanticType>,
    rules: Vec<Rule>,
    options: VendorOptions,
    transformation: Option<Expression>,
}

impl FeatureTypeStyle {
    /// Creates a feature type style.
    pub fn new(
        name: Option<String>,
        description: Option<Description>,
        feature_type_names: Vec<String>,
        semantic_types: Vec<SemanticType>,
        rules: Vec<Rule>,
        options: VendorOptions,
        transformation: Option<Expression>,
    ) -> Self {
        Self {
            name,
            description,
            feature_type_names,
            semantic_types,
            rules,
            options,
            transformation,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Returns the feature types this style targets; empty means any.
    pub fn feature_type_names(&self) -> &[String] {
        &self.feature_type_names
    }

    /// Returns the geometry classes this style declares it handles.
    pub fn semantic_types(&self) -> &[SemanticType] {
        &self.semantic_types
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns renderer-specific options, such as `composite`, in insertion order.
    pub fn options(&self) -> &VendorOptions {
        &self.options
    }

    /// Returns the rendering transformation applied before the rules.
    pub fn transformation(&self) -> Option<&Expression> {
        self.transformation.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_applies_at_scale() {
        let rule = Rule::new(None, None, None, 1000.0, 50_000.0, vec![], None, false);
        assert!(rule.applies_at_scale(1000.0));
        assert!(rule.applies_at_scale(20_000.0));
        assert!(!rule.applies_at_scale(50_000.0));
        assert!(!rule.applies_at_scale(999.0));
    }

    #[test]
    fn test_semantic_type_from_str() {
        assert_eq!("generic:line".parse::<SemanticType>().unwrap(), SemanticType::Line);
        assert_eq!("raster".parse::<SemanticType>().unwrap(), SemanticType::Raster);
        assert!("generic:blob".parse::<SemanticType>().is_err());
        assert_eq!(SemanticType::Polygon.to_string(), "generic:polygon");
    }
}
