//! Styles, layers and the styled layer descriptor root.
//!
//! # Overview
//!
//! Exported types:
//! - [`Style`]: an ordered stack of [`FeatureTypeStyle`]s, painted in order
//! - [`FeatureTypeConstraint`]: narrows a layer to one feature type
//! - [`NamedLayer`]: a layer the server already knows, styled by name
//! - [`UserLayer`]: a layer whose definition travels with the request
//! - [`StyledLayer`]: the closed enum over both layer kinds
//! - [`StyledLayerDescriptor`]: the root of the tree
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::style::{NamedLayer, Style, StyledLayer, StyledLayerDescriptor};
//!
//! let style = Style::new(Some("roads".to_string()), None, true, vec![]);
//! let layer = NamedLayer::new(Some("roads".to_string()), vec![style], vec![]);
//! let sld = StyledLayerDescriptor::new(
//!     Some("basemap".to_string()),
//!     None,
//!     None,
//!     vec![StyledLayer::Named(layer)],
//! );
//!
//! assert_eq!(sld.layers()[0].as_named().and_then(|l| l.name()), Some("roads"));
//! assert!(sld.styles().all(|style| style.is_default()));
//! ```

use crate::{
    expr::Filter,
    style::{Description, Extent, FeatureTypeStyle},
};

/// A complete style: an ordered stack of feature type styles.
///
/// Feature type styles are painted in order, so later ones draw on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    name: Option<String>,
    description: Option<Description>,
    is_default: bool,
    feature_type_styles: Vec<FeatureTypeStyle>,
}

impl Style {
    /// Creates a style.
    pub fn new(
        name: Option<String>,
        description: Option<Description>,
        is_default: bool,
        feature_type_styles: Vec<FeatureTypeStyle>,
    ) -> Self {
        Self {
            name,
            description,
            is_default,
            feature_type_styles,
        }
    }

    /// Returns the style name, used to select it from a layer.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Returns `true` if this is the style used when a request names none.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns the feature type styles in painting order.
    pub fn feature_type_styles(&self) -> &[FeatureTypeStyle] {
        &self.feature_type_styles
    }
}

/// Restricts a layer to features of one type, optionally filtered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTypeConstraint {
    feature_type_name: Option<String>,
    filter: Option<Filter>,
    extents: Vec<Extent>,
}

impl FeatureTypeConstraint {
    /// Creates a constraint.
    pub fn new(
        feature_type_name: Option<String>,
        filter: Option<Filter>,
        extents: Vec<Extent>,
    ) -> Self {
        Self {
            feature_type_name,
            filter,
            extents,
        }
    }

    /// Returns the feature type the layer is restricted to.
    pub fn feature_type_name(&self) -> Option<&str> {
        self.feature_type_name.as_deref()
    }

    /// Returns the filter features of that type must pass.
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Returns named dimension ranges, such as a time interval.
    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }
}

/// A layer published by the server, referenced by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedLayer {
    name: Option<String>,
    styles: Vec<Style>,
    feature_constraints: Vec<FeatureTypeConstraint>,
}

impl NamedLayer {
    /// Creates a named layer.
    pub fn new(
        name: Option<String>,
        styles: Vec<Style>,
        feature_constraints: Vec<FeatureTypeConstraint>,
    ) -> Self {
        Self {
            name,
            styles,
            feature_constraints,
        }
    }

    /// Returns the name of the published layer.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the styles offered for the layer.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Returns the constraints selecting which features are drawn.
    pub fn feature_constraints(&self) -> &[FeatureTypeConstraint] {
        &self.feature_constraints
    }
}

/// A layer defined by the request itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserLayer {
    name: Option<String>,
    styles: Vec<Style>,
    feature_constraints: Vec<FeatureTypeConstraint>,
}

impl UserLayer {
    /// Creates a user layer.
    pub fn new(
        name: Option<String>,
        styles: Vec<Style>,
        feature_constraints: Vec<FeatureTypeConstraint>,
    ) -> Self {
        Self {
            name,
            styles,
            feature_constraints,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn feature_constraints(&self) -> &[FeatureTypeConstraint] {
        &self.feature_constraints
    }
}

/// Either kind of layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StyledLayer {
    /// Layer known to the server
    Named(NamedLayer),
    /// Layer defined inline
    User(UserLayer),
}

impl StyledLayer {
    /// Returns the layer name, whichever kind it is.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(layer) => layer.name(),
            Self::User(layer) => layer.name(),
        }
    }

    /// Returns the layer styles, whichever kind it is.
    pub fn styles(&self) -> &[Style] {
        match self {
            Self::Named(layer) => layer.styles(),
            Self::User(layer) => layer.styles(),
        }
    }

    pub fn as_named(&self) -> Option<&NamedLayer> {
        match self {
            Self::Named(layer) => Some(layer),
            Self::User(_) => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserLayer> {
        match self {
            Self::User(layer) => Some(layer),
            Self::Named(_) => None,
        }
    }
}

/// The root of the tree.
///
/// A descriptor names itself, carries a title and abstract for catalogs, and
/// lists the layers it styles in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledLayerDescriptor {
    name: Option<String>,
    title: Option<String>,
    abstract_text: Option<String>,
    layers: Vec<StyledLayer>,
}

impl StyledLayerDescriptor {
    /// Creates a descriptor.
    pub fn new(
        name: Option<String>,
        title: Option<String>,
        abstract_text: Option<String>,
        layers: Vec<StyledLayer>,
    ) -> Self {
        Self {
            name,
            title,
            abstract_text,
            layers,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the short human-readable title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the longer free-text description.
    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    /// Returns the layers in drawing order.
    pub fn layers(&self) -> &[StyledLayer] {
        &self.layers
    }

    /// Returns every style of every layer, in document order.
    pub fn styles(&self) -> impl Iterator<Item = &Style> {
        self.layers.iter().flat_map(StyledLayer::styles)
    }
}
