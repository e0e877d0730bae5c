//! The builder protocol and every concrete builder.
//!
//! A builder is a cheap handle onto one node of a shared tree. Setters take
//! `&self` and return `&Self`, so calls chain; accessors such as
//! [`MarkBuilder::fill`] hand out the builder of a child node.
//!
//! # Status
//!
//! Each builder is in one of three [`Status`] values:
//!
//! - `Unset`: [`Builder::build`] yields `None`.
//! - `Default`: fields hold the factory defaults.
//! - `Explicit`: at least one field was set by the caller.
//!
//! Root builders start `Default`; optional children (a stroke's graphic fill,
//! a text symbolizer's halo, ...) start `Unset`. Any setter, and any accessor
//! that exposes a child, moves the builder to `Explicit`, populating it from
//! the factory defaults first when it was unset.
//!
//! # Root reset
//!
//! A builder without a parent resets itself after a successful
//! [`Builder::build`], so one root can produce a sequence of independent
//! trees. Handles to children released by the reset become detached: their
//! changes are ignored and they build nothing.
//!
//! ```
//! use mapstyle::{Builder, StyleBuilder};
//!
//! let builder = StyleBuilder::new();
//! builder
//!     .feature_type_style()
//!     .rule()
//!     .polygon()
//!     .fill()
//!     .color("#112233");
//!
//! let first = builder.build().unwrap();
//! let second = builder.build().unwrap();
//! assert_eq!(first.feature_type_styles().len(), 1);
//! assert!(second.feature_type_styles().is_empty());
//! ```
//!
//! # Threads
//!
//! Builders of one tree share their state through `Rc<RefCell<_>>`, so they
//! are neither `Send` nor `Sync` and cannot be handed to another thread. A
//! caller that needs a tree on several threads builds it on one and shares
//! the built value, which owns all of its data. Coordinating access to a
//! builder wrapped in some other shared container is the caller's
//! responsibility.
//!
//! ```compile_fail
//! use mapstyle::{Builder, StrokeBuilder};
//!
//! let stroke = StrokeBuilder::new();
//! std::thread::spawn(move || stroke.build());
//! ```
//!
//! ```
//! use mapstyle::{Builder, StrokeBuilder};
//!
//! let stroke = StrokeBuilder::new().width(2.0).build().unwrap();
//! let width = std::thread::spawn(move || stroke.width().and_then(|w| w.literal_f64()))
//!     .join()
//!     .unwrap();
//! assert_eq!(width, Some(2.0));
//! ```

pub(crate) mod basic;
pub(crate) mod fill;
pub(crate) mod graphic;
pub(crate) mod layer;
pub(crate) mod raster;
pub(crate) mod rule;
pub(crate) mod stroke;
pub(crate) mod symbolizer;
pub(crate) mod text;

pub use basic::{AnchorPointBuilder, DescriptionBuilder, DisplacementBuilder, ExtentBuilder};
pub use fill::FillBuilder;
pub use graphic::{
    ColorReplacementBuilder, ExternalGraphicBuilder, ExternalMarkBuilder, GraphicBuilder,
    MarkBuilder,
};
pub use layer::{
    FeatureTypeConstraintBuilder, NamedLayerBuilder, StyleBuilder, StyledLayerDescriptorBuilder,
    UserLayerBuilder,
};
pub use raster::{
    ChannelSelectionBuilder, ColorMapBuilder, ColorMapEntryBuilder, ContrastEnhancementBuilder,
    SelectedChannelBuilder, ShadedReliefBuilder,
};
pub use rule::{FeatureTypeStyleBuilder, RuleBuilder};
pub use stroke::StrokeBuilder;
pub use symbolizer::{
    LineSymbolizerBuilder, PointSymbolizerBuilder, PolygonSymbolizerBuilder,
    RasterSymbolizerBuilder, TextSymbolizerBuilder,
};
pub use text::{FontBuilder, HaloBuilder, LinePlacementBuilder, PointPlacementBuilder};

use mapstyle_core::{
    color::Color,
    style::{Style, StyledLayerDescriptor},
};

use crate::{error::BuildError, node::Status};

/// Operations shared by every builder.
pub trait Builder {
    /// The value this builder produces.
    type Output;

    /// Builds the value, or `None` when the builder is unset.
    ///
    /// A root builder resets itself to its defaults afterwards.
    fn build(&self) -> Option<Self::Output>;

    /// Fills every field with the factory default and releases list children.
    fn reset(&self) -> &Self;

    /// Copies every field of `value` into the builder; `None` unsets it.
    fn reset_from(&self, value: Option<&Self::Output>) -> &Self;

    /// Marks the builder as producing nothing.
    fn unset(&self) -> &Self;

    /// Returns whether the builder is unset, at its defaults, or edited.
    fn status(&self) -> Status;

    fn is_unset(&self) -> bool {
        self.status() == Status::Unset
    }

    /// Returns `true` when the builder has no parent.
    fn is_root(&self) -> bool;

    /// Materializes the style enclosing this builder.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the root of the tree has no
    /// meaning as part of a style, and [`BuildError::Detached`] for a handle
    /// whose node was released.
    fn build_style(&self) -> Result<Option<Style>, BuildError>;

    /// Materializes the styled layer descriptor enclosing this builder.
    ///
    /// # Errors
    ///
    /// See [`Builder::build_style`].
    fn build_sld(&self) -> Result<Option<StyledLayerDescriptor>, BuildError>;
}

/// Parses a strict `#RRGGBB` or `#RRGGBBAA` literal.
pub(crate) fn parse_hex(literal: &str) -> Result<Color, BuildError> {
    Color::from_hex(literal).map_err(|reason| BuildError::InvalidColor {
        literal: literal.to_string(),
        reason,
    })
}

/// Declares a public builder handle over a node type.
macro_rules! builder_handle {
    ($(#[$meta:meta])* $name:ident => $node:ty, $output:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            cursor: $crate::cursor::Cursor,
        }

        impl $name {
            /// Creates a root builder with the stock factory.
            pub fn new() -> Self {
                Self::with_factory(::std::rc::Rc::new(
                    ::mapstyle_core::factory::DefaultStyleFactory::default(),
                ))
            }

            /// Creates a root builder whose values come from `factory`.
            pub fn with_factory(
                factory: ::std::rc::Rc<dyn ::mapstyle_core::factory::StyleFactory>,
            ) -> Self {
                Self {
                    cursor: $crate::cursor::Cursor::root::<$node>(factory),
                }
            }

            #[allow(dead_code)]
            pub(crate) fn from_cursor(cursor: $crate::cursor::Cursor) -> Self {
                Self { cursor }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("status", &self.cursor.status())
                    .field("root", &self.cursor.is_root())
                    .finish()
            }
        }

        impl $crate::builder::Builder for $name {
            type Output = $output;

            fn build(&self) -> Option<$output> {
                self.cursor.build::<$node>()
            }

            fn reset(&self) -> &Self {
                self.cursor.reset::<$node>();
                self
            }

            fn reset_from(&self, value: Option<&$output>) -> &Self {
                self.cursor.reset_from::<$node>(value);
                self
            }

            fn unset(&self) -> &Self {
                self.cursor.unset();
                self
            }

            fn status(&self) -> $crate::node::Status {
                self.cursor.status()
            }

            fn is_root(&self) -> bool {
                self.cursor.is_root()
            }

            fn build_style(
                &self,
            ) -> Result<Option<::mapstyle_core::style::Style>, $crate::error::BuildError> {
                $crate::materialize::build_style(&self.cursor)
            }

            fn build_sld(
                &self,
            ) -> Result<
                Option<::mapstyle_core::style::StyledLayerDescriptor>,
                $crate::error::BuildError,
            > {
                $crate::materialize::build_sld(&self.cursor)
            }
        }
    };
}

pub(crate) use builder_handle;

/// Adds the description accessors to a builder whose node has a
/// `description` slot.
macro_rules! description_accessors {
    ($builder:ident, $node:ty) => {
        impl $builder {
            /// Returns the description builder, marking it explicit.
            pub fn description(&self) -> $crate::builder::DescriptionBuilder {
                $crate::builder::DescriptionBuilder::from_cursor(
                    self.cursor
                        .slot::<$node, $crate::builder::basic::DescriptionNode>(|node| {
                            &mut node.description
                        }),
                )
            }

            /// Sets the description title.
            pub fn title(&self, title: impl Into<String>) -> &Self {
                self.description().title(title);
                self
            }

            /// Sets the description abstract.
            pub fn abstract_text(&self, abstract_text: impl Into<String>) -> &Self {
                self.description().abstract_text(abstract_text);
                self
            }
        }
    };
}

pub(crate) use description_accessors;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_reports_literal() {
        assert_eq!(parse_hex("#00FF00").unwrap().to_rgb8(), [0, 255, 0]);

        let err = parse_hex("green").unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidColor { ref literal, .. } if literal == "green"
        ));
    }
}
