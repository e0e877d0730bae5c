//! Graphics: marks, external images and their placement attributes.
//!
//! # Overview
//!
//! A [`Graphic`] holds a list of alternative [`GraphicalSymbol`]s. A renderer
//! draws the first one it supports, so a shape [`Mark`] usually follows an
//! [`ExternalGraphic`] as a fallback. Size, opacity, rotation, anchor and
//! displacement apply to whichever symbol is drawn.
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::expr::Expression;
//! use mapstyle_core::style::{Graphic, GraphicalSymbol, Mark};
//!
//! let circle = Mark::new(Some(Expression::from("circle")), None, None, None);
//! let graphic = Graphic::new(
//!     vec![GraphicalSymbol::Mark(circle)],
//!     None,
//!     Some(Expression::from(8.0)),
//!     None,
//!     None,
//!     None,
//!     None,
//!     None,
//! );
//! assert_eq!(graphic.marks().count(), 1);
//! assert_eq!(graphic.size(), Some(&Expression::from(8.0)));
//! ```

use crate::{
    expr::Expression,
    style::{AnchorPoint, Displacement, Fill, Stroke},
};

/// A well-known or external shape drawn with a fill and stroke.
///
/// A mark with neither a well-known name nor an external mark is still a
/// valid value; renderers fall back to their default shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    well_known_name: Option<Expression>,
    external_mark: Option<ExternalMark>,
    fill: Option<Fill>,
    stroke: Option<Stroke>,
}

impl Mark {
    /// Creates a mark.
    pub fn new(
        well_known_name: Option<Expression>,
        external_mark: Option<ExternalMark>,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    ) -> Self {
        Self {
            well_known_name,
            external_mark,
            fill,
            stroke,
        }
    }

    /// Returns the shape name such as `square`, `circle` or `shape://vertline`.
    pub fn well_known_name(&self) -> Option<&Expression> {
        self.well_known_name.as_ref()
    }

    /// Returns the external shape, used instead of the well-known name.
    pub fn external_mark(&self) -> Option<&ExternalMark> {
        self.external_mark.as_ref()
    }

    /// Returns the interior fill. `None` leaves the shape hollow.
    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    /// Returns the outline. `None` draws no outline.
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }
}

/// A mark shape taken from an external resource such as a font or a
/// shape file, selected by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalMark {
    uri: Option<String>,
    inline_content: Option<Vec<u8>>,
    format: Option<String>,
    mark_index: i32,
}

impl ExternalMark {
    pub fn new(
        uri: Option<String>,
        inline_content: Option<Vec<u8>>,
        format: Option<String>,
        mark_index: i32,
    ) -> Self {
        Self {
            uri,
            inline_content,
            format,
            mark_index,
        }
    }

    /// Returns the location of the resource, such as `ttf://Webdings`.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the resource bytes when they are embedded.
    pub fn inline_content(&self) -> Option<&[u8]> {
        self.inline_content.as_deref()
    }

    /// Returns the resource format, such as `ttf`.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the index of the shape inside the resource, e.g. a glyph code.
    pub fn mark_index(&self) -> i32 {
        self.mark_index
    }
}

/// Recoding of colors inside an external graphic.
///
/// Equivalent to a `Recode(property, from1, to1, from2, to2, ...)` function
/// applied to the graphic's pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorReplacement {
    property: Option<Expression>,
    mapping: Vec<(Expression, Expression)>,
}

impl ColorReplacement {
    pub fn new(property: Option<Expression>, mapping: Vec<(Expression, Expression)>) -> Self {
        Self { property, mapping }
    }

    /// Returns the expression whose value is recoded.
    pub fn property(&self) -> Option<&Expression> {
        self.property.as_ref()
    }

    /// Returns the `(from, to)` pairs in declaration order.
    pub fn mapping(&self) -> &[(Expression, Expression)] {
        &self.mapping
    }

    /// Returns the replacement as a `Recode` function expression.
    pub fn recoding(&self) -> Expression {
        let mut args = Vec::with_capacity(1 + self.mapping.len() * 2);
        args.push(self.property.clone().unwrap_or_default());
        for (from, to) in &self.mapping {
            args.push(from.clone());
            args.push(to.clone());
        }
        Expression::function("Recode", args)
    }
}

/// An image referenced by URI or embedded inline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalGraphic {
    uri: Option<String>,
    inline_content: Option<Vec<u8>>,
    format: Option<String>,
    color_replacements: Vec<ColorReplacement>,
}

impl ExternalGraphic {
    /// Creates an external graphic.
    pub fn new(
        uri: Option<String>,
        inline_content: Option<Vec<u8>>,
        format: Option<String>,
        color_replacements: Vec<ColorReplacement>,
    ) -> Self {
        Self {
            uri,
            inline_content,
            format,
            color_replacements,
        }
    }

    /// Returns the image location.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the image bytes when they are embedded.
    pub fn inline_content(&self) -> Option<&[u8]> {
        self.inline_content.as_deref()
    }

    /// Returns the MIME type, e.g. `image/png`.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the color recodings applied to the image.
    pub fn color_replacements(&self) -> &[ColorReplacement] {
        &self.color_replacements
    }
}

/// One symbol of a [`Graphic`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicalSymbol {
    /// Shape drawn with a fill and stroke
    Mark(Mark),
    /// Image loaded from a resource
    ExternalGraphic(ExternalGraphic),
}

impl GraphicalSymbol {
    pub fn as_mark(&self) -> Option<&Mark> {
        match self {
            Self::Mark(mark) => Some(mark),
            Self::ExternalGraphic(_) => None,
        }
    }

    pub fn as_external_graphic(&self) -> Option<&ExternalGraphic> {
        match self {
            Self::ExternalGraphic(graphic) => Some(graphic),
            Self::Mark(_) => None,
        }
    }
}

/// A point graphic: an ordered list of alternative symbols plus size,
/// opacity, rotation and placement.
///
/// `gap` and `initial_gap` only apply when the graphic is used as a graphic
/// stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    symbols: Vec<GraphicalSymbol>,
    opacity: Option<Expression>,
    size: Option<Expression>,
    rotation: Option<Expression>,
    anchor_point: Option<AnchorPoint>,
    displacement: Option<Displacement>,
    gap: Option<Expression>,
    initial_gap: Option<Expression>,
}

impl Graphic {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbols: Vec<GraphicalSymbol>,
        opacity: Option<Expression>,
        size: Option<Expression>,
        rotation: Option<Expression>,
        anchor_point: Option<AnchorPoint>,
        displacement: Option<Displacement>,
        gap: Option<Expression>,
        initial_gap: Option<Expression>,
    ) -> Self {
        Self {
            symbols,
            opacity,
            size,
            rotation,
            anchor_point,
            displacement,
            gap,
            initial_gap,
        }
    }

    /// Returns the symbols, most preferred first.
    pub fn symbols(&self) -> &[GraphicalSymbol] {
        &self.symbols
    }

    /// Returns the marks among the symbols.
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.symbols.iter().filter_map(GraphicalSymbol::as_mark)
    }

    /// Returns the opacity, from `0.0` (transparent) to `1.0`.
    pub fn opacity(&self) -> Option<&Expression> {
        self.opacity.as_ref()
    }

    /// Returns the height of the graphic. `None` keeps the native size.
    pub fn size(&self) -> Option<&Expression> {
        self.size.as_ref()
    }

    /// Returns the clockwise rotation in degrees.
    pub fn rotation(&self) -> Option<&Expression> {
        self.rotation.as_ref()
    }

    pub fn anchor_point(&self) -> Option<&AnchorPoint> {
        self.anchor_point.as_ref()
    }

    pub fn displacement(&self) -> Option<&Displacement> {
        self.displacement.as_ref()
    }

    /// Returns the spacing between repeats along a graphic stroke.
    pub fn gap(&self) -> Option<&Expression> {
        self.gap.as_ref()
    }

    /// Returns the distance before the first repeat along a graphic stroke.
    pub fn initial_gap(&self) -> Option<&Expression> {
        self.initial_gap.as_ref()
    }
}
