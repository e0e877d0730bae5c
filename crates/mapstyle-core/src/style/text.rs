//! Label values: fonts, halos and placements.
//!
//! # Overview
//!
//! - [`Font`]: candidate families plus style, weight and size
//! - [`FontStyle`] / [`FontWeight`]: the SLD `font-style` / `font-weight` keywords
//! - [`Halo`]: the outline drawn around glyphs to keep them readable
//! - [`LabelPlacement`]: either a [`PointPlacement`] (anchor, displacement,
//!   rotation) or a [`LinePlacement`] (offset, gaps, repetition)
//!
//! Like stroke joins and caps, font style and weight are stored as
//! expressions; the keyword enums convert into literal expressions.
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::expr::Expression;
//! use mapstyle_core::style::{Font, FontWeight, LabelPlacement, LinePlacement};
//!
//! let font = Font::new(
//!     vec![Expression::from("Noto Sans"), Expression::from("sans-serif")],
//!     None,
//!     Some(FontWeight::Bold.into()),
//!     Some(Expression::from(11.0)),
//! );
//! assert_eq!(font.family().len(), 2);
//! assert_eq!(font.weight(), Some(&Expression::from("bold")));
//!
//! let placement = LabelPlacement::Line(LinePlacement::new(None, None, None, true, true, false));
//! assert!(placement.as_line().is_some_and(LinePlacement::is_repeated));
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{
    expr::Expression,
    style::{AnchorPoint, Displacement, Fill},
};

/// Slant of a font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright glyphs (SLD default)
    #[default]
    Normal,
    /// Cursive slanted glyphs
    Italic,
    /// Upright glyphs slanted artificially
    Oblique,
}

impl FontStyle {
    /// Returns the SLD keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            "oblique" => Ok(Self::Oblique),
            _ => Err(format!(
                "invalid font style `{s}`, valid values: normal, italic, oblique"
            )),
        }
    }
}

/// Weight of a font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight (SLD default)
    #[default]
    Normal,
    /// Bold weight
    Bold,
}

impl FontWeight {
    /// Returns the SLD keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            _ => Err(format!(
                "invalid font weight `{s}`, valid values: normal, bold"
            )),
        }
    }
}

impl From<FontStyle> for Expression {
    fn from(value: FontStyle) -> Self {
        Expression::from(value.keyword())
    }
}

impl From<FontWeight> for Expression {
    fn from(value: FontWeight) -> Self {
        Expression::from(value.keyword())
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A font description: candidate families in preference order plus style,
/// weight and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: Vec<Expression>,
    style: Option<Expression>,
    weight: Option<Expression>,
    size: Option<Expression>,
}

impl Font {
    /// Creates a font.
    pub fn new(
        family: Vec<Expression>,
        style: Option<Expression>,
        weight: Option<Expression>,
        size: Option<Expression>,
    ) -> Self {
        Self {
            family,
            style,
            weight,
            size,
        }
    }

    /// Returns the family names, most preferred first.
    pub fn family(&self) -> &[Expression] {
        &self.family
    }

    /// Returns the slant, as a [`FontStyle`] keyword expression.
    pub fn style(&self) -> Option<&Expression> {
        self.style.as_ref()
    }

    /// Returns the weight, as a [`FontWeight`] keyword expression.
    pub fn weight(&self) -> Option<&Expression> {
        self.weight.as_ref()
    }

    /// Returns the font size, in the symbolizer's unit of measure.
    pub fn size(&self) -> Option<&Expression> {
        self.size.as_ref()
    }
}

/// A blurred outline around label glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Halo {
    fill: Option<Fill>,
    radius: Option<Expression>,
}

impl Halo {
    pub fn new(fill: Option<Fill>, radius: Option<Expression>) -> Self {
        Self { fill, radius }
    }

    /// Returns the halo fill, usually an opaque background color.
    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    /// Returns how far the halo extends beyond the glyph outlines.
    pub fn radius(&self) -> Option<&Expression> {
        self.radius.as_ref()
    }
}

/// Placement of a label relative to a point.
///
/// The anchor picks which point of the label box sits on the location, the
/// displacement then moves it, and the rotation turns it around that point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointPlacement {
    anchor_point: Option<AnchorPoint>,
    displacement: Option<Displacement>,
    rotation: Option<Expression>,
}

impl PointPlacement {
    pub fn new(
        anchor_point: Option<AnchorPoint>,
        displacement: Option<Displacement>,
        rotation: Option<Expression>,
    ) -> Self {
        Self {
            anchor_point,
            displacement,
            rotation,
        }
    }

    pub fn anchor_point(&self) -> Option<&AnchorPoint> {
        self.anchor_point.as_ref()
    }

    pub fn displacement(&self) -> Option<&Displacement> {
        self.displacement.as_ref()
    }

    /// Returns the clockwise rotation in degrees.
    pub fn rotation(&self) -> Option<&Expression> {
        self.rotation.as_ref()
    }
}

/// Placement of a label along a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlacement {
    perpendicular_offset: Option<Expression>,
    initial_gap: Option<Expression>,
    gap: Option<Expression>,
    repeated: bool,
    aligned: bool,
    generalize_line: bool,
}

impl LinePlacement {
    pub fn new(
        perpendicular_offset: Option<Expression>,
        initial_gap: Option<Expression>,
        gap: Option<Expression>,
        repeated: bool,
        aligned: bool,
        generalize_line: bool,
    ) -> Self {
        Self {
            perpendicular_offset,
            initial_gap,
            gap,
            repeated,
            aligned,
            generalize_line,
        }
    }

    /// Returns the distance between the label and the line.
    pub fn perpendicular_offset(&self) -> Option<&Expression> {
        self.perpendicular_offset.as_ref()
    }

    /// Returns the distance from the line start to the first label.
    pub fn initial_gap(&self) -> Option<&Expression> {
        self.initial_gap.as_ref()
    }

    /// Returns the distance between repeated labels.
    pub fn gap(&self) -> Option<&Expression> {
        self.gap.as_ref()
    }

    /// Returns `true` if the label is repeated along the line.
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Returns `true` if the label follows the line's curvature.
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// Returns `true` if the line is simplified before the label is placed.
    pub fn is_generalize_line(&self) -> bool {
        self.generalize_line
    }
}

/// Where a label goes: around a point or along a line.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelPlacement {
    /// Around a point
    Point(PointPlacement),
    /// Along a line
    Line(LinePlacement),
}

impl LabelPlacement {
    pub fn as_point(&self) -> Option<&PointPlacement> {
        match self {
            Self::Point(placement) => Some(placement),
            Self::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&LinePlacement> {
        match self {
            Self::Line(placement) => Some(placement),
            Self::Point(_) => None,
        }
    }
}
