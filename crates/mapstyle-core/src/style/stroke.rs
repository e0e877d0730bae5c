//! Stroke values for lines and outlines.
//!
//! # Overview
//!
//! - [`Stroke`]: color, width, opacity, join, cap, dash pattern and optional
//!   graphic fill / graphic stroke.
//! - [`LineCap`] / [`LineJoin`]: the SLD `stroke-linecap` / `stroke-linejoin` keywords.
//!
//! Join and cap are stored as [`Expression`]s since SLD allows them to be
//! computed from feature properties. The enums convert into literal
//! expressions.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{
    expr::{EvaluationContext, Expression},
    style::Graphic,
};

// =============================================================================
// Type Definitions
// =============================================================================

/// Defines how line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Flat cap at the exact endpoint (SLD default)
    #[default]
    Butt,
    /// Rounded cap extending beyond the endpoint by half the stroke width
    Round,
    /// Square cap extending beyond the endpoint by half the stroke width
    Square,
}

impl LineCap {
    /// Returns the SLD keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

impl FromStr for LineCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "square" => Ok(Self::Square),
            _ => Err(format!(
                "invalid line cap `{s}`, valid values: butt, round, square"
            )),
        }
    }
}

/// Defines how line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    /// Sharp corner with mitered point (SLD default)
    #[default]
    Miter,
    /// Rounded corner
    Round,
    /// Beveled corner
    Bevel,
}

impl LineJoin {
    /// Returns the SLD keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Miter => "mitre",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

impl FromStr for LineJoin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mitre" | "miter" => Ok(Self::Miter),
            "round" => Ok(Self::Round),
            "bevel" => Ok(Self::Bevel),
            _ => Err(format!(
                "invalid line join `{s}`, valid values: mitre, round, bevel"
            )),
        }
    }
}

macro_rules! keyword_expression {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::from(value.keyword())
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.keyword())
                }
            }
        )*
    };
}

keyword_expression!(LineCap, LineJoin);

/// A stroke for rendering lines and polygon outlines.
///
/// Every property is optional; a missing property leaves the choice to the
/// renderer. A non-empty dash array turns the line into alternating dashes
/// and gaps, starting `dash_offset` into the pattern. A graphic fill paints
/// the stroke area with a repeated graphic; a graphic stroke repeats a
/// graphic along the line instead of drawing it.
///
/// # Examples
///
/// ```
/// use mapstyle_core::color::Color;
/// use mapstyle_core::expr::Expression;
/// use mapstyle_core::style::{LineCap, LineJoin, Stroke};
///
/// let stroke = Stroke::new(
///     Some(Expression::from(Color::new("red").unwrap())),
///     Some(Expression::from(2.0)),
///     Some(Expression::from(1.0)),
///     Some(LineJoin::Round.into()),
///     Some(LineCap::Round.into()),
///     vec![Expression::from(4.0), Expression::from(2.0)],
///     None,
///     None,
///     None,
/// );
/// assert_eq!(stroke.dash_array_floats(), Some(vec![4.0, 2.0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    color: Option<Expression>,
    width: Option<Expression>,
    opacity: Option<Expression>,
    line_join: Option<Expression>,
    line_cap: Option<Expression>,
    dash_array: Vec<Expression>,
    dash_offset: Option<Expression>,
    graphic_fill: Option<Graphic>,
    graphic_stroke: Option<Graphic>,
}

impl Stroke {
    /// Creates a stroke.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        color: Option<Expression>,
        width: Option<Expression>,
        opacity: Option<Expression>,
        line_join: Option<Expression>,
        line_cap: Option<Expression>,
        dash_array: Vec<Expression>,
        dash_offset: Option<Expression>,
        graphic_fill: Option<Graphic>,
        graphic_stroke: Option<Graphic>,
    ) -> Self {
        Self {
            color,
            width,
            opacity,
            line_join,
            line_cap,
            dash_array,
            dash_offset,
            graphic_fill,
            graphic_stroke,
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Option<&Expression> {
        self.color.as_ref()
    }

    /// Returns the stroke width, in the symbolizer's unit of measure.
    pub fn width(&self) -> Option<&Expression> {
        self.width.as_ref()
    }

    /// Returns the stroke opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> Option<&Expression> {
        self.opacity.as_ref()
    }

    /// Returns how corners are drawn, as a [`LineJoin`] keyword expression.
    pub fn line_join(&self) -> Option<&Expression> {
        self.line_join.as_ref()
    }

    /// Returns how endpoints are drawn, as a [`LineCap`] keyword expression.
    pub fn line_cap(&self) -> Option<&Expression> {
        self.line_cap.as_ref()
    }

    /// Returns the dash pattern as expressions; empty means a solid line.
    pub fn dash_array(&self) -> &[Expression] {
        &self.dash_array
    }

    /// Returns the dash pattern evaluated to numbers.
    ///
    /// Returns `None` when the pattern is empty or an entry does not evaluate
    /// to a number without feature properties.
    pub fn dash_array_floats(&self) -> Option<Vec<f32>> {
        if self.dash_array.is_empty() {
            return None;
        }
        let ctx = EvaluationContext::new();
        self.dash_array
            .iter()
            .map(|expr| expr.evaluate(&ctx).as_f64().map(|v| v as f32))
            .collect()
    }

    /// Returns how far into the dash pattern the line starts.
    pub fn dash_offset(&self) -> Option<&Expression> {
        self.dash_offset.as_ref()
    }

    /// Returns the graphic tiled over the stroke area.
    pub fn graphic_fill(&self) -> Option<&Graphic> {
        self.graphic_fill.as_ref()
    }

    /// Returns the graphic repeated along the line.
    pub fn graphic_stroke(&self) -> Option<&Graphic> {
        self.graphic_stroke.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cap_from_str() {
        assert_eq!("butt".parse::<LineCap>().unwrap(), LineCap::Butt);
        assert_eq!("round".parse::<LineCap>().unwrap(), LineCap::Round);
        assert_eq!("square".parse::<LineCap>().unwrap(), LineCap::Square);

        let err = "flat".parse::<LineCap>().unwrap_err();
        assert!(err.contains("invalid line cap `flat`"));
        assert!(err.contains("valid values: butt, round, square"));
    }

    #[test]
    fn test_line_join_from_str() {
        assert_eq!("miter".parse::<LineJoin>().unwrap(), LineJoin::Miter);
        assert_eq!("mitre".parse::<LineJoin>().unwrap(), LineJoin::Miter);
        assert_eq!("bevel".parse::<LineJoin>().unwrap(), LineJoin::Bevel);
        assert!("sharp".parse::<LineJoin>().is_err());
    }

    #[test]
    fn test_keyword_into_expression() {
        assert_eq!(Expression::from(LineCap::Square), Expression::from("square"));
        assert_eq!(LineJoin::Round.to_string(), "round");
    }

    #[test]
    fn test_dash_array_floats() {
        let solid = Stroke::new(None, None, None, None, None, vec![], None, None, None);
        assert_eq!(solid.dash_array_floats(), None);

        let computed = Stroke::new(
            None,
            None,
            None,
            None,
            None,
            vec![Expression::from(2.0), Expression::property("gap")],
            None,
            None,
            None,
        );
        assert_eq!(computed.dash_array_floats(), None);
    }
}
