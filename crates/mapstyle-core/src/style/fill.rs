//! Area fill values.
//!
//! A [`Fill`] paints with a solid color or, when a graphic fill is set, with
//! a repeated graphic tile. Color and opacity are expressions so they can be
//! computed per feature.

use crate::{expr::Expression, style::Graphic};

/// Fill of a polygon interior, a halo or a mark.
///
/// # Examples
///
/// ```
/// use mapstyle_core::color::Color;
/// use mapstyle_core::expr::{EvaluationContext, Expression};
/// use mapstyle_core::style::Fill;
///
/// let fill = Fill::new(
///     Some(Expression::from(Color::from_hex("#3366CC").unwrap())),
///     Some(Expression::from(0.5)),
///     None,
/// );
/// let color = fill
///     .color()
///     .and_then(|c| c.evaluate(&EvaluationContext::new()).to_color());
/// assert_eq!(color.map(|c| c.to_rgb8()), Some([0x33, 0x66, 0xCC]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    color: Option<Expression>,
    opacity: Option<Expression>,
    graphic_fill: Option<Graphic>,
}

impl Fill {
    /// Creates a fill.
    pub fn new(
        color: Option<Expression>,
        opacity: Option<Expression>,
        graphic_fill: Option<Graphic>,
    ) -> Self {
        Self {
            color,
            opacity,
            graphic_fill,
        }
    }

    /// Returns the fill color.
    pub fn color(&self) -> Option<&Expression> {
        self.color.as_ref()
    }

    /// Returns the fill opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> Option<&Expression> {
        self.opacity.as_ref()
    }

    /// Returns the repeated graphic used instead of a solid color.
    pub fn graphic_fill(&self) -> Option<&Graphic> {
        self.graphic_fill.as_ref()
    }
}
