//! Symbolizers: how one kind of geometry is drawn.
//!
//! A [`Rule`](crate::style::Rule) holds an ordered list of symbolizers; each
//! one turns the features that pass the rule into marks on the map.
//!
//! # Overview
//!
//! Exported types:
//! - [`SymbolizerInfo`]: name, description, geometry, unit of measure and
//!   vendor options shared by every symbolizer
//! - [`PointSymbolizer`]: draws a [`Graphic`] at each point
//! - [`LineSymbolizer`]: strokes lines, optionally offset sideways
//! - [`PolygonSymbolizer`]: fills and outlines areas
//! - [`TextSymbolizer`]: places labels, with fonts, halo and an optional shield
//! - [`RasterSymbolizer`]: renders coverages through band selection, color
//!   maps, contrast enhancement and shaded relief
//! - [`Symbolizer`]: the closed enum over the five kinds
//!
//! Missing parts are `None` rather than defaulted: a line symbolizer without a
//! stroke draws nothing, and the renderer decides what that means.
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::expr::Expression;
//! use mapstyle_core::style::{LineSymbolizer, Stroke, Symbolizer, SymbolizerInfo};
//!
//! let stroke = Stroke::new(
//!     None,
//!     Some(Expression::from(3.0)),
//!     None,
//!     None,
//!     None,
//!     vec![],
//!     None,
//!     None,
//!     None,
//! );
//! let line = LineSymbolizer::new(SymbolizerInfo::default(), Some(stroke), None);
//! let symbolizer = Symbolizer::Line(line);
//!
//! let width = symbolizer
//!     .as_line()
//!     .and_then(|line| line.stroke())
//!     .and_then(|stroke| stroke.width())
//!     .and_then(|width| width.literal_f64());
//! assert_eq!(width, Some(3.0));
//! // No geometry expression: the feature's default geometry is drawn
//! assert!(symbolizer.info().geometry().is_none());
//! ```

use crate::{
    expr::Expression,
    style::{
        ChannelSelection, ColorMap, ContrastEnhancement, Description, Displacement, Fill, Font,
        Graphic, Halo, LabelPlacement, OverlapBehavior, ShadedRelief, Stroke, UnitOfMeasure,
        VendorOptions,
    },
};

/// Properties shared by every symbolizer.
///
/// The default value has no name, no description, draws the default geometry
/// in pixels and carries no vendor options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolizerInfo {
    name: Option<String>,
    description: Option<Description>,
    geometry: Option<Expression>,
    unit_of_measure: Option<UnitOfMeasure>,
    options: VendorOptions,
}

impl SymbolizerInfo {
    /// Creates the shared properties of a symbolizer.
    pub fn new(
        name: Option<String>,
        description: Option<Description>,
        geometry: Option<Expression>,
        unit_of_measure: Option<UnitOfMeasure>,
        options: VendorOptions,
    ) -> Self {
        Self {
            name,
            description,
            geometry,
            unit_of_measure,
            options,
        }
    }

    /// Returns the symbolizer name, used to identify it in legends and logs.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the human-readable title and abstract.
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// Returns the geometry to draw; `None` means the feature's default geometry.
    ///
    /// Usually a property reference such as `the_geom`, but any expression
    /// producing a geometry is allowed.
    pub fn geometry(&self) -> Option<&Expression> {
        self.geometry.as_ref()
    }

    /// Returns the unit sizes are measured in; `None` means pixels.
    pub fn unit_of_measure(&self) -> Option<UnitOfMeasure> {
        self.unit_of_measure
    }

    /// Returns renderer-specific options, in insertion order.
    pub fn options(&self) -> &VendorOptions {
        &self.options
    }
}

/// Draws a graphic at each point of a geometry.
///
/// Lines and polygons are reduced to a representative point by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSymbolizer {
    info: SymbolizerInfo,
    graphic: Option<Graphic>,
}

impl PointSymbolizer {
    /// Creates a point symbolizer.
    pub fn new(info: SymbolizerInfo, graphic: Option<Graphic>) -> Self {
        Self { info, graphic }
    }

    /// Returns the shared symbolizer properties.
    pub fn info(&self) -> &SymbolizerInfo {
        &self.info
    }

    /// Returns the graphic drawn at each point.
    pub fn graphic(&self) -> Option<&Graphic> {
        self.graphic.as_ref()
    }
}

/// Strokes the outline of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSymbolizer {
    info: SymbolizerInfo,
    stroke: Option<Stroke>,
    perpendicular_offset: Option<Expression>,
}

impl LineSymbolizer {
    /// Creates a line symbolizer.
    pub fn new(
        info: SymbolizerInfo,
        stroke: Option<Stroke>,
        perpendicular_offset: Option<Expression>,
    ) -> Self {
        Self {
            info,
            stroke,
            perpendicular_offset,
        }
    }

    /// Returns the shared symbolizer properties.
    pub fn info(&self) -> &SymbolizerInfo {
        &self.info
    }

    /// Returns the stroke used to draw the line.
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Returns the distance the line is shifted sideways.
    ///
    /// Positive values shift to the left of the line direction.
    pub fn perpendicular_offset(&self) -> Option<&Expression> {
        self.perpendicular_offset.as_ref()
    }
}

/// Fills the interior of a polygon and strokes its outline.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSymbolizer {
    info: SymbolizerInfo,
    fill: Option<Fill>,
    stroke: Option<Stroke>,
    displacement: Option<Displacement>,
    perpendicular_offset: Option<Expression>,
}

impl PolygonSymbolizer {
    /// Creates a polygon symbolizer.
    pub fn new(
        info: SymbolizerInfo,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
        displacement: Option<Displacement>,
        perpendicular_offset: Option<Expression>,
    ) -> Self {
        Self {
            info,
            fill,
            stroke,
            displacement,
            perpendicular_offset,
        }
    }

    /// Returns the shared symbolizer properties.
    pub fn info(&self) -> &SymbolizerInfo {
        &self.info
    }

    /// Returns the interior fill; `None` leaves the interior empty.
    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    /// Returns the outline stroke; `None` draws no outline.
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Returns the offset applied to the whole polygon.
    pub fn displacement(&self) -> Option<&Displacement> {
        self.displacement.as_ref()
    }

    /// Returns the distance the outline is moved off the polygon boundary.
    pub fn perpendicular_offset(&self) -> Option<&Expression> {
        self.perpendicular_offset.as_ref()
    }
}

/// Draws a label, optionally with a shield graphic behind it.
///
/// Fonts are listed in order of preference; the renderer uses the first one
/// it has available.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSymbolizer {
    info: SymbolizerInfo,
    label: Option<Expression>,
    fonts: Vec<Font>,
    placement: Option<LabelPlacement>,
    halo: Option<Halo>,
    fill: Option<Fill>,
    priority: Option<Expression>,
    shield: Option<Graphic>,
}

impl TextSymbolizer {
    /// Creates a text symbolizer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        info: SymbolizerInfo,
        label: Option<Expression>,
        fonts: Vec<Font>,
        placement: Option<LabelPlacement>,
        halo: Option<Halo>,
        fill: Option<Fill>,
        priority: Option<Expression>,
        shield: Option<Graphic>,
    ) -> Self {
        Self {
            info,
            label,
            fonts,
            placement,
            halo,
            fill,
            priority,
            shield,
        }
    }

    pub fn info(&self) -> &SymbolizerInfo {
        &self.info
    }

    /// Returns the text to draw, usually computed from feature properties.
    pub fn label(&self) -> Option<&Expression> {
        self.label.as_ref()
    }

    /// Returns the candidate fonts, most preferred first.
    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    /// Returns where the label sits relative to its geometry.
    pub fn placement(&self) -> Option<&LabelPlacement> {
        self.placement.as_ref()
    }

    /// Returns the outline drawn around the glyphs.
    pub fn halo(&self) -> Option<&Halo> {
        self.halo.as_ref()
    }

    /// Returns the glyph fill.
    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    /// Returns the priority used when labels collide; higher wins.
    pub fn priority(&self) -> Option<&Expression> {
        self.priority.as_ref()
    }

    /// Returns the graphic drawn behind the label, such as a road shield.
    pub fn shield(&self) -> Option<&Graphic> {
        self.shield.as_ref()
    }
}

/// Renders raster data.
///
/// Processing runs in a fixed order: bands are picked by the
/// [`ChannelSelection`], then the [`ColorMap`] or contrast enhancement is
/// applied, then shaded relief, and the result is composited with `opacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSymbolizer {
    info: SymbolizerInfo,
    opacity: Option<Expression>,
    channel_selection: Option<ChannelSelection>,
    overlap_behavior: Option<OverlapBehavior>,
    color_map: Option<ColorMap>,
    contrast_enhancement: Option<ContrastEnhancement>,
    shaded_relief: Option<ShadedRelief>,
}

impl RasterSymbolizer {
    /// Creates a raster symbolizer.
    pub fn new(
        info: SymbolizerInfo,
        opacity: Option<Expression>,
        channel_selection: Option<ChannelSelection>,
        overlap_behavior: Option<OverlapBehavior>,
        color_map: Option<ColorMap>,
        contrast_enhancement: Option<ContrastEnhancement>,
        shaded_relief: Option<ShadedRelief>,
    ) -> Self {
        Self {
            info,
            opacity,
            channel_selection,
            overlap_behavior,
            color_map,
            contrast_enhancement,
            shaded_relief,
        }
    }

    pub fn info(&self) -> &SymbolizerInfo {
        &self.info
    }

    /// Returns the opacity in `0.0..=1.0` the raster is composited with.
    pub fn opacity(&self) -> Option<&Expression> {
        self.opacity.as_ref()
    }

    /// Returns which bands feed the output.
    pub fn channel_selection(&self) -> Option<&ChannelSelection> {
        self.channel_selection.as_ref()
    }

    /// Returns how overlapping tiles are combined.
    pub fn overlap_behavior(&self) -> Option<OverlapBehavior> {
        self.overlap_behavior
    }

    /// Returns the mapping from band values to colors.
    pub fn color_map(&self) -> Option<&ColorMap> {
        self.color_map.as_ref()
    }

    /// Returns the contrast adjustment applied to the whole image.
    pub fn contrast_enhancement(&self) -> Option<&ContrastEnhancement> {
        self.contrast_enhancement.as_ref()
    }

    /// Returns the hill shading applied to elevation data.
    pub fn shaded_relief(&self) -> Option<&ShadedRelief> {
        self.shaded_relief.as_ref()
    }
}

/// Any symbolizer.
///
/// The `as_*` accessors return the concrete symbolizer when the variant
/// matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbolizer {
    /// Graphic at each point
    Point(PointSymbolizer),
    /// Stroked line
    Line(LineSymbolizer),
    /// Filled and outlined area
    Polygon(PolygonSymbolizer),
    /// Label
    Text(TextSymbolizer),
    /// Raster coverage
    Raster(RasterSymbolizer),
}

impl Symbolizer {
    /// Returns the shared symbolizer properties.
    pub fn info(&self) -> &SymbolizerInfo {
        match self {
            Self::Point(s) => s.info(),
            Self::Line(s) => s.info(),
            Self::Polygon(s) => s.info(),
            Self::Text(s) => s.info(),
            Self::Raster(s) => s.info(),
        }
    }

    pub fn as_point(&self) -> Option<&PointSymbolizer> {
        match self {
            Self::Point(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineSymbolizer> {
        match self {
            Self::Line(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonSymbolizer> {
        match self {
            Self::Polygon(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextSymbolizer> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_raster(&self) -> Option<&RasterSymbolizer> {
        match self {
            Self::Raster(s) => Some(s),
            _ => None,
        }
    }
}
