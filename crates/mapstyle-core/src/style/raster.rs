//! Raster symbolization values.
//!
//! # Overview
//!
//! - [`ChannelSelection`]: which source bands feed the gray or RGB output
//! - [`ContrastEnhancement`]: stretching applied to the whole raster or one band
//! - [`ColorMap`]: maps band values to colors through [`ColorMapEntry`] stops
//! - [`ShadedRelief`]: hill shading for elevation data
//! - [`OverlapBehavior`]: how rasters that cover the same pixels combine
//!
//! # Quick Start
//!
//! ```
//! use mapstyle_core::expr::Expression;
//! use mapstyle_core::style::{ColorMap, ColorMapEntry, ColorMapKind};
//!
//! let stop = |quantity: f64, color: &str| {
//!     ColorMapEntry::new(None, Some(Expression::from(color)), None, Some(Expression::from(quantity)))
//! };
//! let map = ColorMap::new(
//!     ColorMapKind::Intervals,
//!     false,
//!     vec![stop(0.0, "#0000FF"), stop(100.0, "#00FF00"), stop(1000.0, "#FFFFFF")],
//! );
//! assert_eq!(map.kind(), ColorMapKind::Intervals);
//! assert_eq!(map.entries().len(), 3);
//! ```

use std::str::FromStr;

use indexmap::IndexMap;

use crate::expr::Expression;

/// Contrast enhancement algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContrastMethod {
    /// No enhancement; only gamma applies
    #[default]
    None,
    /// Linear stretch of the value range to the full output range
    Normalize,
    /// Histogram equalization
    Histogram,
    /// Logarithmic stretch, brightening dark values
    Logarithmic,
    /// Exponential stretch, darkening light values
    Exponential,
}

impl ContrastMethod {
    /// Returns the SLD keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Normalize => "normalize",
            Self::Histogram => "histogram",
            Self::Logarithmic => "logarithmic",
            Self::Exponential => "exponential",
        }
    }
}

impl FromStr for ContrastMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "normalize" => Ok(Self::Normalize),
            "histogram" => Ok(Self::Histogram),
            "logarithmic" => Ok(Self::Logarithmic),
            "exponential" => Ok(Self::Exponential),
            _ => Err(format!(
                "invalid contrast method `{s}`, valid values: none, normalize, histogram, logarithmic, exponential"
            )),
        }
    }
}

/// Contrast adjustment for a raster or a single channel.
///
/// Options carry algorithm parameters such as `algorithm`, `minValue` or
/// `maxValue`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContrastEnhancement {
    method: ContrastMethod,
    gamma: Option<Expression>,
    options: IndexMap<String, Expression>,
}

impl ContrastEnhancement {
    /// Creates a contrast enhancement.
    pub fn new(
        method: ContrastMethod,
        gamma: Option<Expression>,
        options: IndexMap<String, Expression>,
    ) -> Self {
        Self {
            method,
            gamma,
            options,
        }
    }

    pub fn method(&self) -> ContrastMethod {
        self.method
    }

    /// Returns the gamma correction; values above `1.0` darken.
    pub fn gamma(&self) -> Option<&Expression> {
        self.gamma.as_ref()
    }

    /// Returns the algorithm parameters in insertion order.
    pub fn options(&self) -> &IndexMap<String, Expression> {
        &self.options
    }
}

/// A single source band mapped to an output channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedChannel {
    channel_name: Option<Expression>,
    contrast_enhancement: Option<ContrastEnhancement>,
}

impl SelectedChannel {
    pub fn new(
        channel_name: Option<Expression>,
        contrast_enhancement: Option<ContrastEnhancement>,
    ) -> Self {
        Self {
            channel_name,
            contrast_enhancement,
        }
    }

    /// Returns the source band, by name or 1-based index.
    pub fn channel_name(&self) -> Option<&Expression> {
        self.channel_name.as_ref()
    }

    /// Returns the contrast adjustment applied to this band only.
    pub fn contrast_enhancement(&self) -> Option<&ContrastEnhancement> {
        self.contrast_enhancement.as_ref()
    }
}

/// Band selection: one gray channel or up to three color channels.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSelection {
    /// Single band rendered as grayscale
    Gray(SelectedChannel),
    /// Up to three bands rendered as color
    Rgb {
        red: Option<SelectedChannel>,
        green: Option<SelectedChannel>,
        blue: Option<SelectedChannel>,
    },
}

impl ChannelSelection {
    /// Returns the gray channel; `None` for an RGB selection.
    pub fn gray(&self) -> Option<&SelectedChannel> {
        match self {
            Self::Gray(channel) => Some(channel),
            Self::Rgb { .. } => None,
        }
    }

    /// Returns the red, green and blue channels; all `None` for a gray selection.
    pub fn rgb(&self) -> [Option<&SelectedChannel>; 3] {
        match self {
            Self::Gray(_) => [None, None, None],
            Self::Rgb { red, green, blue } => [red.as_ref(), green.as_ref(), blue.as_ref()],
        }
    }
}

/// How the color map interpolates between entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMapKind {
    /// Linear interpolation between entries
    #[default]
    Ramp,
    /// Constant color per interval
    Intervals,
    /// Exact value matches only
    Values,
}

impl FromStr for ColorMapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ramp" => Ok(Self::Ramp),
            "intervals" => Ok(Self::Intervals),
            "values" => Ok(Self::Values),
            _ => Err(format!(
                "invalid color map type `{s}`, valid values: ramp, intervals, values"
            )),
        }
    }
}

/// One stop of a color map.
///
/// Entries are kept in declaration order, which is expected to follow
/// increasing quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMapEntry {
    label: Option<String>,
    color: Option<Expression>,
    opacity: Option<Expression>,
    quantity: Option<Expression>,
}

impl ColorMapEntry {
    pub fn new(
        label: Option<String>,
        color: Option<Expression>,
        opacity: Option<Expression>,
        quantity: Option<Expression>,
    ) -> Self {
        Self {
            label,
            color,
            opacity,
            quantity,
        }
    }

    /// Returns the legend label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<&Expression> {
        self.color.as_ref()
    }

    pub fn opacity(&self) -> Option<&Expression> {
        self.opacity.as_ref()
    }

    /// Returns the raster value this stop applies at.
    pub fn quantity(&self) -> Option<&Expression> {
        self.quantity.as_ref()
    }
}

/// Mapping from raster values to colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    kind: ColorMapKind,
    extended_colors: bool,
    entries: Vec<ColorMapEntry>,
}

impl ColorMap {
    pub fn new(kind: ColorMapKind, extended_colors: bool, entries: Vec<ColorMapEntry>) -> Self {
        Self {
            kind,
            extended_colors,
            entries,
        }
    }

    pub fn kind(&self) -> ColorMapKind {
        self.kind
    }

    /// Returns `true` when more than 256 entries are allowed.
    pub fn extended_colors(&self) -> bool {
        self.extended_colors
    }

    /// Returns the stops in declaration order.
    pub fn entries(&self) -> &[ColorMapEntry] {
        &self.entries
    }
}

/// Hill shading applied to an elevation raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedRelief {
    brightness_only: bool,
    relief_factor: Option<Expression>,
}

impl ShadedRelief {
    pub fn new(brightness_only: bool, relief_factor: Option<Expression>) -> Self {
        Self {
            brightness_only,
            relief_factor,
        }
    }

    /// Returns `true` when shading only adjusts brightness, keeping hue.
    pub fn brightness_only(&self) -> bool {
        self.brightness_only
    }

    /// Returns the exaggeration of the relief.
    pub fn relief_factor(&self) -> Option<&Expression> {
        self.relief_factor.as_ref()
    }
}

/// How overlapping rasters are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapBehavior {
    /// Last raster wins
    #[default]
    LatestOnTop,
    /// First raster wins
    EarliestOnTop,
    /// Pixel values are averaged
    Average,
    /// An arbitrary raster wins per pixel
    Random,
}

impl FromStr for OverlapBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LATEST_ON_TOP" => Ok(Self::LatestOnTop),
            "EARLIEST_ON_TOP" => Ok(Self::EarliestOnTop),
            "AVERAGE" => Ok(Self::Average),
            "RANDOM" => Ok(Self::Random),
            _ => Err(format!(
                "invalid overlap behavior `{s}`, valid values: LATEST_ON_TOP, EARLIEST_ON_TOP, AVERAGE, RANDOM"
            )),
        }
    }
}
