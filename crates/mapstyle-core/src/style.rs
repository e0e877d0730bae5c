//! The styled layer descriptor value tree.
//!
//! Every type in this module is an immutable value: fields are private,
//! exposed through getters, and set once at construction. Values are usually
//! produced by the builders in the `mapstyle` crate through a
//! [`StyleFactory`](crate::factory::StyleFactory), but each type also offers a
//! public `new` constructor.
//!
//! # Overview
//!
//! ```text
//! StyledLayerDescriptor
//! └── StyledLayer (Named | User)
//!     ├── FeatureTypeConstraint ── Extent
//!     └── Style
//!         └── FeatureTypeStyle
//!             └── Rule
//!                 └── Symbolizer (Point | Line | Polygon | Text | Raster)
//!                     ├── Stroke, Fill, Graphic (Mark | ExternalGraphic), Halo, Font
//!                     ├── LabelPlacement (Point | Line)
//!                     └── ChannelSelection, ColorMap, ContrastEnhancement, ShadedRelief
//! ```
//!
//! Variant families (symbolizers, graphical symbols, label placements, channel
//! selections, layers) are closed enums.

mod basic;
mod fill;
mod graphic;
mod layer;
mod raster;
mod rule;
mod stroke;
mod symbolizer;
mod text;

pub use basic::{AnchorPoint, Description, Displacement, Extent, UnitOfMeasure, VendorOptions};
pub use fill::Fill;
pub use graphic::{ColorReplacement, ExternalGraphic, ExternalMark, Graphic, GraphicalSymbol, Mark};
pub use layer::{
    FeatureTypeConstraint, NamedLayer, Style, StyledLayer, StyledLayerDescriptor, UserLayer,
};
pub use raster::{
    ChannelSelection, ColorMap, ColorMapEntry, ColorMapKind, ContrastEnhancement, ContrastMethod,
    OverlapBehavior, SelectedChannel, ShadedRelief,
};
pub use rule::{FeatureTypeStyle, Rule, SemanticType};
pub use stroke::{LineCap, LineJoin, Stroke};
pub use symbolizer::{
    LineSymbolizer, PointSymbolizer, PolygonSymbolizer, RasterSymbolizer, Symbolizer,
    SymbolizerInfo, TextSymbolizer,
};
pub use text::{Font, FontStyle, FontWeight, Halo, LabelPlacement, LinePlacement, PointPlacement};
