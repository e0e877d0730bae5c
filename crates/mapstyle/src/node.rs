//! Builder node storage.
//!
//! Every builder handle points at one [`Node`] in a shared [`Arena`]. A node
//! carries a tri-state [`State`] over its own scalar fields plus the ids of the
//! child nodes it owns. The set of node kinds is closed: one kind per value
//! type in the descriptor tree.

use std::fmt;

use mapstyle_core::factory::StyleFactory;

use crate::{
    arena::{Arena, NodeId},
    builder::{basic, fill, graphic, layer, raster, rule, stroke, symbolizer, text},
};

/// Population status of a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The builder yields nothing.
    Unset,
    /// Every field holds the factory default.
    Default,
    /// At least one field was set by the caller.
    Explicit,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Default => write!(f, "default"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

/// Fields of a node, present only while the node is populated.
#[derive(Debug, Clone)]
pub(crate) enum State<F> {
    Unset,
    Default(F),
    Explicit(F),
}

impl<F> Default for State<F> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<F> State<F> {
    pub(crate) fn new(status: Status, fields: F) -> Self {
        match status {
            Status::Unset => Self::Unset,
            Status::Default => Self::Default(fields),
            Status::Explicit => Self::Explicit(fields),
        }
    }

    pub(crate) fn status(&self) -> Status {
        match self {
            Self::Unset => Status::Unset,
            Self::Default(_) => Status::Default,
            Self::Explicit(_) => Status::Explicit,
        }
    }

    pub(crate) fn fields(&self) -> Option<&F> {
        match self {
            Self::Unset => None,
            Self::Default(fields) | Self::Explicit(fields) => Some(fields),
        }
    }

    /// Promotes populated fields to [`State::Explicit`] and returns them.
    pub(crate) fn explicit_mut(&mut self) -> Option<&mut F> {
        *self = match std::mem::take(self) {
            Self::Unset => Self::Unset,
            Self::Default(fields) | Self::Explicit(fields) => Self::Explicit(fields),
        };
        match self {
            Self::Explicit(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Typed access to one variant of [`Node`].
pub(crate) trait Variant: Sized {
    const KIND: NodeKind;

    fn from_node(node: &Node) -> Option<&Self>;

    fn from_node_mut(node: &mut Node) -> Option<&mut Self>;

    fn into_node(self) -> Node;
}

/// Behavior every node kind provides to the builder protocol.
pub(crate) trait NodeData: Variant + Default {
    /// Scalar fields held while populated.
    type Fields;

    /// The value type this node builds.
    type Output;

    fn state(&self) -> &State<Self::Fields>;

    fn state_mut(&mut self) -> &mut State<Self::Fields>;

    /// Ids of every owned child, single slots and lists alike.
    fn children(&self) -> Vec<NodeId>;

    fn default_value(factory: &dyn StyleFactory) -> Self::Output;

    /// Copies `value` into the node at `id` and recreates its children from
    /// the parts of `value`.
    fn restore(arena: &mut Arena, id: NodeId, value: &Self::Output, status: Status);

    /// Builds the output from populated fields and the current children.
    fn assemble(&self, fields: &Self::Fields, arena: &Arena) -> Self::Output;
}

/// Implements [`NodeData::state`] and [`NodeData::state_mut`] for a node
/// whose tri-state lives in a `state` field.
macro_rules! node_state {
    ($fields:ty) => {
        fn state(&self) -> &$crate::node::State<$fields> {
            &self.state
        }

        fn state_mut(&mut self) -> &mut $crate::node::State<$fields> {
            &mut self.state
        }
    };
}

pub(crate) use node_state;

macro_rules! node_kinds {
    ($($kind:ident => $node:path, $name:literal;)*) => {
        /// Identifies the value type a node builds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub(crate) enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub(crate) fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => $name,)*
                }
            }
        }

        impl fmt::Display for NodeKind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        pub(crate) enum Node {
            $($kind($node),)*
        }

        impl Node {
            pub(crate) fn kind(&self) -> NodeKind {
                match self {
                    $(Self::$kind(_) => NodeKind::$kind,)*
                }
            }

            pub(crate) fn status(&self) -> Status {
                match self {
                    $(Self::$kind(node) => node.state().status(),)*
                }
            }

            pub(crate) fn unset(&mut self) {
                match self {
                    $(Self::$kind(node) => *node.state_mut() = State::Unset,)*
                }
            }

            pub(crate) fn children(&self) -> Vec<NodeId> {
                match self {
                    $(Self::$kind(node) => node.children(),)*
                }
            }
        }

        $(
            impl Variant for $node {
                const KIND: NodeKind = NodeKind::$kind;

                fn from_node(node: &Node) -> Option<&Self> {
                    match node {
                        Node::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_node_mut(node: &mut Node) -> Option<&mut Self> {
                    match node {
                        Node::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_node(self) -> Node {
                    Node::$kind(self)
                }
            }
        )*
    };
}

node_kinds! {
    AnchorPoint => basic::AnchorPointNode, "anchor point";
    Displacement => basic::DisplacementNode, "displacement";
    Description => basic::DescriptionNode, "description";
    Extent => basic::ExtentNode, "extent";
    ShadedRelief => raster::ShadedReliefNode, "shaded relief";
    ContrastEnhancement => raster::ContrastEnhancementNode, "contrast enhancement";
    ColorMapEntry => raster::ColorMapEntryNode, "color map entry";
    ColorMap => raster::ColorMapNode, "color map";
    SelectedChannel => raster::SelectedChannelNode, "selected channel";
    ChannelSelection => raster::ChannelSelectionNode, "channel selection";
    ExternalMark => graphic::ExternalMarkNode, "external mark";
    ColorReplacement => graphic::ColorReplacementNode, "color replacement";
    Mark => graphic::MarkNode, "mark";
    ExternalGraphic => graphic::ExternalGraphicNode, "external graphic";
    Graphic => graphic::GraphicNode, "graphic";
    Fill => fill::FillNode, "fill";
    Stroke => stroke::StrokeNode, "stroke";
    Halo => text::HaloNode, "halo";
    Font => text::FontNode, "font";
    PointPlacement => text::PointPlacementNode, "point placement";
    LinePlacement => text::LinePlacementNode, "line placement";
    PointSymbolizer => symbolizer::PointSymbolizerNode, "point symbolizer";
    LineSymbolizer => symbolizer::LineSymbolizerNode, "line symbolizer";
    PolygonSymbolizer => symbolizer::PolygonSymbolizerNode, "polygon symbolizer";
    TextSymbolizer => symbolizer::TextSymbolizerNode, "text symbolizer";
    RasterSymbolizer => symbolizer::RasterSymbolizerNode, "raster symbolizer";
    Rule => rule::RuleNode, "rule";
    FeatureTypeStyle => rule::FeatureTypeStyleNode, "feature type style";
    Style => layer::StyleNode, "style";
    FeatureTypeConstraint => layer::FeatureTypeConstraintNode, "feature type constraint";
    NamedLayer => layer::NamedLayerNode, "named layer";
    UserLayer => layer::UserLayerNode, "user layer";
    StyledLayerDescriptor => layer::StyledLayerDescriptorNode, "styled layer descriptor";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_explicit_mut_promotes_default() {
        let mut state = State::new(Status::Default, 1);
        assert_eq!(state.status(), Status::Default);

        if let Some(value) = state.explicit_mut() {
            *value = 2;
        }
        assert_eq!(state.status(), Status::Explicit);
        assert_eq!(state.fields(), Some(&2));
    }

    #[test]
    fn test_state_explicit_mut_keeps_unset() {
        let mut state: State<i32> = State::Unset;
        assert!(state.explicit_mut().is_none());
        assert_eq!(state.status(), Status::Unset);
        assert_eq!(State::new(Status::Unset, 5).fields(), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Explicit.to_string(), "explicit");
        assert_eq!(NodeKind::ChannelSelection.to_string(), "channel selection");
    }
}
