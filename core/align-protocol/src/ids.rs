use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One of the two parallel parses shown by the editor.
///
/// `Top` holds the source sentence and `Bottom` its translation. The
/// declaration order is the rank used by [`NodeId`]'s ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Layer {
    Top = 0,
    Bottom = 1,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Top, Layer::Bottom];

    /// Prefix used when a node id is rendered as a string (`top3`, `bottom1`).
    pub const fn prefix(self) -> &'static str {
        match self {
            Layer::Top => "top",
            Layer::Bottom => "bottom",
        }
    }

    pub const fn other(self) -> Layer {
        match self {
            Layer::Top => Layer::Bottom,
            Layer::Bottom => Layer::Top,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A token node: layer plus its 1-based ordinal in the parse.
///
/// Ordered by layer rank first, then ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct NodeId {
    pub layer: Layer,
    pub ordinal: u32,
}

impl NodeId {
    pub const fn new(layer: Layer, ordinal: u32) -> Self {
        Self { layer, ordinal }
    }

    pub const fn top(ordinal: u32) -> Self {
        Self::new(Layer::Top, ordinal)
    }

    pub const fn bottom(ordinal: u32) -> Self {
        Self::new(Layer::Bottom, ordinal)
    }

    /// Node addressed by a 0-based pharaoh index. `None` if the ordinal
    /// would not fit in a `u32`.
    pub fn from_pharaoh(layer: Layer, index: u32) -> Option<Self> {
        Some(Self::new(layer, index.checked_add(1)?))
    }

    /// 0-based pharaoh index of this node. `None` for the virtual root (ordinal 0).
    pub fn pharaoh_index(&self) -> Option<u32> {
        self.ordinal.checked_sub(1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.layer.prefix(), self.ordinal)
    }
}

// Display is written by hand: thiserror 1.0 needs std and this crate is no_std.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeIdParseError {
    UnknownLayer,
    BadOrdinal,
}

impl fmt::Display for NodeIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIdParseError::UnknownLayer => write!(f, "node id must start with 'top' or 'bottom'"),
            NodeIdParseError::BadOrdinal => write!(f, "node id ordinal is not a number"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NodeIdParseError {}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (layer, rest) = Layer::ALL
            .iter()
            .find_map(|layer| s.strip_prefix(layer.prefix()).map(|rest| (*layer, rest)))
            .ok_or(NodeIdParseError::UnknownLayer)?;

        let ordinal = rest.parse().map_err(|_| NodeIdParseError::BadOrdinal)?;
        Ok(Self::new(layer, ordinal))
    }
}

/// Canonical identity of an alignment link: the top endpoint always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LinkKey {
    pub top: u32,
    pub bottom: u32,
}

impl LinkKey {
    pub const fn new(top: u32, bottom: u32) -> Self {
        Self { top, bottom }
    }

    /// Link between two nodes in either order. Same-layer pairs have no link.
    pub fn between(a: NodeId, b: NodeId) -> Option<Self> {
        match (a.layer, b.layer) {
            (Layer::Top, Layer::Bottom) => Some(Self::new(a.ordinal, b.ordinal)),
            (Layer::Bottom, Layer::Top) => Some(Self::new(b.ordinal, a.ordinal)),
            _ => None,
        }
    }

    /// Link for a 0-based pharaoh pair `i-j`. `None` on ordinal overflow.
    pub fn from_pharaoh(source: u32, target: u32) -> Option<Self> {
        Some(Self::new(source.checked_add(1)?, target.checked_add(1)?))
    }

    /// 0-based pharaoh pair, or `None` if an endpoint is the virtual root.
    pub fn to_pharaoh(&self) -> Option<(u32, u32)> {
        Some((self.top.checked_sub(1)?, self.bottom.checked_sub(1)?))
    }

    pub const fn top_node(&self) -> NodeId {
        NodeId::top(self.top)
    }

    pub const fn bottom_node(&self) -> NodeId {
        NodeId::bottom(self.bottom)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        node == self.top_node() || node == self.bottom_node()
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.top_node(), self.bottom_node())
    }
}

/// Identity of a dependency arc inside one parse (dependent points at its head).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct DependencyKey {
    pub dependent: NodeId,
    pub head: NodeId,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.dependent, self.head)
    }
}
