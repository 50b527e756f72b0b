use std::collections::{BTreeSet, HashSet};

use align_graph::GraphStore;
use align_parser::{parse_block, ParseError};
use align_protocol::{Layer, LayoutConfig, LinkKey, NodeId};

use crate::loader::load_layer;

/// Editing state for the sentence pair on screen.
///
/// Owns the graph, the ids produced by the last load, the alignment links
/// in the order they were made, the unaligned markers and the pending
/// first endpoint of a click pair.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) graph: GraphStore,
    pub(crate) known: HashSet<NodeId>,
    pub(crate) links: Vec<LinkKey>,
    pub(crate) unaligned: BTreeSet<NodeId>,
    pub(crate) pending: Option<NodeId>,
    pub(crate) layout: LayoutConfig,
}

/// Token counts used when reviewing a sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentSummary {
    pub tokens: usize,
    pub links: usize,
    pub aligned: usize,
    pub unaligned: usize,
    pub untouched: usize,
}

impl Session {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Replace the current sentence pair.
    ///
    /// Both parses are read before anything is cleared, so a parse error
    /// leaves the previous sentence in place.
    pub fn load(&mut self, source: &str, target: &str, alignment: &str) -> Result<(), ParseError> {
        let top_rows = parse_block(source)?;
        let bottom_rows = parse_block(target)?;

        self.reset();
        load_layer(self, &top_rows, Layer::Top);
        load_layer(self, &bottom_rows, Layer::Bottom);
        self.decode_alignment(alignment);

        tracing::debug!(
            tokens = self.graph.node_count(),
            links = self.links.len(),
            unaligned = self.unaligned.len(),
            "sentence pair loaded"
        );
        Ok(())
    }

    /// Forget everything about the current sentence.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.known.clear();
        self.links.clear();
        self.unaligned.clear();
        self.pending = None;
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn is_known(&self, id: NodeId) -> bool {
        self.known.contains(&id)
    }

    /// Ids registered for one layer, in ordinal order.
    pub fn known_ids(&self, layer: Layer) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.known.iter().copied().filter(|id| id.layer == layer).collect();
        ids.sort();
        ids
    }

    /// Alignment links in creation order.
    pub fn links(&self) -> &[LinkKey] {
        &self.links
    }

    pub fn has_link(&self, key: LinkKey) -> bool {
        self.links.contains(&key)
    }

    pub fn unaligned(&self) -> &BTreeSet<NodeId> {
        &self.unaligned
    }

    pub fn is_unaligned(&self, id: NodeId) -> bool {
        self.unaligned.contains(&id)
    }

    /// First endpoint of a click pair still waiting for its second.
    pub fn pending(&self) -> Option<NodeId> {
        self.pending
    }

    pub fn summary(&self) -> AlignmentSummary {
        let linked: HashSet<NodeId> = self
            .links
            .iter()
            .flat_map(|key| [key.top_node(), key.bottom_node()])
            .collect();

        let tokens = self.known.len();
        let aligned = self.known.iter().filter(|id| linked.contains(id)).count();
        let unaligned = self
            .known
            .iter()
            .filter(|id| !linked.contains(id) && self.unaligned.contains(id))
            .count();

        AlignmentSummary {
            tokens,
            links: self.links.len(),
            aligned,
            unaligned,
            untouched: tokens - aligned - unaligned,
        }
    }
}
