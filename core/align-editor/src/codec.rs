use std::collections::BTreeSet;

use align_parser::{format_alignment, parse_alignment, Entry};
use align_protocol::{Layer, LinkKey, NodeId};

use crate::editor::EditOutcome;
use crate::session::Session;

/// Pharaoh string for a set of links followed by the unaligned markers.
///
/// Links keep the given order; markers follow in node order (top layer first).
pub fn encode(links: &[LinkKey], unaligned: &BTreeSet<NodeId>) -> String {
    let pairs = links.iter().filter_map(|key| {
        let (i, j) = key.to_pharaoh()?;
        Some(Entry::Pair(i, j))
    });

    let markers = unaligned.iter().filter_map(|node| {
        let index = node.pharaoh_index()?;
        Some(match node.layer {
            Layer::Top => Entry::SourceOnly(index),
            Layer::Bottom => Entry::TargetOnly(index),
        })
    });

    let entries: Vec<Entry> = pairs.chain(markers).collect();
    format_alignment(&entries)
}

impl Session {
    /// Apply a stored alignment on top of the current graph.
    ///
    /// Pairs go through [`Session::toggle_link`], so a pair written twice
    /// cancels out. Entries naming unknown tokens are skipped.
    pub fn decode_alignment(&mut self, alignment: &str) {
        for entry in parse_alignment(alignment) {
            match entry {
                Entry::Pair(i, j) => {
                    let Some(key) = LinkKey::from_pharaoh(i, j) else {
                        tracing::debug!(%entry, "alignment index out of range");
                        continue;
                    };
                    if self.toggle_link(key.top_node(), key.bottom_node()) == EditOutcome::Ignored {
                        tracing::debug!(%entry, "alignment pair names an unknown token");
                    }
                }
                Entry::SourceOnly(i) => self.decode_marker(entry, Layer::Top, i),
                Entry::TargetOnly(j) => self.decode_marker(entry, Layer::Bottom, j),
            }
        }
    }

    fn decode_marker(&mut self, entry: Entry, layer: Layer, index: u32) {
        match NodeId::from_pharaoh(layer, index) {
            Some(node) => {
                self.mark_unaligned(node);
            }
            None => tracing::debug!(%entry, "alignment index out of range"),
        }
    }

    /// Current links and markers as a pharaoh string.
    pub fn encode_alignment(&self) -> String {
        encode(&self.links, &self.unaligned)
    }
}
