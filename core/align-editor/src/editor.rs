use std::fmt;

use align_graph::{EdgeKey, GraphEdge};
use align_protocol::{LinkKey, NodeColor, NodeId};

use crate::session::Session;

/// Pointer input already resolved to the node under the cursor, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click(Option<NodeId>),
    DoubleClick(Option<NodeId>),
}

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// First endpoint remembered.
    Selected(NodeId),
    /// Click on empty space dropped the pending endpoint.
    SelectionCleared,
    /// Both endpoints were in the same layer.
    SameLayer,
    Linked(LinkKey),
    Unlinked(LinkKey),
    Marked(NodeId),
    Unmarked(NodeId),
    /// Unknown node; nothing changed.
    Ignored,
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Selected(node) => write!(f, "selected {node}"),
            EditOutcome::SelectionCleared => write!(f, "selection cleared"),
            EditOutcome::SameLayer => write!(f, "same layer, nothing linked"),
            EditOutcome::Linked(key) => write!(f, "linked {key}"),
            EditOutcome::Unlinked(key) => write!(f, "unlinked {key}"),
            EditOutcome::Marked(node) => write!(f, "marked {node} unaligned"),
            EditOutcome::Unmarked(node) => write!(f, "unmarked {node}"),
            EditOutcome::Ignored => write!(f, "ignored"),
        }
    }
}

impl Session {
    pub fn handle(&mut self, event: PointerEvent) -> EditOutcome {
        match event {
            PointerEvent::Click(target) => self.click(target),
            PointerEvent::DoubleClick(Some(node)) => self.double_click(node),
            PointerEvent::DoubleClick(None) => EditOutcome::Ignored,
        }
    }

    /// Two clicks on nodes of different layers toggle the link between them.
    pub fn click(&mut self, target: Option<NodeId>) -> EditOutcome {
        let Some(node) = target else {
            self.pending = None;
            return EditOutcome::SelectionCleared;
        };

        let Some(first) = self.pending.take() else {
            self.pending = Some(node);
            return EditOutcome::Selected(node);
        };

        if first.layer == node.layer {
            tracing::debug!(%first, second = %node, "same-layer pair rejected");
            return EditOutcome::SameLayer;
        }

        self.toggle_link(first, node)
    }

    /// Add the link between `a` and `b` or remove it if it exists.
    ///
    /// Adding highlights both endpoints and clears their unaligned markers.
    /// Removing only deletes the link.
    pub fn toggle_link(&mut self, a: NodeId, b: NodeId) -> EditOutcome {
        let Some(key) = LinkKey::between(a, b) else {
            return EditOutcome::SameLayer;
        };

        if !self.is_known(a) || !self.is_known(b) {
            tracing::debug!(link = %key, "link to unknown node ignored");
            return EditOutcome::Ignored;
        }

        let edge_key = EdgeKey::Link(key);
        if self.graph.has_edge(&edge_key) {
            self.graph.remove_edge(&edge_key);
            self.links.retain(|k| *k != key);
            return EditOutcome::Unlinked(key);
        }

        if let Err(err) = self.graph.add_edge(GraphEdge::link(key)) {
            tracing::debug!(link = %key, %err, "link not drawn");
            return EditOutcome::Ignored;
        }
        self.links.push(key);

        for end in [key.top_node(), key.bottom_node()] {
            if let Err(err) = self.graph.set_node_color(end, NodeColor::Highlight) {
                tracing::debug!(node = %end, %err, "endpoint not highlighted");
            }
            self.unaligned.remove(&end);
        }

        EditOutcome::Linked(key)
    }

    /// Toggle the unaligned marker of a token.
    ///
    /// Decided by the node color, so double-clicking a linked token resets
    /// its color without touching the link.
    pub fn double_click(&mut self, node: NodeId) -> EditOutcome {
        let Some(color) = self.graph.get_node(node).map(|n| n.color) else {
            return EditOutcome::Ignored;
        };

        if color == NodeColor::Highlight {
            if let Err(err) = self.graph.set_node_color(node, NodeColor::Default) {
                tracing::debug!(%node, %err, "color not reset");
            }
            self.unaligned.remove(&node);
            EditOutcome::Unmarked(node)
        } else {
            self.mark_unaligned(node);
            EditOutcome::Marked(node)
        }
    }

    /// Set the unaligned marker (no toggle). Unknown ids are ignored.
    pub fn mark_unaligned(&mut self, node: NodeId) -> bool {
        if !self.is_known(node) || self.graph.set_node_color(node, NodeColor::Highlight).is_err() {
            tracing::debug!(%node, "marker on unknown node ignored");
            return false;
        }
        self.unaligned.insert(node);
        true
    }

    /// Remove every alignment link. Markers and colors stay as they are.
    pub fn clear_links(&mut self) -> usize {
        let removed = self.links.len();
        for key in self.links.drain(..) {
            self.graph.remove_edge(&EdgeKey::Link(key));
        }
        removed
    }

    /// Reset every node to the default color and drop all markers. Links stay.
    pub fn clear_markers(&mut self) {
        self.graph.reset_colors(NodeColor::Default);
        self.unaligned.clear();
    }
}
