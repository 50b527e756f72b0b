use std::collections::HashMap;

use align_protocol::{DependencyKey, LinkKey, NodeColor, NodeId};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Directed;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),
}

/// A rendered token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    pub id: NodeId,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub color: NodeColor,
}

/// Identity of any edge held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKey {
    Dependency(DependencyKey),
    Link(LinkKey),
}

impl EdgeKey {
    /// `(from, to)` endpoints. Dependencies point from dependent to head,
    /// links from the top token to the bottom token.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        match self {
            EdgeKey::Dependency(dep) => (dep.dependent, dep.head),
            EdgeKey::Link(link) => (link.top_node(), link.bottom_node()),
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKey::Dependency(dep) => write!(f, "{dep}"),
            EdgeKey::Link(link) => write!(f, "{link}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// Syntactic arc labelled with its relation (`nsubj`, `obl`, ...).
    Dependency { relation: String },
    /// Alignment link, drawn dashed and without arrows.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub key: EdgeKey,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn dependency(key: DependencyKey, relation: impl Into<String>) -> Self {
        Self {
            key: EdgeKey::Dependency(key),
            kind: EdgeKind::Dependency { relation: relation.into() },
        }
    }

    pub fn link(key: LinkKey) -> Self {
        Self {
            key: EdgeKey::Link(key),
            kind: EdgeKind::Link,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            EdgeKind::Dependency { relation } => Some(relation),
            EdgeKind::Link => None,
        }
    }

    pub fn is_dashed(&self) -> bool {
        matches!(self.kind, EdgeKind::Link)
    }
}

/// Nodes and edges of the sentence pair currently on screen.
///
/// Every write is an upsert keyed by id, so replaying the same content
/// leaves the store unchanged.
#[derive(Debug, Default)]
pub struct GraphStore {
    graph: StableGraph<TokenNode, GraphEdge, Directed>,
    node_map: HashMap<NodeId, NodeIndex>,
    edge_map: HashMap<EdgeKey, EdgeIndex>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything; used before a new sentence is drawn.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_map.clear();
        self.edge_map.clear();
    }

    pub fn add_node(&mut self, node: TokenNode) {
        match self.node_map.get(&node.id) {
            Some(&idx) => self.graph[idx] = node,
            None => {
                let id = node.id;
                let idx = self.graph.add_node(node);
                self.node_map.insert(id, idx);
            }
        }
    }

    /// Insert or replace an edge. Both endpoints must already be in the store.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        if let Some(&idx) = self.edge_map.get(&edge.key) {
            self.graph[idx] = edge;
            return Ok(());
        }

        let (from, to) = edge.key.endpoints();
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;

        let key = edge.key;
        let idx = self.graph.add_edge(from_idx, to_idx, edge);
        self.edge_map.insert(key, idx);
        Ok(())
    }

    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<GraphEdge> {
        let idx = self.edge_map.remove(key)?;
        self.graph.remove_edge(idx)
    }

    pub fn has_edge(&self, key: &EdgeKey) -> bool {
        self.edge_map.contains_key(key)
    }

    pub fn get_edge(&self, key: &EdgeKey) -> Option<&GraphEdge> {
        self.edge_map.get(key).map(|&idx| &self.graph[idx])
    }

    pub fn set_node_color(&mut self, id: NodeId, color: NodeColor) -> Result<(), GraphError> {
        let idx = self.index_of(id)?;
        self.graph[idx].color = color;
        Ok(())
    }

    /// Paint every node with the same color.
    pub fn reset_colors(&mut self, color: NodeColor) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for idx in indices {
            self.graph[idx].color = color;
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TokenNode> {
        self.node_map.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_map.contains_key(&id)
    }

    /// Nodes in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = &TokenNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in storage order; removed slots are reused.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex, GraphError> {
        self.node_map.get(&id).copied().ok_or(GraphError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, label: &str) -> TokenNode {
        TokenNode {
            id,
            label: label.to_string(),
            x: 0.0,
            y: 0.0,
            color: NodeColor::Default,
        }
    }

    fn sample() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(node(NodeId::top(1), "For"));
        store.add_node(node(NodeId::top(2), "those"));
        store.add_node(node(NodeId::bottom(1), "Для"));
        store
    }

    #[test]
    fn test_add_node_is_upsert() {
        let mut store = sample();
        store.add_node(node(NodeId::top(1), "for"));

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.get_node(NodeId::top(1)).map(|n| n.label.as_str()), Some("for"));
    }

    #[test]
    fn test_edge_lifecycle() {
        let mut store = sample();
        let key = EdgeKey::Link(LinkKey::new(1, 1));

        assert!(!store.has_edge(&key));
        store.add_edge(GraphEdge::link(LinkKey::new(1, 1))).unwrap();
        store.add_edge(GraphEdge::link(LinkKey::new(1, 1))).unwrap();
        assert!(store.has_edge(&key));
        assert_eq!(store.edge_count(), 1);

        let removed = store.remove_edge(&key).unwrap();
        assert!(removed.is_dashed());
        assert!(!store.has_edge(&key));
        assert_eq!(store.remove_edge(&key), None);
    }

    #[test]
    fn test_edge_to_unknown_node_is_rejected() {
        let mut store = sample();
        let dep = DependencyKey {
            dependent: NodeId::top(1),
            head: NodeId::top(9),
        };

        let err = store.add_edge(GraphEdge::dependency(dep, "case")).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId::top(9)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_edge_indices_survive_removal() {
        let mut store = sample();
        let dep = DependencyKey {
            dependent: NodeId::top(1),
            head: NodeId::top(2),
        };
        store.add_edge(GraphEdge::link(LinkKey::new(1, 1))).unwrap();
        store.add_edge(GraphEdge::dependency(dep, "case")).unwrap();

        store.remove_edge(&EdgeKey::Link(LinkKey::new(1, 1)));

        let edge = store.get_edge(&EdgeKey::Dependency(dep)).unwrap();
        assert_eq!(edge.label(), Some("case"));
    }

    #[test]
    fn test_colors() {
        let mut store = sample();
        store.set_node_color(NodeId::top(2), NodeColor::Highlight).unwrap();
        assert_eq!(store.get_node(NodeId::top(2)).unwrap().color, NodeColor::Highlight);

        assert!(store.set_node_color(NodeId::bottom(5), NodeColor::Highlight).is_err());

        store.reset_colors(NodeColor::Default);
        assert!(store.nodes().all(|n| n.color == NodeColor::Default));
    }

    #[test]
    fn test_clear() {
        let mut store = sample();
        store.add_edge(GraphEdge::link(LinkKey::new(2, 1))).unwrap();
        store.clear();

        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert!(store.get_node(NodeId::top(1)).is_none());
    }
}
