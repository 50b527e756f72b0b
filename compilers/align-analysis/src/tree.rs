use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use align_parser::{parse_block, ParseError, TokenRow};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("token {0} is not in the tree")]
    UnknownToken(u32),
    #[error("no path between tokens {from} and {to}")]
    Disconnected { from: u32, to: u32 },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Which way an arc is walked: towards the head (`Up`) or the dependent (`Down`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Up,
    Down,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Up => f.write_str("up"),
            Step::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub relation: String,
    pub step: Step,
}

/// Labelled arcs walked between two tokens, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DependencyPath(pub Vec<PathStep>);

impl DependencyPath {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Relations only, joined by `->` (`nsubj->obj`).
    pub fn directionless(&self) -> String {
        self.0
            .iter()
            .map(|s| s.relation.as_str())
            .collect::<Vec<_>>()
            .join("->")
    }
}

/// Renders `nsubj_up->obj_down`.
impl fmt::Display for DependencyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            write!(f, "{}_{}", step.relation, step.step)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeToken {
    pub ordinal: u32,
    pub form: String,
    pub upos: String,
}

/// A parse as a graph of every arc, `root` and `punct` included.
///
/// Arcs point from dependent to head. The virtual root is node 0.
#[derive(Debug, Default)]
pub struct DependencyTree {
    graph: Graph<u32, String, Directed>,
    index_map: HashMap<u32, NodeIndex>,
    tokens: Vec<TreeToken>,
}

impl DependencyTree {
    pub fn parse(block: &str) -> Result<Self, AnalysisError> {
        Ok(Self::from_rows(&parse_block(block)?))
    }

    pub fn from_rows(rows: &[TokenRow]) -> Self {
        let mut tree = Self::default();

        for row in rows {
            tree.node(row.ordinal);
            tree.tokens.push(TreeToken {
                ordinal: row.ordinal,
                form: row.form.clone(),
                upos: row.upos.clone(),
            });
        }
        for row in rows {
            let Some(head) = row.head else {
                continue;
            };
            let from = tree.node(row.ordinal);
            let to = tree.node(head);
            tree.graph.add_edge(from, to, row.relation.clone());
        }

        tree.tokens.sort_by_key(|t| t.ordinal);
        tree
    }

    fn node(&mut self, ordinal: u32) -> NodeIndex {
        *self
            .index_map
            .entry(ordinal)
            .or_insert_with(|| self.graph.add_node(ordinal))
    }

    fn index_of(&self, ordinal: u32) -> Result<NodeIndex, AnalysisError> {
        self.index_map
            .get(&ordinal)
            .copied()
            .ok_or(AnalysisError::UnknownToken(ordinal))
    }

    /// Tokens in ordinal order.
    pub fn tokens(&self) -> &[TreeToken] {
        &self.tokens
    }

    pub fn token(&self, ordinal: u32) -> Option<&TreeToken> {
        self.tokens.iter().find(|t| t.ordinal == ordinal)
    }

    fn neighbours(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &str, Step)> + '_ {
        let up = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().as_str(), Step::Up));
        let down = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.source(), e.weight().as_str(), Step::Down));
        up.chain(down)
    }

    /// Shortest labelled path between two tokens, walking arcs both ways.
    pub fn path(&self, from: u32, to: u32) -> Result<DependencyPath, AnalysisError> {
        let start = self.index_of(from)?;
        let goal = self.index_of(to)?;
        if start == goal {
            return Ok(DependencyPath::default());
        }

        let mut came_from: HashMap<NodeIndex, (NodeIndex, &str, Step)> = HashMap::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for (next, relation, step) in self.neighbours(current) {
                if !visited.insert(next) {
                    continue;
                }
                came_from.insert(next, (current, relation, step));

                if next == goal {
                    let mut steps = Vec::new();
                    let mut at = goal;
                    while let Some(&(prev, relation, step)) = came_from.get(&at) {
                        steps.push(PathStep {
                            relation: relation.to_string(),
                            step,
                        });
                        at = prev;
                    }
                    steps.reverse();
                    return Ok(DependencyPath(steps));
                }
                queue.push_back(next);
            }
        }

        Err(AnalysisError::Disconnected { from, to })
    }

    /// Number of arcs between the virtual root and a token.
    pub fn depth(&self, ordinal: u32) -> Result<usize, AnalysisError> {
        self.index_of(ordinal)?;
        Ok(self.path(0, ordinal)?.len())
    }

    /// The token closest to the root; the first one wins ties.
    pub fn shallowest(&self, ordinals: &[u32]) -> Result<Option<u32>, AnalysisError> {
        let mut best: Option<(usize, u32)> = None;
        for &ordinal in ordinals {
            let depth = self.depth(ordinal)?;
            if best.map_or(true, |(d, _)| depth < d) {
                best = Some((depth, ordinal));
            }
        }
        Ok(best.map(|(_, ordinal)| ordinal))
    }
}
