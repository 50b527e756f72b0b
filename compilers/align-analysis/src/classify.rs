use std::collections::{BTreeMap, HashMap, HashSet};

use align_parser::{parse_alignment, Entry};
use align_protocol::{Layer, LinkKey, NodeId};

use crate::tree::{AnalysisError, DependencyTree};

/// An alignment split by link shape. All positions are 1-based token ordinals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentClasses {
    pub unaligned_source: Vec<u32>,
    pub unaligned_target: Vec<u32>,
    /// Source tokens linked to several target tokens.
    pub one_to_many_source: BTreeMap<u32, Vec<u32>>,
    /// Target tokens linked to several source tokens, each of which has
    /// no other link.
    pub one_to_many_target: BTreeMap<u32, Vec<u32>>,
    /// `(source, target)` links whose endpoints have no other link.
    pub one_to_one: Vec<(u32, u32)>,
}

impl AlignmentClasses {
    /// Classify a pharaoh string. Malformed and repeated entries are skipped.
    pub fn classify(alignment: &str) -> Self {
        let mut classes = Self::default();
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for entry in parse_alignment(alignment) {
            match entry {
                Entry::Pair(i, j) => match LinkKey::from_pharaoh(i, j) {
                    Some(key) if seen.insert(key) => links.push(key),
                    Some(_) => {}
                    None => tracing::debug!(%entry, "alignment index out of range"),
                },
                Entry::SourceOnly(i) => push_marker(&mut classes.unaligned_source, Layer::Top, i),
                Entry::TargetOnly(j) => push_marker(&mut classes.unaligned_target, Layer::Bottom, j),
            }
        }

        let mut source_degree: HashMap<u32, usize> = HashMap::new();
        let mut target_degree: HashMap<u32, usize> = HashMap::new();
        for key in &links {
            *source_degree.entry(key.top).or_default() += 1;
            *target_degree.entry(key.bottom).or_default() += 1;
        }

        for key in links {
            if source_degree[&key.top] > 1 {
                classes.one_to_many_source.entry(key.top).or_default().push(key.bottom);
            } else if target_degree[&key.bottom] > 1 {
                classes.one_to_many_target.entry(key.bottom).or_default().push(key.top);
            } else {
                classes.one_to_one.push((key.top, key.bottom));
            }
        }

        classes
    }

    /// Target counterpart of each source token that has exactly one link.
    pub fn source_counterparts(&self) -> HashMap<u32, u32> {
        let mut counterparts: HashMap<u32, u32> = self.one_to_one.iter().copied().collect();
        for (&target, sources) in &self.one_to_many_target {
            for &source in sources {
                counterparts.insert(source, target);
            }
        }
        counterparts
    }

    /// One link per aligned token: one-to-many groups collapse to their
    /// token closest to the root. Sorted by source ordinal.
    pub fn representative_links(
        &self,
        source: &DependencyTree,
        target: &DependencyTree,
    ) -> Result<Vec<(u32, u32)>, AnalysisError> {
        let mut links = self.one_to_one.clone();

        for (&t, sources) in &self.one_to_many_target {
            if let Some(s) = source.shallowest(sources)? {
                links.push((s, t));
            }
        }
        for (&s, targets) in &self.one_to_many_source {
            if let Some(t) = target.shallowest(targets)? {
                links.push((s, t));
            }
        }

        links.sort_by_key(|&(s, _)| s);
        Ok(links)
    }
}

fn push_marker(markers: &mut Vec<u32>, layer: Layer, index: u32) {
    match NodeId::from_pharaoh(layer, index) {
        Some(node) if !markers.contains(&node.ordinal) => markers.push(node.ordinal),
        Some(_) => {}
        None => tracing::debug!(index, "alignment index out of range"),
    }
}
