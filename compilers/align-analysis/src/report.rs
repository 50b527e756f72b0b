use std::collections::{BTreeMap, HashMap};

use align_protocol::SentenceRecord;

use crate::classify::AlignmentClasses;
use crate::tree::{AnalysisError, DependencyTree};

pub const BOTH_UNALIGNED: &str = "Both endpoints unaligned";
pub const ONE_UNALIGNED: &str = "One endpoint unaligned";
pub const COLLAPSED: &str = "Nodes collapsed";

/// A verified sentence pair ready for analysis.
#[derive(Debug)]
pub struct AnalysedSentence {
    pub source: DependencyTree,
    pub target: DependencyTree,
    pub classes: AlignmentClasses,
}

impl AnalysedSentence {
    pub fn from_record(record: &SentenceRecord) -> Result<Self, AnalysisError> {
        Ok(Self {
            source: DependencyTree::parse(&record.source_parse)?,
            target: DependencyTree::parse(&record.target_parse)?,
            classes: AlignmentClasses::classify(&record.alignment),
        })
    }
}

/// Examples of a source path grouped by what it maps to in the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    /// Target path, or one of [`BOTH_UNALIGNED`], [`ONE_UNALIGNED`], [`COLLAPSED`].
    pub counterpart: String,
    pub examples: Vec<String>,
}

/// Sentence text with the given tokens wrapped in brackets.
fn marked_text(tree: &DependencyTree, marked: &[u32]) -> String {
    tree.tokens()
        .iter()
        .map(|t| {
            if marked.contains(&t.ordinal) {
                format!("[{}]", t.form)
            } else {
                t.form.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where every source token pair joined by `path` (directionless, e.g.
/// `nsubj` or `nsubj->obj`) ends up in the target.
///
/// Pairs touching a one-to-many source token are left out. Groups come
/// largest first.
pub fn edge_label_report<'a>(
    sentences: impl IntoIterator<Item = &'a AnalysedSentence>,
    path: &str,
) -> Vec<ReportGroup> {
    let mut groups: Vec<ReportGroup> = Vec::new();

    for (n, sentence) in sentences.into_iter().enumerate() {
        let classes = &sentence.classes;
        let counterparts = classes.source_counterparts();
        let unaligned = |o: &u32| classes.unaligned_source.contains(o);
        let ordinals: Vec<u32> = sentence.source.tokens().iter().map(|t| t.ordinal).collect();

        for (i, head) in ordinals.iter().enumerate() {
            for tail in &ordinals[i + 1..] {
                match sentence.source.path(*head, *tail) {
                    Ok(p) if p.directionless() == path => {}
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::debug!(sentence = n + 1, %err, "source pair skipped");
                        continue;
                    }
                }
                if classes.one_to_many_source.contains_key(head) || classes.one_to_many_source.contains_key(tail) {
                    continue;
                }

                let (counterpart, marked) = match (counterparts.get(head), counterparts.get(tail)) {
                    _ if unaligned(head) && unaligned(tail) => (BOTH_UNALIGNED.to_string(), Vec::new()),
                    (None, Some(&t)) if unaligned(head) => (ONE_UNALIGNED.to_string(), vec![t]),
                    (Some(&h), None) if unaligned(tail) => (ONE_UNALIGNED.to_string(), vec![h]),
                    (Some(&h), Some(&t)) if h == t => (COLLAPSED.to_string(), vec![h]),
                    (Some(&h), Some(&t)) => match sentence.target.path(h, t) {
                        Ok(p) => (p.directionless(), vec![h, t]),
                        Err(err) => {
                            tracing::debug!(sentence = n + 1, %err, "target pair skipped");
                            continue;
                        }
                    },
                    _ => {
                        tracing::debug!(sentence = n + 1, head, tail, "endpoint missing from the alignment");
                        continue;
                    }
                };

                let example = format!(
                    "{} -> {}",
                    marked_text(&sentence.source, &[*head, *tail]),
                    marked_text(&sentence.target, &marked)
                );
                match groups.iter_mut().find(|g| g.counterpart == counterpart) {
                    Some(group) => group.examples.push(example),
                    None => groups.push(ReportGroup {
                        counterpart,
                        examples: vec![example],
                    }),
                }
            }
        }
    }

    groups.sort_by(|a, b| b.examples.len().cmp(&a.examples.len()));
    groups
}

/// How one source relation is rendered in the target.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStats {
    pub relation: String,
    pub count: usize,
    /// Shannon entropy (bits) of the target paths.
    pub entropy: f64,
    /// Up to three most frequent target paths with their probability.
    pub top: Vec<(String, f64)>,
}

/// Counts, for aligned token pairs joined by a single source arc, the
/// target path between their counterparts.
#[derive(Debug, Default)]
pub struct PathCounter {
    counts: BTreeMap<(String, String), usize>,
    skip_target_pos: Vec<String>,
}

impl PathCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore pairs whose target token has this part of speech.
    pub fn skip_target_pos(mut self, upos: impl Into<String>) -> Self {
        self.skip_target_pos.push(upos.into());
        self
    }

    fn skipped(&self, tree: &DependencyTree, ordinal: u32) -> bool {
        tree.token(ordinal)
            .is_some_and(|t| self.skip_target_pos.contains(&t.upos))
    }

    pub fn add(&mut self, sentence: &AnalysedSentence) -> Result<(), AnalysisError> {
        let links = sentence
            .classes
            .representative_links(&sentence.source, &sentence.target)?;

        for (i, &(s1, t1)) in links.iter().enumerate() {
            for &(s2, t2) in &links[i + 1..] {
                if self.skipped(&sentence.target, t1) || self.skipped(&sentence.target, t2) {
                    continue;
                }
                let source_path = sentence.source.path(s1, s2)?;
                if source_path.len() != 1 {
                    continue;
                }
                let target_path = sentence.target.path(t1, t2)?;
                *self
                    .counts
                    .entry((source_path.directionless(), target_path.directionless()))
                    .or_default() += 1;
            }
        }
        Ok(())
    }

    pub fn count(&self, relation: &str, target_path: &str) -> usize {
        self.counts
            .get(&(relation.to_string(), target_path.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// One row per source relation, most frequent first.
    pub fn stats(&self) -> Vec<PathStats> {
        let mut by_relation: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
        for ((relation, target), &count) in &self.counts {
            by_relation
                .entry(relation.as_str())
                .or_default()
                .push((target.as_str(), count));
        }

        let mut stats: Vec<PathStats> = by_relation
            .into_iter()
            .map(|(relation, mut targets)| {
                let total: usize = targets.iter().map(|(_, c)| c).sum();
                let entropy: f64 = targets
                    .iter()
                    .map(|&(_, c)| {
                        let p = c as f64 / total as f64;
                        p * (1.0 / p).log2()
                    })
                    .sum();

                targets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
                let top = targets
                    .iter()
                    .take(3)
                    .map(|&(path, c)| (path.to_string(), c as f64 / total as f64))
                    .collect();

                PathStats {
                    relation: relation.to_string(),
                    count: total,
                    entropy,
                    top,
                }
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.relation.cmp(&b.relation)));
        stats
    }
}
