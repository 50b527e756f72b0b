use std::collections::{HashMap, HashSet};

use align_parser::corpus::{aligner_line, key_blocks};
use align_protocol::SentenceRef;
use anyhow::{bail, Result};

use crate::store::StoredSentence;

/// Source and target blocks paired by (document id, sentence id), in source order.
fn pair_blocks<'a>(source: &'a str, target: &'a str) -> Result<Vec<(SentenceRef, &'a str, &'a str)>> {
    let source_blocks = key_blocks(source);
    unique_keys(&source_blocks, "source")?;

    let target_blocks = key_blocks(target);
    unique_keys(&target_blocks, "target")?;
    let target_blocks: HashMap<SentenceRef, &str> = target_blocks.into_iter().collect();

    if source_blocks.len() != target_blocks.len() {
        bail!(
            "source has {} sentences, target has {}",
            source_blocks.len(),
            target_blocks.len()
        );
    }

    source_blocks
        .into_iter()
        .map(|(key, src)| match target_blocks.get(&key) {
            Some(tgt) => Ok((key, src, *tgt)),
            None => bail!(
                "non-aligned sentence ids: {}/{} has no target sentence",
                key.document_id,
                key.sentence_id
            ),
        })
        .collect()
}

fn unique_keys(blocks: &[(SentenceRef, &str)], side: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for (key, _) in blocks {
        if !seen.insert(key) {
            bail!(
                "duplicate sentence id {}/{} in the {side} file",
                key.document_id,
                key.sentence_id
            );
        }
    }
    Ok(())
}

/// Sentences for a new corpus. `alignments` holds one pharaoh line per
/// source sentence; `None` leaves every alignment empty.
pub fn build_corpus(source: &str, target: &str, alignments: Option<&str>) -> Result<Vec<StoredSentence>> {
    let pairs = pair_blocks(source, target)?;

    let lines: Vec<&str> = match alignments {
        Some(text) => text.trim().lines().collect(),
        None => vec![""; pairs.len()],
    };
    if lines.len() != pairs.len() {
        bail!("{} alignment lines for {} sentences", lines.len(), pairs.len());
    }

    Ok(pairs
        .into_iter()
        .zip(lines)
        .map(|((key, src, tgt), alignment)| StoredSentence {
            document_id: key.document_id,
            sentence_id: key.sentence_id,
            source: src.to_string(),
            target: tgt.to_string(),
            alignment: alignment.trim().to_string(),
            verified: false,
        })
        .collect())
}

/// Input lines for an external word aligner, in source order.
pub fn aligner_input(source: &str, target: &str) -> Result<Vec<String>> {
    Ok(pair_blocks(source, target)?
        .into_iter()
        .map(|(_, src, tgt)| aligner_line(src, tgt))
        .collect())
}
