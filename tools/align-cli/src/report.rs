use align_analysis::{edge_label_report, AnalysedSentence, PathCounter};
use align_editor::SentenceStore;
use anyhow::Result;

/// Verified sentences of a corpus. Pairs that fail to parse are skipped.
pub fn verified_sentences(store: &impl SentenceStore, corpus: &str) -> Result<Vec<AnalysedSentence>> {
    let mut sentences = Vec::new();

    for id in store.list_sentence_ids(corpus)? {
        let record = store.load_sentence(corpus, &id)?;
        if !record.verified {
            continue;
        }
        match AnalysedSentence::from_record(&record) {
            Ok(sentence) => sentences.push(sentence),
            Err(err) => {
                tracing::warn!(document = %id.document_id, sentence = %id.sentence_id, %err, "sentence left out of the report")
            }
        }
    }

    tracing::info!(corpus, verified = sentences.len(), "sentences loaded for analysis");
    Ok(sentences)
}

/// Target renderings of one source path, largest group first.
pub fn path_report(sentences: &[AnalysedSentence], path: &str) -> String {
    let mut out = String::new();
    for group in edge_label_report(sentences, path) {
        out.push_str(&format!("{}\t{}\n", group.counterpart, group.examples.len()));
        for example in &group.examples {
            out.push_str(&format!("    {example}\n"));
        }
    }
    out
}

/// Tab-separated path statistics, one row per single-arc source relation.
pub fn path_table(sentences: &[AnalysedSentence], skip_pos: &[String]) -> String {
    let mut counter = skip_pos
        .iter()
        .fold(PathCounter::new(), |counter, upos| counter.skip_target_pos(upos.as_str()));

    for (n, sentence) in sentences.iter().enumerate() {
        if let Err(err) = counter.add(sentence) {
            tracing::warn!(sentence = n + 1, %err, "sentence left out of the path counts");
        }
    }

    let mut out = String::from("path\tcount\tentropy\tpath1\tprob1\tpath2\tprob2\tpath3\tprob3\n");
    for row in counter.stats() {
        out.push_str(&format!("{}\t{}\t{:.4}", row.relation, row.count, row.entropy));
        for i in 0..3 {
            match row.top.get(i) {
                Some((path, prob)) => out.push_str(&format!("\t{path}\t{prob:.4}")),
                None => out.push_str("\t\t0.0000"),
            }
        }
        out.push('\n');
    }
    out
}
