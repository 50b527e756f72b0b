//! Whole-file CoNLL-U helpers used when importing parallel treebanks.

use align_protocol::SentenceRef;

use crate::conllu::is_plain_token_id;

/// Split a CoNLL-U file into sentence blocks (separated by blank lines).
pub fn split_blocks(text: &str) -> Vec<&str> {
    let normalized = text.trim();
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in normalized.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            if let Some(s) = start.take() {
                blocks.push(&normalized[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = offset + content.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        blocks.push(&normalized[s..end]);
    }

    blocks
}

/// Document and sentence ids declared in a block's comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMeta {
    pub document_id: Option<String>,
    pub sentence_id: Option<String>,
}

impl BlockMeta {
    pub fn scan(block: &str) -> Self {
        let mut meta = Self::default();

        for line in block.lines() {
            if line.starts_with("# newdoc id") || line.starts_with("# newdoc_id") {
                meta.document_id = comment_value(line);
            } else if line.starts_with("# sent_id") {
                meta.sentence_id = comment_value(line);
                break;
            }
        }

        meta
    }
}

fn comment_value(line: &str) -> Option<String> {
    line.split_once(" = ").map(|(_, value)| value.trim().to_string())
}

/// Blocks of a file keyed by (document id, sentence id), in file order.
///
/// A document id stays in force until the next `newdoc` comment. Blocks
/// without a `sent_id` are keyed by their 1-based position.
pub fn key_blocks(text: &str) -> Vec<(SentenceRef, &str)> {
    let mut current_doc = String::new();

    split_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            let meta = BlockMeta::scan(block);
            if let Some(doc) = meta.document_id {
                current_doc = doc;
            }
            let sent = meta.sentence_id.unwrap_or_else(|| (i + 1).to_string());
            (SentenceRef::new(current_doc.clone(), sent), block)
        })
        .collect()
}

/// Surface forms of the plain token rows of a block.
pub fn surface_tokens(block: &str) -> Vec<&str> {
    block
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .filter_map(|line| {
            let mut cols = line.split('\t');
            let id = cols.next()?;
            let form = cols.next()?;
            is_plain_token_id(id).then_some(form)
        })
        .collect()
}

/// `"<source tokens> ||| <target tokens>"`, lowercased, as read by word aligners.
pub fn aligner_line(source_block: &str, target_block: &str) -> String {
    let source = surface_tokens(source_block).join(" ").to_lowercase();
    let target = surface_tokens(target_block).join(" ").to_lowercase();
    format!("{source} ||| {target}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "# newdoc id = n01001\n\
# sent_id = n01001011\n\
1\tHello\thello\tINTJ\t_\t_\t0\troot\t_\t_\n\
\n\
# sent_id = n01001012\n\
1\tWorld\tworld\tNOUN\t_\t_\t0\troot\t_\t_\n\
2\t.\t.\tPUNCT\t_\t_\t1\tpunct\t_\t_\n\
\n\
\n\
# newdoc id = n01002\n\
# sent_id = n01002001\n\
1-2\tdu\t_\t_\t_\t_\t_\t_\t_\t_\n\
1\tde\tde\tADP\t_\t_\t2\tcase\t_\t_\n\
2\tle\tle\tDET\t_\t_\t0\troot\t_\t_\n";

    #[test]
    fn test_split_blocks() {
        let blocks = split_blocks(FILE);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[1].starts_with("# sent_id = n01001012"));
        assert!(blocks[1].ends_with("punct\t_\t_"));
        assert!(split_blocks("\n\n").is_empty());
    }

    #[test]
    fn test_document_id_carries_over() {
        let keys: Vec<SentenceRef> = key_blocks(FILE).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                SentenceRef::new("n01001", "n01001011"),
                SentenceRef::new("n01001", "n01001012"),
                SentenceRef::new("n01002", "n01002001"),
            ]
        );
    }

    #[test]
    fn test_newdoc_underscore_form() {
        let meta = BlockMeta::scan("# newdoc_id = d1\n# sent_id = s1\n# text = x");
        assert_eq!(meta.document_id.as_deref(), Some("d1"));
        assert_eq!(meta.sentence_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_surface_tokens_skip_multiword_rows() {
        let blocks = split_blocks(FILE);
        assert_eq!(surface_tokens(blocks[2]), vec!["de", "le"]);
    }

    #[test]
    fn test_aligner_line() {
        let blocks = split_blocks(FILE);
        assert_eq!(aligner_line(blocks[1], blocks[0]), "world . ||| hello");
    }
}
