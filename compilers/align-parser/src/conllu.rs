use nom::{
    bytes::complete::take_while,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    IResult,
};
use thiserror::Error;

use align_protocol::{DependencyKey, Layer, NodeId};

/// Relations never drawn as arcs.
pub const SUPPRESSED_RELATIONS: [&str; 2] = ["root", "punct"];

const FORM: usize = 1;
const UPOS: usize = 3;
const HEAD: usize = 6;
const DEPREL: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected at least 8 tab-separated fields, found {found}")]
    MissingFields { line: usize, found: usize },
    #[error("line {line}: bad ordinal '{value}'")]
    BadOrdinal { line: usize, value: String },
    #[error("line {line}: bad head '{value}'")]
    BadHead { line: usize, value: String },
}

/// One plain token row of a CoNLL-U block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRow {
    /// 1-based ordinal from column 0.
    pub ordinal: u32,
    pub form: String,
    /// Universal part-of-speech tag (`NOUN`, `CCONJ`, ...).
    pub upos: String,
    /// Head ordinal, 0 for the virtual root; `None` when the column is `_`.
    pub head: Option<u32>,
    pub relation: String,
}

impl TokenRow {
    pub fn is_suppressed(&self) -> bool {
        SUPPRESSED_RELATIONS.contains(&self.relation.as_str())
    }

    /// Arc from this token to its head, unless the relation is suppressed.
    pub fn dependency(&self, layer: Layer) -> Option<DependencyKey> {
        if self.is_suppressed() {
            return None;
        }
        let head = self.head?;
        Some(DependencyKey {
            dependent: NodeId::new(layer, self.ordinal),
            head: NodeId::new(layer, head),
        })
    }
}

fn fields(line: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('\t'), take_while(|c: char| c != '\t')))(line)
}

fn ordinal(field: &str) -> IResult<&str, u32> {
    all_consuming(map_res(digit1, str::parse::<u32>))(field)
}

/// Multiword ranges (`3-4`) and empty nodes (`8.1`) carry no position of their own.
pub fn is_plain_token_id(field: &str) -> bool {
    !field.contains('-') && !field.contains('.')
}

/// Parse the token rows of one block, skipping comments, blank lines,
/// multiword ranges and empty nodes. Row order is kept as given.
pub fn parse_block(text: &str) -> Result<Vec<TokenRow>, ParseError> {
    let mut rows = Vec::new();

    for (n, raw) in text.lines().enumerate() {
        let line_no = n + 1;
        let line = raw.trim_end_matches('\r');

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cols = match fields(line) {
            Ok((_, cols)) => cols,
            Err(_) => return Err(ParseError::MissingFields { line: line_no, found: 0 }),
        };
        if cols.len() <= DEPREL {
            return Err(ParseError::MissingFields { line: line_no, found: cols.len() });
        }

        if !is_plain_token_id(cols[0]) {
            tracing::debug!(line = line_no, id = cols[0], "skipping multiword or empty node row");
            continue;
        }

        let (_, ord) = ordinal(cols[0]).map_err(|_| ParseError::BadOrdinal {
            line: line_no,
            value: cols[0].to_string(),
        })?;

        let head = match cols[HEAD] {
            "_" => None,
            value => Some(
                ordinal(value)
                    .map(|(_, h)| h)
                    .map_err(|_| ParseError::BadHead { line: line_no, value: value.to_string() })?,
            ),
        };

        rows.push(TokenRow {
            ordinal: ord,
            form: cols[FORM].to_string(),
            upos: cols[UPOS].to_string(),
            head,
            relation: cols[DEPREL].to_string(),
        });
    }

    Ok(rows)
}
