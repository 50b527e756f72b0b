use std::fmt;

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, value},
    sequence::separated_pair,
    IResult,
};

/// Placeholder written in place of the missing side of an unaligned token.
pub const PLACEHOLDER: char = 'X';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Index(u32),
    Placeholder,
}

/// One space-separated item of a pharaoh alignment. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entry {
    /// `i-j`: source token `i` aligned with target token `j`.
    Pair(u32, u32),
    /// `i-X`: source token `i` has no counterpart.
    SourceOnly(u32),
    /// `X-j`: target token `j` has no counterpart.
    TargetOnly(u32),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Pair(i, j) => write!(f, "{i}-{j}"),
            Entry::SourceOnly(i) => write!(f, "{i}-{PLACEHOLDER}"),
            Entry::TargetOnly(j) => write!(f, "{PLACEHOLDER}-{j}"),
        }
    }
}

fn side(input: &str) -> IResult<&str, Side> {
    alt((
        map_res(digit1, |d: &str| d.parse().map(Side::Index)),
        value(Side::Placeholder, char(PLACEHOLDER)),
    ))(input)
}

/// Parse a single item. `None` for anything that is not one of the three forms
/// (including `X-X`).
pub fn parse_entry(item: &str) -> Option<Entry> {
    let (_, (left, right)) = all_consuming(separated_pair(side, char('-'), side))(item).ok()?;

    match (left, right) {
        (Side::Index(i), Side::Index(j)) => Some(Entry::Pair(i, j)),
        (Side::Index(i), Side::Placeholder) => Some(Entry::SourceOnly(i)),
        (Side::Placeholder, Side::Index(j)) => Some(Entry::TargetOnly(j)),
        (Side::Placeholder, Side::Placeholder) => None,
    }
}

/// Entries of an alignment string in written order. Malformed items are
/// dropped, since stored alignments often come from automatic aligners.
pub fn parse_alignment(alignment: &str) -> Vec<Entry> {
    alignment
        .split_whitespace()
        .filter_map(|item| {
            let entry = parse_entry(item);
            if entry.is_none() {
                tracing::debug!(item, "skipping malformed alignment item");
            }
            entry
        })
        .collect()
}

/// Space-joined alignment string. An empty slice gives an empty string.
pub fn format_alignment(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(Entry::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
