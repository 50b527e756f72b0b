pub mod conllu;
pub mod corpus;
pub mod pharaoh;

pub use conllu::{parse_block, ParseError, TokenRow, SUPPRESSED_RELATIONS};
pub use pharaoh::{format_alignment, parse_alignment, Entry};
