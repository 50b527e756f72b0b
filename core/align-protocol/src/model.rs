use alloc::string::{String, ToString};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::ids::Layer;

/// Display state of a token node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeColor {
    #[default]
    Default,
    /// Aligned or deliberately unaligned token.
    Highlight,
}

/// A corpus (one stored table of sentence pairs).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct CorpusDescriptor {
    pub name: String,
}

/// Address of one sentence pair inside a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct SentenceRef {
    pub document_id: String,
    pub sentence_id: String,
}

impl SentenceRef {
    pub fn new(document_id: impl Into<String>, sentence_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            sentence_id: sentence_id.into(),
        }
    }
}

/// A loaded sentence pair with its stored alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct SentenceRecord {
    /// CoNLL-U block for the top layer.
    pub source_parse: String,
    /// CoNLL-U block for the bottom layer.
    pub target_parse: String,
    /// Pharaoh alignment, empty when nothing was recorded.
    pub alignment: String,
    pub verified: bool,
}

/// What gets written back for a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct AlignmentUpdate {
    pub alignment: String,
    pub verified: bool,
}

/// Node placement and colors handed to the rendering widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub left_offset: f32,
    pub h_spacing: f32,
    pub top_y: f32,
    pub bottom_y: f32,
    pub default_color: String,
    pub highlight_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_offset: -1000.0,
            h_spacing: 100.0,
            top_y: 0.0,
            bottom_y: 200.0,
            default_color: "#CDDC39".to_string(),
            highlight_color: "red".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Position of the `index`-th token row (0-based) of a layer.
    pub fn position(&self, layer: Layer, index: usize) -> (f32, f32) {
        let y = match layer {
            Layer::Top => self.top_y,
            Layer::Bottom => self.bottom_y,
        };
        (self.left_offset + self.h_spacing * index as f32, y)
    }

    pub fn color(&self, color: NodeColor) -> &str {
        match color {
            NodeColor::Default => &self.default_color,
            NodeColor::Highlight => &self.highlight_color,
        }
    }
}
