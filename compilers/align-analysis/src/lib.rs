//! Alignment analysis over verified sentence pairs: link shapes,
//! dependency paths and how source relations surface in the target.

pub mod classify;
pub mod report;
pub mod tree;

pub use classify::AlignmentClasses;
pub use report::{edge_label_report, AnalysedSentence, PathCounter, PathStats, ReportGroup};
pub use tree::{AnalysisError, DependencyPath, DependencyTree, PathStep, Step, TreeToken};
