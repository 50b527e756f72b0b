#![no_std] // Shared with the wasm binding

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod model;

pub use ids::{DependencyKey, Layer, LinkKey, NodeId, NodeIdParseError};
pub use model::*;
