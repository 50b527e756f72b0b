pub mod store;

pub use store::{EdgeKey, EdgeKind, GraphEdge, GraphError, GraphStore, TokenNode};
