pub mod graph;
pub mod node;

// Re-export main types
pub use graph::{SceneGraph, DEFAULT_BACKGROUND};
pub use node::{Geometry, Material, NodeKind, SceneNode};
