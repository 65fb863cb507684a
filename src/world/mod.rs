//! # Declarative Object Model
//!
//! The portable half of the engine: typed object descriptors, the factory
//! that turns them into live scene-graph nodes, the extractor that walks the
//! graph back into descriptors, and the staging buffer that holds declared
//! objects ahead of a batch build.

pub mod descriptor;
pub mod extract;
pub mod factory;
pub mod staging;

// Re-export main types
pub use descriptor::{DocumentError, ObjectDescriptor, SceneDocument, Vec3Data};
pub use extract::extract_document;
pub use factory::{build_node, FactoryError};
pub use staging::StagingBuffer;
