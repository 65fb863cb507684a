//! # Graphics Module
//!
//! Rendering-side functionality for the maquette engine: the camera holder,
//! procedural geometry, the scene graph and its nodes, pointer-ray picking,
//! and the wgpu rendering adapter.
//!
//! The scene graph and picking code are plain data and math — they run
//! without a GPU. Only [`rendering`] touches wgpu.

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod scene;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use rendering::RenderEngine;
