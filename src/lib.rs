// src/lib.rs
//! Maquette Scene Engine
//!
//! A descriptor-driven scene authoring and rendering layer built on wgpu
//! and winit. Scenes are assembled from plain object descriptors, rendered
//! with a forward pipeline, picked with pointer rays, and round-tripped
//! through a portable JSON document format.

pub mod app;
pub mod editor;
pub mod gfx;
pub mod world;

// Re-export main types for convenience
pub use app::MaquetteApp;
pub use editor::SceneEditor;

/// Creates a default application instance
pub fn default() -> MaquetteApp {
    pollster::block_on(MaquetteApp::new())
}
