pub mod globals;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use globals::{GlobalUniforms, LightSettings};
pub use render_engine::RenderEngine;
pub use vertex::Vertex3D;
