//! # Procedural Geometry Generation
//!
//! Tessellation for the primitive shapes the object model supports. Shapes
//! are generated with proper normals and texture coordinates, sized from the
//! literal dimensions in the descriptor rather than post-scaled.

pub mod primitives;

pub use primitives::*;

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of the raw vertex data, as (min, max) corners
    ///
    /// Empty geometry collapses to a zero-sized box at the origin.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let Some(first) = self.vertices.first() else {
            return ([0.0; 3], [0.0; 3]);
        };

        let mut min = *first;
        let mut max = *first;
        for v in self.vertices.iter().skip(1) {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
