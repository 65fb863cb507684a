//! # Global Uniform State
//!
//! Per-frame global data shared by every draw: camera matrices plus the
//! lighting extracted from the scene graph's light nodes.

use crate::gfx::camera::CameraUniform;
use crate::gfx::scene::graph::SceneGraph;
use crate::gfx::scene::node::{hex_to_rgb, NodeKind};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `forward.wgsl` exactly. Colors pack
/// their intensity into the w component.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    /// Camera position (homogeneous coordinates)
    pub view_position: [f32; 4],
    /// Camera view-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Ambient light rgb + intensity
    pub ambient_color: [f32; 4],
    /// Directional light rgb + intensity
    pub sun_color: [f32; 4],
    /// Directional light position, w unused
    pub sun_position: [f32; 4],
}

/// Lighting inputs gathered from the graph for the current frame
#[derive(Debug, Clone, Copy)]
pub struct LightSettings {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub sun_color: [f32; 3],
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 1.0,
            sun_position: [5.0, 5.0, 5.0],
        }
    }
}

impl LightSettings {
    /// Reads the first ambient and first directional light from the graph
    ///
    /// Missing lights keep the defaults so an unlit document still renders
    /// visibly.
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let mut settings = Self::default();
        let mut found_ambient = false;
        let mut found_sun = false;

        for node in graph.nodes() {
            match &node.kind {
                NodeKind::AmbientLight { color, intensity } if !found_ambient => {
                    settings.ambient_color = hex_to_rgb(*color);
                    settings.ambient_intensity = *intensity;
                    found_ambient = true;
                }
                NodeKind::DirectionalLight { color, intensity } if !found_sun => {
                    settings.sun_color = hex_to_rgb(*color);
                    settings.sun_intensity = *intensity;
                    settings.sun_position = [node.position.x, node.position.y, node.position.z];
                    found_sun = true;
                }
                _ => {}
            }
            if found_ambient && found_sun {
                break;
            }
        }

        settings
    }
}

impl GlobalUniforms {
    pub fn new(camera: CameraUniform, lights: LightSettings) -> Self {
        let [ar, ag, ab] = lights.ambient_color;
        let [sr, sg, sb] = lights.sun_color;
        let [sx, sy, sz] = lights.sun_position;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient_color: [ar, ag, ab, lights.ambient_intensity],
            sun_color: [sr, sg, sb, lights.sun_intensity],
            sun_position: [sx, sy, sz, 0.0],
        }
    }
}
