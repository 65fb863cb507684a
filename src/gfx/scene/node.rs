//! # Scene Graph Nodes
//!
//! A [`SceneNode`] is the live, renderer-owned counterpart of an object
//! descriptor: a kind tag (mesh or light), transform, shadow flags, a name,
//! and optional GPU resources. Nodes are plain data until
//! [`SceneNode::init_gpu_resources`] uploads them; releasing GPU resources
//! is guarded so calling it repeatedly is a no-op.

use cgmath::{Matrix4, Vector3, Rad};
use wgpu::Device;

use crate::gfx::geometry::{generate_box, generate_sphere, GeometryData};
use crate::gfx::rendering::vertex::Vertex3D;

/// Longitude/latitude resolution used when tessellating spheres
pub const SPHERE_SEGMENTS: u32 = 32;

/// Lit, non-emissive surface description for a mesh node
///
/// The 24-bit hex color is kept verbatim so it survives the export path
/// exactly; the float conversion only feeds the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// 24-bit RGB color, `0xRRGGBB`
    pub color: u32,
}

impl Material {
    pub fn new(color: u32) -> Self {
        Self { color }
    }

    /// Color as normalized RGBA for the shader, alpha 1.0
    pub fn rgba(&self) -> [f32; 4] {
        let [r, g, b] = hex_to_rgb(self.color);
        [r, g, b, 1.0]
    }
}

/// Splits a 24-bit hex color into normalized RGB components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Geometry attached to a mesh node
///
/// `Box` and `Sphere` keep their literal construction dimensions so the
/// extractor can recover them; `Custom` geometry renders and picks but has
/// no wire form and is excluded from exports.
#[derive(Debug, Clone)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Custom(GeometryData),
}

impl Geometry {
    /// Tessellates the geometry into uploadable vertex data
    pub fn tessellate(&self) -> GeometryData {
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => generate_box(*width, *height, *depth),
            Self::Sphere { radius } => generate_sphere(*radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            Self::Custom(data) => data.clone(),
        }
    }

    /// Local-space bounds as (min, max) corners, used for picking
    pub fn bounds(&self) -> (Vector3<f32>, Vector3<f32>) {
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => {
                let half = Vector3::new(width * 0.5, height * 0.5, depth * 0.5);
                (-half, half)
            }
            Self::Sphere { radius } => {
                let half = Vector3::new(*radius, *radius, *radius);
                (-half, half)
            }
            Self::Custom(data) => {
                let (min, max) = data.bounds();
                (Vector3::from(min), Vector3::from(max))
            }
        }
    }
}

/// Closed set of node kinds the scene graph holds
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh { geometry: Geometry, material: Material },
    AmbientLight { color: u32, intensity: f32 },
    DirectionalLight { color: u32, intensity: f32 },
    /// Transform-only container; renderless and not serializable
    Group,
}

impl NodeKind {
    pub fn is_light(&self) -> bool {
        matches!(self, Self::AmbientLight { .. } | Self::DirectionalLight { .. })
    }
}

/// Per-node GPU resources: mesh buffers plus the model/color uniform
pub struct NodeGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// Uniform block carrying a node's world matrix and material color
///
/// Must match the `NodeUniform` struct in `forward.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// A live entity in the scene graph
///
/// The graph owns its nodes exclusively; GPU resources hang off each node
/// and are released by dropping the option, never reference-counted.
pub struct SceneNode {
    /// Display name; empty means unnamed
    pub name: String,
    pub kind: NodeKind,
    pub position: Vector3<f32>,
    /// Euler rotation in radians, applied X then Y then Z
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneNode>,
    pub gpu: Option<NodeGpuResources>,
}

impl SceneNode {
    /// Creates a node of the given kind with an identity transform
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
            gpu: None,
        }
    }

    /// Local transform composed as translation * rotation * scale
    pub fn local_transform(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }

    /// Releases GPU resources for this node and all descendants
    ///
    /// Safe to call any number of times; a node without live resources is
    /// skipped.
    pub fn release_gpu(&mut self) {
        self.gpu = None;
        for child in &mut self.children {
            child.release_gpu();
        }
    }

    /// Uploads mesh buffers and the node uniform for this subtree
    ///
    /// Nodes that already hold GPU resources keep them; lights and groups
    /// have nothing to upload but their children are still visited.
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        if self.gpu.is_none() {
            if let NodeKind::Mesh { geometry, material } = &self.kind {
                let data = geometry.tessellate();

                let vertices: Vec<Vertex3D> = data
                    .vertices
                    .iter()
                    .zip(data.normals.iter())
                    .map(|(position, normal)| Vertex3D {
                        position: *position,
                        normal: *normal,
                    })
                    .collect();

                let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Node Vertex Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                );

                let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Node Index Buffer"),
                        contents: bytemuck::cast_slice(&data.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    },
                );

                let uniform = NodeUniform {
                    model: self.local_transform().into(),
                    color: material.rgba(),
                };

                let uniform_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Node Uniform Buffer"),
                        contents: bytemuck::cast_slice(&[uniform]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    },
                );

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Node Bind Group"),
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                self.gpu = Some(NodeGpuResources {
                    vertex_buffer,
                    index_buffer,
                    index_count: data.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                });
            }
        }

        for child in &mut self.children {
            child.init_gpu_resources(device, layout);
        }
    }

    /// Writes current world transforms into node uniforms for this subtree
    pub fn write_uniforms(&self, queue: &wgpu::Queue, parent: Matrix4<f32>) {
        let world = parent * self.local_transform();

        if let (Some(gpu), NodeKind::Mesh { material, .. }) = (&self.gpu, &self.kind) {
            let uniform = NodeUniform {
                model: world.into(),
                color: material.rgba(),
            };
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }

        for child in &self.children {
            child.write_uniforms(queue, world);
        }
    }
}
