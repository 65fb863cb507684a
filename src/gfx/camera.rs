//! # Camera Holder
//!
//! Owns the active camera's projection parameters and keeps the aspect ratio
//! in step with the window. Orbit/pan control math lives outside this crate;
//! the holder only exposes the view-projection state the renderer and pick
//! resolver need.

use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera with an explicit eye and target
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl PerspectiveCamera {
    /// Creates a camera with the authoring defaults: 75 degree field of view,
    /// near 0.1, far 1000, eye at (3, 3, 5) looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vector3::new(3.0, 3.0, 5.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fovy: Deg(75.0).into(),
            aspect,
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        }
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj = OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Updates the aspect ratio after a window resize
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = PerspectiveCamera::new(1.0);
        camera.resize_projection(1600, 800);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_resize_ignores_degenerate_size() {
        let mut camera = PerspectiveCamera::new(1.5);
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 1.5);
    }
}
