//! # Pointer-Ray Picking
//!
//! Resolves a pointer position to the nearest scene-graph node under it.
//!
//! 1. **Pointer to Ray**: normalize pixel coordinates to NDC (with the
//!    screen-space y flip) and unproject through the inverse view-projection
//! 2. **Ray-Node Intersection**: test the ray against each mesh node's
//!    transformed bounding box, recursing through all descendants
//! 3. **Selection**: the nearest intersection wins; a miss is `None`
//!
//! The resolver itself is stateless; the editor records the hit path as the
//! live selection.

use cgmath::{
    ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4,
};

use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::scene::graph::SceneGraph;
use crate::gfx::scene::node::{NodeKind, SceneNode};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Test ray-AABB intersection using the slab method
    ///
    /// Returns the distance to the intersection point, or None if the ray
    /// misses entirely or the box lies behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix, re-bounding the 8 transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);
        for corner in &corners {
            let h = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            let p = Vector3::new(h.x / h.w, h.y / h.w, h.z / h.w);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Self::new(min, max)
    }
}

/// Result of a picking operation
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Child-index path from the graph root to the picked node
    pub path: Vec<usize>,
    /// Distance from the ray origin to the intersection point
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Converts pointer pixel coordinates to a world-space ray
///
/// `pointer` is in pixels from the top-left corner; `viewport` is the
/// surface size in pixels. NDC x is `(px / width) * 2 - 1` and NDC y is
/// `-(py / height) * 2 + 1`, flipping between screen space (y down) and
/// device space (y up).
pub fn screen_to_ray(
    pointer: (f32, f32),
    viewport: (f32, f32),
    camera: &PerspectiveCamera,
) -> Ray {
    let (pointer_x, pointer_y) = pointer;
    let (width, height) = viewport;

    let ndc_x = (pointer_x / width) * 2.0 - 1.0;
    let ndc_y = -(pointer_y / height) * 2.0 + 1.0;

    let view_proj = camera.build_view_projection_matrix();
    let inv_view_proj = view_proj.invert().unwrap_or(Matrix4::identity());

    // wgpu clip space runs z 0..1, so the near plane sits at z = 0
    let near_point = Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far_point = Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    let world_near = inv_view_proj * near_point;
    let world_far = inv_view_proj * far_point;

    let near_3d = Vector3::new(
        world_near.x / world_near.w,
        world_near.y / world_near.w,
        world_near.z / world_near.w,
    );
    let far_3d = Vector3::new(
        world_far.x / world_far.w,
        world_far.y / world_far.w,
        world_far.z / world_far.w,
    );

    Ray::new(near_3d, far_3d - near_3d)
}

/// Casts a ray into the graph and returns the nearest intersected node
///
/// Tests every descendant of the root, not just direct children; lights and
/// groups carry no pickable volume but their children are still visited with
/// composed transforms. Returns `None` when nothing is hit.
pub fn pick_scene(ray: &Ray, graph: &SceneGraph) -> Option<PickResult> {
    let mut best: Option<PickResult> = None;
    let mut path = Vec::new();

    for (index, node) in graph.nodes().iter().enumerate() {
        path.push(index);
        pick_node(ray, node, Matrix4::identity(), &mut path, &mut best);
        path.pop();
    }

    best
}

fn pick_node(
    ray: &Ray,
    node: &SceneNode,
    parent: Matrix4<f32>,
    path: &mut Vec<usize>,
    best: &mut Option<PickResult>,
) {
    let world = parent * node.local_transform();

    if let NodeKind::Mesh { geometry, .. } = &node.kind {
        let (min, max) = geometry.bounds();
        let aabb = Aabb::new(min, max).transform(&world);

        if let Some(distance) = aabb.intersect_ray(ray) {
            let closer = best
                .as_ref()
                .map_or(true, |result| distance < result.distance);
            if closer {
                *best = Some(PickResult {
                    path: path.clone(),
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }
    }

    for (index, child) in node.children.iter().enumerate() {
        path.push(index);
        pick_node(ray, child, world, path, best);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::node::{Geometry, Material};

    fn box_node(position: Vector3<f32>) -> SceneNode {
        let mut node = SceneNode::new(NodeKind::Mesh {
            geometry: Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            material: Material::new(0xffffff),
        });
        node.position = position;
        node
    }

    fn test_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(1.0);
        camera.eye = Vector3::new(0.0, 0.0, 5.0);
        camera.target = Vector3::new(0.0, 0.0, 0.0);
        camera
    }

    #[test]
    fn test_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let hit = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&hit).is_some());

        let miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&miss).is_none());
    }

    #[test]
    fn test_center_pointer_ray_goes_through_target() {
        let camera = test_camera();
        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);

        // Camera looks down -Z from (0, 0, 5); the center ray must too.
        assert!(ray.direction.z < -0.99);
        assert!(ray.direction.x.abs() < 1e-3);
        assert!(ray.direction.y.abs() < 1e-3);
    }

    #[test]
    fn test_pick_returns_nearer_of_overlapping_nodes() {
        let camera = test_camera();
        let mut graph = SceneGraph::new();
        graph.add(box_node(Vector3::new(0.0, 0.0, -6.0)));
        graph.add(box_node(Vector3::new(0.0, 0.0, 0.0)));

        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);
        let result = pick_scene(&ray, &graph).expect("both boxes sit on the ray");

        // The box at the origin is nearer to the camera at z = 5.
        assert_eq!(result.path, vec![1]);
        assert!(result.distance < 5.0);
    }

    #[test]
    fn test_pick_misses_empty_space() {
        let camera = test_camera();
        let mut graph = SceneGraph::new();
        graph.add(box_node(Vector3::new(100.0, 0.0, 0.0)));

        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);
        assert!(pick_scene(&ray, &graph).is_none());
    }

    #[test]
    fn test_pick_descends_into_children() {
        let camera = test_camera();
        let mut parent = SceneNode::new(NodeKind::Group);
        parent.position = Vector3::new(0.0, 0.0, -1.0);
        parent.children.push(box_node(Vector3::new(0.0, 0.0, 1.0)));

        let mut graph = SceneGraph::new();
        graph.add(parent);

        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);
        let result = pick_scene(&ray, &graph).expect("child box sits at the origin");
        assert_eq!(result.path, vec![0, 0]);
    }

    #[test]
    fn test_lights_are_not_pickable() {
        let camera = test_camera();
        let mut graph = SceneGraph::new();
        graph.add(SceneNode::new(NodeKind::AmbientLight {
            color: 0xffffff,
            intensity: 0.5,
        }));

        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);
        assert!(pick_scene(&ray, &graph).is_none());
    }
}
