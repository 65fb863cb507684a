//! # Descriptor Extractor
//!
//! The inverse of the factory: walks the direct children of the scene-graph
//! root and reconstructs portable descriptors for persistence. Recognition
//! must match exactly what the factory can produce; anything else (custom
//! geometry, groups) is logged and excluded rather than failing the export.

use log::warn;

use crate::gfx::scene::graph::SceneGraph;
use crate::gfx::scene::node::{Geometry, NodeKind, SceneNode};

use super::descriptor::{ObjectDescriptor, SceneDocument, Vec3Data};

/// Name used for nodes that were never given one
pub const UNNAMED: &str = "unnamed";

/// Extracts the full scene document from the live graph
///
/// Output ordering matches the graph's child order; unsupported children are
/// simply omitted, so extraction never fails wholesale.
pub fn extract_document(graph: &SceneGraph) -> SceneDocument {
    let objects = graph.nodes().iter().filter_map(extract_node).collect();

    SceneDocument {
        background: graph.background,
        objects,
    }
}

/// Reconstructs the descriptor for a single root child, if it has a wire form
pub fn extract_node(node: &SceneNode) -> Option<ObjectDescriptor> {
    match &node.kind {
        NodeKind::Mesh { geometry, material } => match geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => Some(ObjectDescriptor::Box {
                name: Some(node_name(node)),
                width: *width,
                height: *height,
                depth: *depth,
                color: material.color,
                position: Some(node.position.into()),
                rotation: Some(node.rotation.into()),
                scale: Some(node.scale.into()),
            }),
            Geometry::Sphere { radius } => Some(ObjectDescriptor::Sphere {
                name: Some(node_name(node)),
                radius: *radius,
                color: material.color,
                position: Some(node.position.into()),
                rotation: Some(node.rotation.into()),
                scale: Some(node.scale.into()),
            }),
            Geometry::Custom(_) => {
                warn!(
                    "geometry on node {:?} has no portable form, excluded from export",
                    node_name(node)
                );
                None
            }
        },

        NodeKind::AmbientLight { color, intensity } => Some(ObjectDescriptor::AmbientLight {
            name: Some(node_name(node)),
            color: *color,
            intensity: *intensity,
        }),

        NodeKind::DirectionalLight { color, intensity } => {
            Some(ObjectDescriptor::DirectionalLight {
                name: Some(node_name(node)),
                color: *color,
                intensity: *intensity,
                position: Some(Vec3Data::from(node.position)),
            })
        }

        NodeKind::Group => {
            warn!(
                "node kind of {:?} is not supported for export, excluded",
                node_name(node)
            );
            None
        }
    }
}

fn node_name(node: &SceneNode) -> String {
    if node.name.is_empty() {
        UNNAMED.to_string()
    } else {
        node.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::GeometryData;
    use crate::gfx::scene::node::Material;
    use crate::world::factory::build_node;
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    fn round_trip(descriptor: ObjectDescriptor) -> ObjectDescriptor {
        let node = build_node(&descriptor).expect("factory must accept test descriptor");
        extract_node(&node).expect("extractor must recognize factory output")
    }

    #[test]
    fn test_box_round_trip() {
        let original = ObjectDescriptor::Box {
            name: Some("crate".to_string()),
            width: 1.5,
            height: 2.0,
            depth: 0.75,
            color: 0xff0000,
            position: Some(Vec3Data::new(1.0, 2.0, 3.0)),
            rotation: Some(Vec3Data::new(0.1, 0.0, 0.5)),
            scale: Some(Vec3Data::new(2.0, 1.0, 1.0)),
        };

        match round_trip(original) {
            ObjectDescriptor::Box {
                name,
                width,
                height,
                depth,
                color,
                position,
                rotation,
                scale,
            } => {
                assert_eq!(name.as_deref(), Some("crate"));
                assert_eq!(color, 0xff0000);
                assert_relative_eq!(width, 1.5);
                assert_relative_eq!(height, 2.0);
                assert_relative_eq!(depth, 0.75);
                assert_eq!(position, Some(Vec3Data::new(1.0, 2.0, 3.0)));
                assert_eq!(rotation, Some(Vec3Data::new(0.1, 0.0, 0.5)));
                assert_eq!(scale, Some(Vec3Data::new(2.0, 1.0, 1.0)));
            }
            other => panic!("round trip changed type: {:?}", other),
        }
    }

    #[test]
    fn test_sphere_round_trip() {
        let original = ObjectDescriptor::Sphere {
            name: None,
            radius: 2.5,
            color: 0x00ffaa,
            position: None,
            rotation: None,
            scale: None,
        };

        match round_trip(original) {
            ObjectDescriptor::Sphere {
                name,
                radius,
                color,
                position,
                ..
            } => {
                assert_eq!(name.as_deref(), Some(UNNAMED));
                assert_relative_eq!(radius, 2.5);
                assert_eq!(color, 0x00ffaa);
                // Omitted transforms come back as explicit identity.
                assert_eq!(position, Some(Vec3Data::new(0.0, 0.0, 0.0)));
            }
            other => panic!("round trip changed type: {:?}", other),
        }
    }

    #[test]
    fn test_light_round_trips() {
        let ambient = ObjectDescriptor::AmbientLight {
            name: Some("fill".to_string()),
            color: 0xffffff,
            intensity: 0.5,
        };
        match round_trip(ambient) {
            ObjectDescriptor::AmbientLight {
                color, intensity, ..
            } => {
                assert_eq!(color, 0xffffff);
                assert_relative_eq!(intensity, 0.5);
            }
            other => panic!("round trip changed type: {:?}", other),
        }

        let sun = ObjectDescriptor::DirectionalLight {
            name: None,
            color: 0xfff0dd,
            intensity: 1.0,
            position: Some(Vec3Data::new(5.0, 5.0, 5.0)),
        };
        match round_trip(sun) {
            ObjectDescriptor::DirectionalLight {
                color,
                intensity,
                position,
                ..
            } => {
                assert_eq!(color, 0xfff0dd);
                assert_relative_eq!(intensity, 1.0);
                assert_eq!(position, Some(Vec3Data::new(5.0, 5.0, 5.0)));
            }
            other => panic!("round trip changed type: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_children_are_excluded() {
        let mut graph = SceneGraph::with_background(0x202020);
        graph.add(SceneNode::new(NodeKind::Mesh {
            geometry: Geometry::Custom(GeometryData::new()),
            material: Material::new(0xffffff),
        }));
        graph.add(SceneNode::new(NodeKind::AmbientLight {
            color: 0xffffff,
            intensity: 0.5,
        }));
        let mut sun = SceneNode::new(NodeKind::DirectionalLight {
            color: 0xffffff,
            intensity: 1.0,
        });
        sun.position = Vector3::new(5.0, 5.0, 5.0);
        graph.add(sun);
        graph.add(SceneNode::new(NodeKind::Group));

        let document = extract_document(&graph);
        assert_eq!(document.background, 0x202020);
        assert_eq!(document.objects.len(), 2);
    }
}
