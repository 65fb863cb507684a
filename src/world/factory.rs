//! # Descriptor Factory
//!
//! Turns a portable [`ObjectDescriptor`] into a live [`SceneNode`]. This is
//! the rule-heavy half of the round-trip contract: the extractor recognizes
//! exactly the node shapes produced here.
//!
//! Common fields are applied in a fixed order — name, position, rotation,
//! scale — each only when present in the descriptor. The order is part of
//! the contract (a later field could depend on an earlier one in a future
//! extension) and is pinned by a test below. Lights take their name through
//! the common path but set position directly and never apply rotation or
//! scale.

use thiserror::Error;

use crate::gfx::scene::node::{Geometry, Material, NodeKind, SceneNode};

use super::descriptor::{ObjectDescriptor, Vec3Data};

/// Construction failures for a single descriptor
///
/// Recoverable at batch-build call sites (the entry is logged and skipped);
/// callers building a single object directly must handle the error.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("{kind} {field} must be a positive finite number, got {value}")]
    InvalidDimension {
        kind: &'static str,
        field: &'static str,
        value: f32,
    },
    #[error("{kind} intensity must be a finite number, got {value}")]
    InvalidIntensity { kind: &'static str, value: f32 },
}

/// Builds a scene-graph node from a descriptor
///
/// Pure given its input: no renderer context is needed, GPU upload happens
/// later when the node joins a rendered graph.
pub fn build_node(descriptor: &ObjectDescriptor) -> Result<SceneNode, FactoryError> {
    match descriptor {
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
            let geometry = Geometry::Box {
                width: check_dimension("box", "width", *width)?,
                height: check_dimension("box", "height", *height)?,
                depth: check_dimension("box", "depth", *depth)?,
            };
            let mut node = SceneNode::new(NodeKind::Mesh {
                geometry,
                material: Material::new(*color),
            });
            node.cast_shadow = true;
            node.receive_shadow = true;
            apply_common(&mut node, name, position, rotation, scale);
            Ok(node)
        }

        ObjectDescriptor::Sphere {
            name,
            radius,
            color,
            position,
            rotation,
            scale,
        } => {
            let geometry = Geometry::Sphere {
                radius: check_dimension("sphere", "radius", *radius)?,
            };
            let mut node = SceneNode::new(NodeKind::Mesh {
                geometry,
                material: Material::new(*color),
            });
            node.cast_shadow = true;
            node.receive_shadow = true;
            apply_common(&mut node, name, position, rotation, scale);
            Ok(node)
        }

        ObjectDescriptor::AmbientLight {
            name,
            color,
            intensity,
        } => {
            let mut node = SceneNode::new(NodeKind::AmbientLight {
                color: *color,
                intensity: check_intensity("ambientLight", *intensity)?,
            });
            apply_common(&mut node, name, &None, &None, &None);
            Ok(node)
        }

        ObjectDescriptor::DirectionalLight {
            name,
            color,
            intensity,
            position,
        } => {
            let mut node = SceneNode::new(NodeKind::DirectionalLight {
                color: *color,
                intensity: check_intensity("directionalLight", *intensity)?,
            });
            apply_common(&mut node, name, &None, &None, &None);
            // Position is assigned directly, outside the common path; lights
            // never take rotation or scale.
            if let Some(p) = position {
                node.position = (*p).into();
            }
            node.cast_shadow = true;
            Ok(node)
        }
    }
}

/// Applies the shared descriptor fields in the fixed documented order
fn apply_common(
    node: &mut SceneNode,
    name: &Option<String>,
    position: &Option<Vec3Data>,
    rotation: &Option<Vec3Data>,
    scale: &Option<Vec3Data>,
) {
    if let Some(name) = name {
        node.name = name.clone();
    }
    if let Some(position) = position {
        node.position = (*position).into();
    }
    if let Some(rotation) = rotation {
        node.rotation = (*rotation).into();
    }
    if let Some(scale) = scale {
        node.scale = (*scale).into();
    }
}

fn check_dimension(
    kind: &'static str,
    field: &'static str,
    value: f32,
) -> Result<f32, FactoryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FactoryError::InvalidDimension { kind, field, value })
    }
}

fn check_intensity(kind: &'static str, value: f32) -> Result<f32, FactoryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FactoryError::InvalidIntensity { kind, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_box_gets_geometry_material_and_shadows() {
        let descriptor = ObjectDescriptor::Box {
            name: Some("crate".to_string()),
            width: 1.0,
            height: 2.0,
            depth: 3.0,
            color: 0xff8800,
            position: None,
            rotation: None,
            scale: None,
        };

        let node = build_node(&descriptor).unwrap();
        assert_eq!(node.name, "crate");
        assert!(node.cast_shadow);
        assert!(node.receive_shadow);
        match &node.kind {
            NodeKind::Mesh { geometry, material } => {
                assert_eq!(material.color, 0xff8800);
                assert!(matches!(
                    geometry,
                    Geometry::Box { width, height, depth }
                        if *width == 1.0 && *height == 2.0 && *depth == 3.0
                ));
            }
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_omitted_transforms_stay_identity() {
        let descriptor = ObjectDescriptor::Sphere {
            name: None,
            radius: 1.0,
            color: 0x0000ff,
            position: None,
            rotation: None,
            scale: None,
        };

        let node = build_node(&descriptor).unwrap();
        assert_eq!(node.name, "");
        assert_eq!(node.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(node.rotation, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(node.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_common_fields_applied_when_present() {
        let descriptor = ObjectDescriptor::Box {
            name: Some("posed".to_string()),
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            color: 0xffffff,
            position: Some(Vec3Data::new(1.0, 2.0, 3.0)),
            rotation: Some(Vec3Data::new(0.1, 0.2, 0.3)),
            scale: Some(Vec3Data::new(2.0, 2.0, 2.0)),
        };

        let node = build_node(&descriptor).unwrap();
        assert_eq!(node.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(node.rotation, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(node.scale, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_directional_light_sets_position_but_never_scale() {
        let descriptor = ObjectDescriptor::DirectionalLight {
            name: Some("sun".to_string()),
            color: 0xffffff,
            intensity: 1.0,
            position: Some(Vec3Data::new(5.0, 5.0, 5.0)),
        };

        let node = build_node(&descriptor).unwrap();
        assert_eq!(node.name, "sun");
        assert_eq!(node.position, Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(node.scale, Vector3::new(1.0, 1.0, 1.0));
        assert!(node.cast_shadow);
        assert!(matches!(node.kind, NodeKind::DirectionalLight { .. }));
    }

    #[test]
    fn test_ambient_light_has_no_shadow_flags() {
        let descriptor = ObjectDescriptor::AmbientLight {
            name: None,
            color: 0xffffff,
            intensity: 0.5,
        };

        let node = build_node(&descriptor).unwrap();
        assert!(!node.cast_shadow);
        assert!(!node.receive_shadow);
    }

    #[test]
    fn test_invalid_dimension_is_an_error() {
        let negative = ObjectDescriptor::Box {
            name: None,
            width: -1.0,
            height: 1.0,
            depth: 1.0,
            color: 0,
            position: None,
            rotation: None,
            scale: None,
        };
        assert!(build_node(&negative).is_err());

        let nan = ObjectDescriptor::Sphere {
            name: None,
            radius: f32::NAN,
            color: 0,
            position: None,
            rotation: None,
            scale: None,
        };
        assert!(build_node(&nan).is_err());
    }
}
