//! # Portable Object Descriptors
//!
//! The wire-level object model for maquette scenes. A descriptor is a
//! serializable description of a renderable entity; the factory turns it
//! into a live scene-graph node and the extractor reconstructs it from one.
//!
//! The JSON form is tagged on a `type` field (`"box"`, `"sphere"`,
//! `"ambientLight"`, `"directionalLight"`), with colors as 24-bit RGB
//! integers and transform fields as `{x, y, z}` objects. Unknown extra
//! fields are ignored on import.

use cgmath::Vector3;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 3-component vector as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Data {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3<f32>> for Vec3Data {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3Data> for Vector3<f32> {
    fn from(v: Vec3Data) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Serializable description of a renderable entity
///
/// A closed sum type: adding a new primitive means adding a variant here and
/// the compiler points at every match that needs extending. Because the enum
/// is exhaustive, documents carrying an unrecognized `type` tag are rejected
/// at the deserialization boundary (see [`ObjectDescriptor::from_value`])
/// rather than inside the factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectDescriptor {
    Box {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        width: f32,
        height: f32,
        depth: f32,
        color: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec3Data>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<Vec3Data>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<Vec3Data>,
    },
    Sphere {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        radius: f32,
        color: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec3Data>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<Vec3Data>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<Vec3Data>,
    },
    AmbientLight {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        color: u32,
        intensity: f32,
    },
    DirectionalLight {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        color: u32,
        intensity: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec3Data>,
    },
}

impl ObjectDescriptor {
    /// Decodes a single document entry, tolerating unknown object types
    ///
    /// Returns `None` (after logging a warning) when the entry carries an
    /// unrecognized `type` tag or fields that do not decode. Extra fields on
    /// a recognized type are ignored by serde and do not trip this path.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<missing>")
            .to_string();

        match serde_json::from_value(value) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                warn!("skipping object of unknown or malformed type {:?}: {}", tag, err);
                None
            }
        }
    }

    /// The descriptor's optional display name
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Box { name, .. }
            | Self::Sphere { name, .. }
            | Self::AmbientLight { name, .. }
            | Self::DirectionalLight { name, .. } => name.as_deref(),
        }
    }

    /// Wire tag for log messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::AmbientLight { .. } => "ambientLight",
            Self::DirectionalLight { .. } => "directionalLight",
        }
    }
}

/// The persisted scene document: background color plus object descriptors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDocument {
    pub background: u32,
    pub objects: Vec<ObjectDescriptor>,
}

/// Envelope used for the strict first parsing phase. Entries are kept as raw
/// values so a single bad object cannot fail the whole import.
#[derive(Deserialize)]
struct RawDocument {
    background: u32,
    objects: Vec<serde_json::Value>,
}

impl SceneDocument {
    /// Parses a scene document from JSON
    ///
    /// The envelope (`background` + `objects` array) must parse completely;
    /// a malformed document is an error and the caller's scene state is left
    /// untouched. Individual entries are decoded one at a time and skipped
    /// with a warning when unrecognized.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        let objects = raw
            .objects
            .into_iter()
            .filter_map(ObjectDescriptor::from_value)
            .collect();

        Ok(Self {
            background: raw.background,
            objects,
        })
    }

    /// Serializes the document as formatted JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors from scene-document parsing and serialization
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed scene document: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_wire_format_round_trip() {
        let descriptor = ObjectDescriptor::Box {
            name: Some("crate".to_string()),
            width: 1.0,
            height: 2.0,
            depth: 3.0,
            color: 0xff0000,
            position: Some(Vec3Data::new(0.0, 1.0, 0.0)),
            rotation: None,
            scale: None,
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"type\":\"box\""));
        assert!(!json.contains("rotation"));

        let back: ObjectDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let value = serde_json::json!({ "type": "torus", "radius": 1.0, "color": 0 });
        assert!(ObjectDescriptor::from_value(value).is_none());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let value = serde_json::json!({
            "type": "sphere",
            "radius": 2.0,
            "color": 0x00ff00,
            "editorOnly": true,
            "revision": 7
        });
        let descriptor = ObjectDescriptor::from_value(value).expect("extra fields must not reject");
        assert_eq!(descriptor.kind_name(), "sphere");
    }

    #[test]
    fn test_document_skips_bad_entries() {
        let json = r#"{
            "background": 1193046,
            "objects": [
                { "type": "box", "width": 1, "height": 1, "depth": 1, "color": 255 },
                { "type": "teapot", "color": 0 },
                { "type": "ambientLight", "color": 16777215, "intensity": 0.5 }
            ]
        }"#;

        let document = SceneDocument::from_json(json).unwrap();
        assert_eq!(document.background, 0x123456);
        assert_eq!(document.objects.len(), 2);
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        assert!(SceneDocument::from_json("{ not json").is_err());
        assert!(SceneDocument::from_json(r#"{ "objects": [] }"#).is_err());
    }
}
