//! # Scene Editor
//!
//! The explicitly owned authoring context: scene graph, staging buffer, and
//! the live selection, with the batch build, clear, and JSON import/export
//! operations on top. Everything here is synchronous and GPU-free; the
//! renderer observes the graph between mutations, never during one.

use log::{info, warn};

use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::picking::{pick_scene, screen_to_ray, PickResult};
use crate::gfx::scene::graph::SceneGraph;
use crate::gfx::scene::node::SceneNode;
use crate::world::descriptor::{DocumentError, ObjectDescriptor, SceneDocument};
use crate::world::extract::extract_document;
use crate::world::factory::build_node;
use crate::world::staging::StagingBuffer;

/// Scene authoring state and operations
pub struct SceneEditor {
    graph: SceneGraph,
    staging: StagingBuffer,
    selected: Option<Vec<usize>>,
}

impl SceneEditor {
    /// Creates an editor holding a default-lit empty scene
    pub fn new() -> Self {
        let mut editor = Self {
            graph: SceneGraph::new(),
            staging: StagingBuffer::new(),
            selected: None,
        };
        editor.add_default_lighting();
        editor
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn staging(&self) -> &StagingBuffer {
        &self.staging
    }

    /// Replaces the current graph, disposing the old one first
    pub fn set_graph(&mut self, graph: SceneGraph) {
        self.graph.dispose();
        self.graph = graph;
        self.selected = None;
    }

    /// Stages a descriptor under a name for the next batch build
    pub fn add_object(&mut self, name: impl Into<String>, descriptor: ObjectDescriptor) {
        self.staging.insert(name, descriptor);
    }

    /// Builds every staged descriptor and adds the results to the graph
    ///
    /// Entries are consumed in insertion order. A descriptor the factory
    /// rejects is logged with its name and skipped; one bad entry never
    /// blocks the rest of the batch.
    pub fn load_staged_objects(&mut self) {
        for (name, descriptor) in self.staging.drain() {
            match build_node(&descriptor) {
                Ok(node) => self.graph.add(node),
                Err(err) => warn!("failed to build staged object {:?}: {}", name, err),
            }
        }
    }

    /// Resets to a default-lit empty scene
    ///
    /// Removes every node except ambient and directional lights (releasing
    /// their GPU resources), clears the staging buffer, and drops the live
    /// selection. Calling it twice leaves the same state as calling it once.
    pub fn clear(&mut self) {
        self.graph.retain_lights();
        self.staging.clear();
        self.selected = None;
    }

    /// Adds the default lighting rig: a soft white ambient light and a
    /// shadow-casting white directional light at (5, 5, 5)
    pub fn add_default_lighting(&mut self) {
        let rig = [
            ObjectDescriptor::AmbientLight {
                name: None,
                color: 0xffffff,
                intensity: 0.5,
            },
            ObjectDescriptor::DirectionalLight {
                name: None,
                color: 0xffffff,
                intensity: 1.0,
                position: Some(cgmath::Vector3::new(5.0, 5.0, 5.0).into()),
            },
        ];

        for descriptor in &rig {
            match build_node(descriptor) {
                Ok(node) => self.graph.add(node),
                // The rig descriptors are constants; this cannot fire for
                // data reasons, but the factory contract is fallible.
                Err(err) => warn!("failed to build default light: {}", err),
            }
        }
    }

    /// Replaces the scene with the contents of a JSON document
    ///
    /// The document is parsed in full before any mutation: malformed JSON is
    /// an error and the current scene stays untouched. On success the old
    /// graph is disposed, a fresh graph takes the document's background and
    /// the default lighting, and each entry is built in array order —
    /// entries the factory rejects are logged and skipped.
    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = SceneDocument::from_json(json)?;

        self.set_graph(SceneGraph::with_background(document.background));
        self.add_default_lighting();

        for descriptor in &document.objects {
            match build_node(descriptor) {
                Ok(node) => self.graph.add(node),
                Err(err) => warn!(
                    "skipping {} {:?} from document: {}",
                    descriptor.kind_name(),
                    descriptor.name().unwrap_or("unnamed"),
                    err
                ),
            }
        }

        info!(
            "imported scene: {} nodes, background #{:06x}",
            self.graph.len(),
            self.graph.background
        );
        Ok(())
    }

    /// Extracts the live graph into a portable document
    pub fn export_document(&self) -> SceneDocument {
        extract_document(&self.graph)
    }

    /// Serializes the live graph as formatted JSON
    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.export_document().to_json()
    }

    /// Resolves a pointer position to the nearest node and records it as
    /// the live selection
    ///
    /// `pointer` and `viewport` are in pixels. A miss returns `None` and
    /// clears any existing selection.
    pub fn pick(
        &mut self,
        pointer: (f32, f32),
        viewport: (f32, f32),
        camera: &PerspectiveCamera,
    ) -> Option<PickResult> {
        let ray = screen_to_ray(pointer, viewport, camera);
        let result = pick_scene(&ray, &self.graph);

        self.selected = result.as_ref().map(|r| r.path.clone());
        result
    }

    /// The currently selected node, if any
    pub fn selected(&self) -> Option<&SceneNode> {
        self.graph.node_at(self.selected.as_deref()?)
    }

    pub fn selected_path(&self) -> Option<&[usize]> {
        self.selected.as_deref()
    }
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::node::NodeKind;
    use crate::world::descriptor::Vec3Data;
    use cgmath::Vector3;

    fn box_descriptor(width: f32) -> ObjectDescriptor {
        ObjectDescriptor::Box {
            name: None,
            width,
            height: 1.0,
            depth: 1.0,
            color: 0xff0000,
            position: None,
            rotation: None,
            scale: None,
        }
    }

    fn mesh_count(editor: &SceneEditor) -> usize {
        editor
            .graph()
            .nodes()
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh { .. }))
            .count()
    }

    #[test]
    fn test_new_editor_has_default_lights() {
        let editor = SceneEditor::new();
        assert_eq!(editor.graph().len(), 2);
        assert!(editor.graph().nodes().iter().all(|n| n.kind.is_light()));
    }

    #[test]
    fn test_batch_build_isolates_failures() {
        let mut editor = SceneEditor::new();
        editor.add_object("first", box_descriptor(1.0));
        editor.add_object("broken", box_descriptor(-1.0));
        editor.add_object("third", box_descriptor(2.0));

        editor.load_staged_objects();

        assert_eq!(mesh_count(&editor), 2);
        assert!(editor.staging().is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut editor = SceneEditor::new();
        editor.add_object("a", box_descriptor(1.0));
        editor.load_staged_objects();
        editor.add_object("pending", box_descriptor(1.0));

        editor.clear();
        let after_once = editor.graph().len();
        assert_eq!(mesh_count(&editor), 0);
        assert!(editor.staging().is_empty());
        assert!(editor.selected_path().is_none());

        editor.clear();
        assert_eq!(editor.graph().len(), after_once);
    }

    #[test]
    fn test_import_example_scenario() {
        let json = r#"{
            "background": 8900331,
            "objects": [
                {
                    "type": "box",
                    "width": 1, "height": 1, "depth": 1,
                    "color": 16711680,
                    "position": { "x": 0, "y": 0, "z": 0 }
                }
            ]
        }"#;

        let mut editor = SceneEditor::new();
        editor.import_json(json).unwrap();

        assert_eq!(editor.graph().background, 0x87CEEB);
        assert_eq!(editor.graph().len(), 3); // 1 mesh + 2 default lights
        assert_eq!(mesh_count(&editor), 1);

        let document = editor.export_document();
        assert_eq!(document.objects.len(), 3);
        assert!(document.objects.iter().any(|d| matches!(
            d,
            ObjectDescriptor::Box { color, .. } if *color == 0xff0000
        )));
    }

    #[test]
    fn test_malformed_import_leaves_scene_untouched() {
        let mut editor = SceneEditor::new();
        editor.add_object("keep", box_descriptor(1.0));
        editor.load_staged_objects();
        let before = editor.graph().len();

        assert!(editor.import_json("{ this is not json").is_err());
        assert_eq!(editor.graph().len(), before);
        assert_eq!(mesh_count(&editor), 1);
    }

    #[test]
    fn test_import_replaces_previous_scene() {
        let mut editor = SceneEditor::new();
        editor.add_object("old", box_descriptor(1.0));
        editor.load_staged_objects();

        editor
            .import_json(r#"{ "background": 0, "objects": [] }"#)
            .unwrap();

        assert_eq!(editor.graph().background, 0);
        assert_eq!(mesh_count(&editor), 0);
        assert_eq!(editor.graph().len(), 2); // default lights only
    }

    #[test]
    fn test_pick_updates_and_clears_selection() {
        let mut editor = SceneEditor::new();
        editor.add_object(
            "target",
            ObjectDescriptor::Box {
                name: Some("target".to_string()),
                width: 1.0,
                height: 1.0,
                depth: 1.0,
                color: 0xffffff,
                position: Some(Vec3Data::new(0.0, 0.0, 0.0)),
                rotation: None,
                scale: None,
            },
        );
        editor.load_staged_objects();

        let mut camera = PerspectiveCamera::new(1.0);
        camera.eye = Vector3::new(0.0, 0.0, 5.0);
        camera.target = Vector3::new(0.0, 0.0, 0.0);

        let hit = editor.pick((400.0, 300.0), (800.0, 600.0), &camera);
        assert!(hit.is_some());
        assert_eq!(editor.selected().unwrap().name, "target");

        // Aim at empty space: selection must clear.
        let miss = editor.pick((1.0, 1.0), (800.0, 600.0), &camera);
        assert!(miss.is_none());
        assert!(editor.selected_path().is_none());
    }

    #[test]
    fn test_export_skips_unsupported_mesh() {
        use crate::gfx::geometry::GeometryData;
        use crate::gfx::scene::node::{Geometry, Material};

        let mut editor = SceneEditor::new();
        editor.graph_mut().add(SceneNode::new(NodeKind::Mesh {
            geometry: Geometry::Custom(GeometryData::new()),
            material: Material::new(0xffffff),
        }));

        let document = editor.export_document();
        assert_eq!(document.objects.len(), 2); // default lights only
    }
}
