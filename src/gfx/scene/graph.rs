//! # Scene Graph
//!
//! Flat add/remove container for the live scene. The graph exclusively owns
//! every node it holds (arena-style); the factory builds nodes and transfers
//! ownership on `add`. The background color lives here because it is part of
//! the persisted document.

use super::node::{NodeKind, SceneNode};

/// Default background: sky blue, matching a freshly authored scene
pub const DEFAULT_BACKGROUND: u32 = 0x87CEEB;

/// Root of the live scene: background color plus top-level nodes
pub struct SceneGraph {
    /// 24-bit RGB background color
    pub background: u32,
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Creates an empty graph with the default sky background
    pub fn new() -> Self {
        Self::with_background(DEFAULT_BACKGROUND)
    }

    pub fn with_background(background: u32) -> Self {
        Self {
            background,
            nodes: Vec::new(),
        }
    }

    /// Adds a node, taking ownership
    pub fn add(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Adds every node from the iterator
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = SceneNode>) {
        self.nodes.extend(nodes);
    }

    /// Removes and returns the root child at `index`, if present
    pub fn remove_at(&mut self, index: usize) -> Option<SceneNode> {
        if index < self.nodes.len() {
            Some(self.nodes.remove(index))
        } else {
            None
        }
    }

    /// Direct children of the graph root
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [SceneNode] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by its child-index path from the root
    pub fn node_at(&self, path: &[usize]) -> Option<&SceneNode> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.nodes.get(first)?;
        for &index in rest {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Releases GPU resources for every held node
    ///
    /// The node structure itself is untouched, and calling this repeatedly
    /// is safe; resource release is guarded per node.
    pub fn dispose(&mut self) {
        for node in &mut self.nodes {
            node.release_gpu();
        }
    }

    /// Removes every root child that is not an ambient or directional light
    ///
    /// Removed nodes have their GPU resources released on the way out. This
    /// is the graph half of the editor's "reset to default-lit empty scene".
    pub fn retain_lights(&mut self) {
        self.nodes.retain_mut(|node| {
            if node.kind.is_light() {
                true
            } else {
                node.release_gpu();
                false
            }
        });
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::node::{Geometry, Material, NodeKind};

    fn mesh() -> SceneNode {
        SceneNode::new(NodeKind::Mesh {
            geometry: Geometry::Sphere { radius: 1.0 },
            material: Material::new(0xffffff),
        })
    }

    fn ambient() -> SceneNode {
        SceneNode::new(NodeKind::AmbientLight {
            color: 0xffffff,
            intensity: 0.5,
        })
    }

    #[test]
    fn test_retain_lights_drops_meshes_only() {
        let mut graph = SceneGraph::new();
        graph.add(ambient());
        graph.add(mesh());
        graph.add(mesh());

        graph.retain_lights();
        assert_eq!(graph.len(), 1);
        assert!(graph.nodes()[0].kind.is_light());
    }

    #[test]
    fn test_dispose_twice_is_safe() {
        let mut graph = SceneGraph::new();
        graph.add(mesh());
        graph.dispose();
        graph.dispose();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_node_at_descends_children() {
        let mut parent = SceneNode::new(NodeKind::Group);
        let mut child = mesh();
        child.name = "inner".to_string();
        parent.children.push(child);

        let mut graph = SceneGraph::new();
        graph.add(parent);

        assert_eq!(graph.node_at(&[0, 0]).unwrap().name, "inner");
        assert!(graph.node_at(&[0, 1]).is_none());
        assert!(graph.node_at(&[]).is_none());
    }
}
