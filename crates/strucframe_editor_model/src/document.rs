// SPDX-License-Identifier: MIT OR Apache-2.0
//! The structural model document.

use crate::bounds::Bounds;
use crate::frame::{Frame, FrameId};
use crate::material::{Material, MaterialError, MaterialId};
use crate::node::{Node, NodeId};
use indexmap::IndexMap;

/// Structural model holding nodes, frames and materials in creation order
#[derive(Debug, Clone)]
pub struct Document {
    nodes: IndexMap<NodeId, Node>,
    frames: IndexMap<FrameId, Frame>,
    materials: IndexMap<MaterialId, Material>,
    next_node_id: u32,
    next_frame_id: u32,
    next_material_id: u32,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            frames: IndexMap::new(),
            materials: IndexMap::new(),
            next_node_id: 1,
            next_frame_id: 1,
            next_material_id: 1,
        }
    }

    /// Add a node and return its ID
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, Node::new(id, x, y, z));
        tracing::debug!("Added node {} at ({}, {}, {})", id, x, y, z);
        id
    }

    /// Add a frame between two existing, distinct nodes
    pub fn add_element(&mut self, node_a: NodeId, node_b: NodeId) -> Result<FrameId, FrameError> {
        if node_a == node_b {
            return Err(FrameError::SelfLoop(node_a));
        }
        for node in [node_a, node_b] {
            if !self.nodes.contains_key(&node) {
                return Err(FrameError::NodeNotFound(node));
            }
        }
        if let Some(existing) = self.frames.values().find(|f| f.connects(node_a, node_b)) {
            return Err(FrameError::Duplicate {
                existing: existing.id,
                node_a,
                node_b,
            });
        }

        let id = FrameId(self.next_frame_id);
        self.next_frame_id += 1;
        self.frames.insert(id, Frame::new(id, node_a, node_b));
        tracing::debug!("Added frame {} ({} -> {})", id, node_a, node_b);
        Ok(id)
    }

    /// Define a new material
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        elastic_modulus: f64,
        poisson_ratio: f64,
        density: f64,
    ) -> Result<MaterialId, MaterialError> {
        let name = name.into();
        Material::validate(&name, elastic_modulus, poisson_ratio, density)?;

        let id = MaterialId(self.next_material_id);
        self.next_material_id += 1;
        self.materials.insert(
            id,
            Material {
                id,
                name,
                elastic_modulus,
                poisson_ratio,
                density,
            },
        );
        Ok(id)
    }

    /// Remove a node together with every frame attached to it
    pub fn delete_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;
        let before = self.frames.len();
        self.frames.retain(|_, f| !f.involves(node_id));
        let cascaded = before - self.frames.len();
        if cascaded > 0 {
            tracing::debug!("Deleting node {} removed {} attached frames", node_id, cascaded);
        }
        Some(node)
    }

    /// Remove a frame
    pub fn delete_element(&mut self, frame_id: FrameId) -> Option<Frame> {
        self.frames.shift_remove(&frame_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a frame by ID
    pub fn element(&self, frame_id: FrameId) -> Option<&Frame> {
        self.frames.get(&frame_id)
    }

    /// Get a material by ID
    pub fn material(&self, material_id: MaterialId) -> Option<&Material> {
        self.materials.get(&material_id)
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All frames in creation order
    pub fn elements(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    /// All materials in creation order
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Copy of all nodes, for handing to views
    pub fn node_list(&self) -> Vec<Node> {
        self.nodes.values().copied().collect()
    }

    /// Copy of all frames, for handing to views
    pub fn element_list(&self) -> Vec<Frame> {
        self.frames.values().copied().collect()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of frames
    pub fn element_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Extents of all nodes, or [`Bounds::EMPTY_MODEL`] when there are none
    pub fn model_bounds(&self) -> Bounds {
        Bounds::from_points(self.nodes.values().map(Node::position)).unwrap_or(Bounds::EMPTY_MODEL)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when creating a frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Both ends are the same node
    #[error("Frame cannot start and end at node {0}")]
    SelfLoop(NodeId),

    /// The node pair is already joined
    #[error("Nodes {node_a} and {node_b} are already joined by frame {existing}")]
    Duplicate {
        /// Frame already joining the pair
        existing: FrameId,
        /// Requested start node
        node_a: NodeId,
        /// Requested end node
        node_b: NodeId,
    },

    /// An endpoint does not exist
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}
