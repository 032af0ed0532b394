// SPDX-License-Identifier: MIT OR Apache-2.0
//! The controller's copy of the model geometry.

use glam::DVec3;
use std::collections::HashMap;
use strucframe_editor_model::{Frame, FrameId, Node, NodeId};

/// Nodes and frames as last pushed by the store, in store order
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    nodes: Vec<Node>,
    frames: Vec<Frame>,
    node_index: HashMap<NodeId, usize>,
    frame_index: HashMap<FrameId, usize>,
}

impl SceneSnapshot {
    /// Build a snapshot from ordered copies
    pub fn new(nodes: Vec<Node>, frames: Vec<Frame>) -> Self {
        let node_index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let frame_index = frames.iter().enumerate().map(|(i, f)| (f.id, i)).collect();
        Self {
            nodes,
            frames,
            node_index,
            frame_index,
        }
    }

    /// Nodes in store order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Frames in store order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// World position of a node
    pub fn node_position(&self, id: NodeId) -> Option<DVec3> {
        self.node(id).map(|n| DVec3::new(n.x, n.y, n.z))
    }

    /// World endpoints of a frame; `None` if an endpoint is missing
    pub fn frame_endpoints(&self, frame: &Frame) -> Option<(DVec3, DVec3)> {
        Some((self.node_position(frame.node_a)?, self.node_position(frame.node_b)?))
    }

    /// Whether a node ID is present
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Whether a frame ID is present
    pub fn contains_frame(&self, id: FrameId) -> bool {
        self.frame_index.contains_key(&id)
    }

    /// True when there is nothing to pick
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SceneSnapshot {
        SceneSnapshot::new(
            vec![
                Node::new(NodeId(1), 0.0, 0.0, 0.0),
                Node::new(NodeId(4), 10.0, 0.0, 0.0),
                Node::new(NodeId(9), 10.0, 10.0, 2.0),
            ],
            vec![
                Frame::new(FrameId(3), NodeId(1), NodeId(4)),
                Frame::new(FrameId(5), NodeId(4), NodeId(9)),
                Frame::new(FrameId(6), NodeId(9), NodeId(2)),
            ],
        )
    }

    #[test]
    fn test_lookup_by_id_with_gaps() {
        let snapshot = snapshot();
        assert_eq!(snapshot.node_position(NodeId(9)), Some(DVec3::new(10.0, 10.0, 2.0)));
        assert!(snapshot.node(NodeId(2)).is_none());

        assert!(snapshot.contains_frame(FrameId(3)));
        assert!(snapshot.contains_frame(FrameId(6)));
        assert!(!snapshot.contains_frame(FrameId(4)));
        assert!(!snapshot.contains_frame(FrameId(1)));
    }

    #[test]
    fn test_frame_with_missing_endpoint() {
        let snapshot = snapshot();
        let endpoints: Vec<_> = snapshot
            .frames()
            .iter()
            .map(|f| snapshot.frame_endpoints(f))
            .collect();
        assert_eq!(endpoints[0], Some((DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))));
        assert!(endpoints[1].is_some());
        assert_eq!(endpoints[2], None);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SceneSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains_frame(FrameId(1)));
        assert!(!snapshot.contains_node(NodeId(1)));
    }
}
