// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame (beam element) definitions.

use crate::node::NodeId;
use std::fmt;

/// Unique identifier for a frame, assigned sequentially from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u32);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line element joining two distinct nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Frame ID
    pub id: FrameId,
    /// Start node
    pub node_a: NodeId,
    /// End node
    pub node_b: NodeId,
}

impl Frame {
    /// Create a new frame
    pub fn new(id: FrameId, node_a: NodeId, node_b: NodeId) -> Self {
        Self { id, node_a, node_b }
    }

    /// Check if this frame joins the given pair, in either direction
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.node_a == a && self.node_b == b) || (self.node_a == b && self.node_b == a)
    }

    /// Check if this frame involves a specific node
    pub fn involves(&self, node: NodeId) -> bool {
        self.node_a == node || self.node_b == node
    }
}
