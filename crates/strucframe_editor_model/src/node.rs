// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node (joint) definitions.

use std::fmt;

/// Unique identifier for a node, assigned sequentially from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structural joint in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Node ID
    pub id: NodeId,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    /// Position as an `[x, y, z]` array
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
