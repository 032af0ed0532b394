// SPDX-License-Identifier: MIT OR Apache-2.0
//! Selected node and frame IDs.

use crate::picking::{Pick, RectPick};
use crate::snapshot::SceneSnapshot;
use std::collections::BTreeSet;
use strucframe_editor_model::{FrameId, NodeId};

/// Two independent ID sets; iteration is in ascending ID order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected nodes
    pub nodes: BTreeSet<NodeId>,
    /// Selected frames
    pub frames: BTreeSet<FrameId>,
}

impl SelectionState {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the picked entity is selected
    pub fn contains(&self, pick: Pick) -> bool {
        match pick {
            Pick::Node(id) => self.nodes.contains(&id),
            Pick::Frame(id) => self.frames.contains(&id),
        }
    }

    /// Select only this entity, dropping everything of the other kind
    pub fn select_only(&mut self, pick: Pick) {
        self.clear();
        match pick {
            Pick::Node(id) => {
                self.nodes.insert(id);
            }
            Pick::Frame(id) => {
                self.frames.insert(id);
            }
        }
    }

    /// Flip membership of one entity, leaving the other kind untouched
    pub fn toggle(&mut self, pick: Pick) {
        match pick {
            Pick::Node(id) => {
                if !self.nodes.remove(&id) {
                    self.nodes.insert(id);
                }
            }
            Pick::Frame(id) => {
                if !self.frames.remove(&id) {
                    self.frames.insert(id);
                }
            }
        }
    }

    /// Add everything from a box pick
    pub fn union(&mut self, other: &RectPick) {
        self.nodes.extend(other.node_ids.iter().copied());
        self.frames.extend(other.frame_ids.iter().copied());
    }

    /// Replace both sets with a box pick
    pub fn replace(&mut self, other: RectPick) {
        self.nodes = other.node_ids;
        self.frames = other.frame_ids;
    }

    /// Drop IDs that are no longer in the snapshot; returns whether anything changed
    pub fn prune(&mut self, snapshot: &SceneSnapshot) -> bool {
        let before = (self.nodes.len(), self.frames.len());
        self.nodes.retain(|id| snapshot.contains_node(*id));
        self.frames.retain(|id| snapshot.contains_frame(*id));
        before != (self.nodes.len(), self.frames.len())
    }

    /// Clear both sets
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.frames.clear();
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.frames.is_empty()
    }

    /// Total number of selected entities
    pub fn len(&self) -> usize {
        self.nodes.len() + self.frames.len()
    }
}
