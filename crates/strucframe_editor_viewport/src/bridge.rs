// SPDX-License-Identifier: MIT OR Apache-2.0
//! Selection sync between the viewport and list views.
//!
//! Each list keeps its own mirror of the selected rows. Viewport events are
//! written into the mirrors programmatically and never come back out as user
//! changes, so a selection made in the viewport cannot echo back into it.
//! Row clicks are recorded as user changes and handed to the controller
//! through [`SelectionUpdate::apply_to`].

use crate::controller::{Modifiers, ViewportController, ViewportEvent};
use std::collections::BTreeSet;
use strucframe_editor_model::{FrameId, NodeId};

/// Rows and selected rows of one list view
#[derive(Debug, Clone)]
pub struct ListSelection<Id> {
    rows: Vec<Id>,
    selected: BTreeSet<Id>,
    anchor: Option<Id>,
    user_change: Option<BTreeSet<Id>>,
}

impl<Id> Default for ListSelection<Id> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: BTreeSet::new(),
            anchor: None,
            user_change: None,
        }
    }
}

impl<Id: Copy + Ord> ListSelection<Id> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in display order
    pub fn rows(&self) -> &[Id] {
        &self.rows
    }

    /// Selected rows
    pub fn selected(&self) -> &BTreeSet<Id> {
        &self.selected
    }

    /// Whether a row is selected
    pub fn is_selected(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    /// Replace the rows, dropping selection of rows that disappeared
    pub fn set_rows(&mut self, rows: impl IntoIterator<Item = Id>) {
        self.rows = rows.into_iter().collect();
        let rows = &self.rows;
        self.selected.retain(|id| rows.contains(id));
        if self.anchor.is_some_and(|a| !self.rows.contains(&a)) {
            self.anchor = None;
        }
    }

    /// Select exactly these rows without reporting a user change
    pub fn select_rows_by_ids(&mut self, ids: &BTreeSet<Id>) {
        self.selected = ids.iter().copied().filter(|id| self.rows.contains(id)).collect();
    }

    /// A row was clicked.
    ///
    /// Plain click selects only that row, Ctrl toggles it, Shift selects the
    /// contiguous range from the last clicked row (added to the selection
    /// when Ctrl is also held).
    pub fn click_row(&mut self, id: Id, modifiers: Modifiers) {
        let Some(index) = self.rows.iter().position(|row| *row == id) else {
            return;
        };

        let anchor_index = self
            .anchor
            .and_then(|a| self.rows.iter().position(|row| *row == a));

        match (modifiers.shift, anchor_index) {
            (true, Some(anchor_index)) => {
                let (lo, hi) = (anchor_index.min(index), anchor_index.max(index));
                if !modifiers.ctrl {
                    self.selected.clear();
                }
                self.selected.extend(self.rows[lo..=hi].iter().copied());
            }
            _ if modifiers.ctrl => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                self.anchor = Some(id);
            }
            _ => {
                self.selected.clear();
                self.selected.insert(id);
                self.anchor = Some(id);
            }
        }

        self.user_change = Some(self.selected.clone());
    }

    /// Clear the selection as a user action
    pub fn clear_by_user(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.user_change = Some(BTreeSet::new());
    }

    /// Take the selection produced by the last user action, if any
    pub fn take_user_change(&mut self) -> Option<BTreeSet<Id>> {
        self.user_change.take()
    }
}

/// User edits from the list views, ready for the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionUpdate {
    /// New node selection, if the node list changed
    pub node_ids: Option<BTreeSet<NodeId>>,
    /// New frame selection, if the frame list changed
    pub frame_ids: Option<BTreeSet<FrameId>>,
}

impl SelectionUpdate {
    /// Push the update into the controller
    pub fn apply_to(self, controller: &mut ViewportController) {
        controller.set_selection(self.node_ids, self.frame_ids);
    }
}

/// Node and frame list mirrors
#[derive(Debug, Clone, Default)]
pub struct SelectionBridge {
    /// Node table
    pub nodes: ListSelection<NodeId>,
    /// Frame table
    pub frames: ListSelection<FrameId>,
}

impl SelectionBridge {
    /// Create empty mirrors
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the rows of both lists
    pub fn set_rows(
        &mut self,
        node_ids: impl IntoIterator<Item = NodeId>,
        frame_ids: impl IntoIterator<Item = FrameId>,
    ) {
        self.nodes.set_rows(node_ids);
        self.frames.set_rows(frame_ids);
    }

    /// Mirror a viewport selection event into the lists.
    ///
    /// Returns whether the event was a selection event.
    pub fn apply_event(&mut self, event: &ViewportEvent) -> bool {
        match event {
            ViewportEvent::NodeSelectionChanged(ids) => {
                self.nodes.select_rows_by_ids(ids);
                true
            }
            ViewportEvent::FrameSelectionChanged(ids) => {
                self.frames.select_rows_by_ids(ids);
                true
            }
            _ => false,
        }
    }

    /// Collect pending user edits from both lists
    pub fn take_update(&mut self) -> Option<SelectionUpdate> {
        let update = SelectionUpdate {
            node_ids: self.nodes.take_user_change(),
            frame_ids: self.frames.take_user_change(),
        };
        (update.node_ids.is_some() || update.frame_ids.is_some()).then_some(update)
    }
}
