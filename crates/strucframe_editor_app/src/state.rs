// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! [`EditorState`] owns the model document, the viewport controller and the
//! list-view selection mirrors. Every model mutation goes through it so the
//! viewport, tables and grid are refreshed together.

use glam::DVec3;
use std::time::{Duration, Instant};
use strucframe_editor_model::{Document, FrameError, FrameId, MaterialError, MaterialId, NodeId};
use strucframe_editor_viewport::{
    HoverReadout, ModeKind, SelectionBridge, ViewportController, ViewportEvent, ViewportSettings,
};

/// How long a transient status message stays visible
pub const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Item chosen in the work tree, shown by the data panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataView {
    /// Node table
    #[default]
    Nodes,
    /// Frame table
    Frames,
    /// Material table
    Materials,
}

impl DataView {
    /// Every table, in work tree order
    pub const ALL: [Self; 3] = [Self::Nodes, Self::Frames, Self::Materials];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nodes => "Nodes",
            Self::Frames => "Frames",
            Self::Materials => "Materials",
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    expires_at: Instant,
}

/// Model, viewport and selection state shared by all panels
pub struct EditorState {
    /// Structural model
    pub document: Document,
    /// Viewport state machine
    pub controller: ViewportController,
    /// Table selection mirrors
    pub bridge: SelectionBridge,
    /// Table shown in the data panel
    pub data_view: DataView,
    /// Last coordinate reported by the viewport
    pub hover: Option<HoverReadout>,
    status: Option<StatusMessage>,
    terminal: Vec<String>,
}

impl EditorState {
    /// Create state for an empty model
    pub fn new(settings: ViewportSettings) -> Self {
        let mut state = Self {
            document: Document::new(),
            controller: ViewportController::new(settings),
            bridge: SelectionBridge::new(),
            data_view: DataView::default(),
            hover: None,
            status: None,
            terminal: Vec::new(),
        };
        state.refresh();
        state
    }

    /// Push the model into the viewport and tables and resize the grid
    pub fn refresh(&mut self) {
        self.controller
            .update_scene_data(self.document.node_list(), self.document.element_list());
        self.bridge.set_rows(
            self.document.nodes().map(|n| n.id),
            self.document.elements().map(|f| f.id),
        );
        self.sync_tables_from_viewport();
        self.controller.auto_adjust_grid(&self.document.model_bounds());
    }

    fn sync_tables_from_viewport(&mut self) {
        let nodes = self.controller.selected_node_ids().clone();
        let frames = self.controller.selected_frame_ids().clone();
        self.bridge.nodes.select_rows_by_ids(&nodes);
        self.bridge.frames.select_rows_by_ids(&frames);
    }

    /// Add a node at the given coordinates
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> NodeId {
        let id = self.document.add_node(x, y, z);
        tracing::info!("Node {} added at ({:.2}, {:.2}, {:.2})", id, x, y, z);
        self.terminal.push(format!(">> Joint Added: {id}"));
        self.refresh();
        id
    }

    /// Join two nodes with a frame; failures become a status message
    pub fn add_frame(&mut self, node_a: NodeId, node_b: NodeId) -> Result<FrameId, FrameError> {
        self.add_frame_at(node_a, node_b, Instant::now())
    }

    fn add_frame_at(
        &mut self,
        node_a: NodeId,
        node_b: NodeId,
        now: Instant,
    ) -> Result<FrameId, FrameError> {
        match self.document.add_element(node_a, node_b) {
            Ok(id) => {
                tracing::info!("Frame {} added between nodes {} and {}", id, node_a, node_b);
                self.terminal.push(format!(">> Frame Added: ID {id}"));
                self.refresh();
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Frame rejected: {e}");
                self.set_status_at("Invalid Frame", now);
                Err(e)
            }
        }
    }

    /// Define a material
    pub fn add_material(
        &mut self,
        name: &str,
        elastic_modulus: f64,
        poisson_ratio: f64,
        density: f64,
    ) -> Result<MaterialId, MaterialError> {
        let name = name.trim();
        match self
            .document
            .add_material(name, elastic_modulus, poisson_ratio, density)
        {
            Ok(id) => {
                tracing::info!("Material {} '{}' defined", id, name);
                self.terminal.push(format!(">> Material Added: {name}"));
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Material rejected: {e}");
                self.set_status(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete the selected frames, then the selected nodes with their frames.
    ///
    /// Returns the number of entities removed.
    pub fn delete_selected(&mut self) -> usize {
        let frames = self.controller.selected_frame_ids().clone();
        let nodes = self.controller.selected_node_ids().clone();
        if frames.is_empty() && nodes.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for id in frames {
            if self.document.delete_element(id).is_some() {
                self.terminal.push(format!(">> Frame {id} deleted."));
                removed += 1;
            }
        }
        for id in nodes {
            if self.document.delete_node(id).is_some() {
                self.terminal.push(format!(">> Node {id} deleted."));
                removed += 1;
            }
        }
        tracing::info!("Deleted {} selected entities", removed);

        self.controller
            .set_selection(Some(Default::default()), Some(Default::default()));
        self.refresh();
        removed
    }

    /// Number of selected nodes and frames
    pub fn selection_count(&self) -> usize {
        self.controller.selection().len()
    }

    /// Handle everything the viewport queued since the last call
    pub fn process_viewport_events(&mut self) {
        for event in self.controller.drain_events() {
            if self.bridge.apply_event(&event) {
                continue;
            }
            match event {
                ViewportEvent::FrameCreationRequested { node_a, node_b } => {
                    // Rejection is already reported through the status bar
                    let _ = self.add_frame(node_a, node_b);
                }
                ViewportEvent::CoordinateHover { x, y, z, snapped } => {
                    self.hover = Some(HoverReadout {
                        point: DVec3::new(x, y, z),
                        snapped,
                    });
                }
                ViewportEvent::NodeSelectionChanged(_) | ViewportEvent::FrameSelectionChanged(_) => {}
            }
        }
    }

    /// Clear the selection of the table on show, as if the user did it
    pub fn clear_table_selection(&mut self) {
        match self.data_view {
            DataView::Nodes => self.bridge.nodes.clear_by_user(),
            DataView::Frames => self.bridge.frames.clear_by_user(),
            DataView::Materials => {}
        }
    }

    /// Details of the selected entity when exactly one is selected
    pub fn selection_summary(&self) -> Option<String> {
        let nodes = self.controller.selected_node_ids();
        let frames = self.controller.selected_frame_ids();
        match (nodes.len(), frames.len()) {
            (1, 0) => {
                let node = nodes.first().and_then(|id| self.document.node(*id))?;
                Some(format!(
                    "Node {}: ({:.2}, {:.2}, {:.2})",
                    node.id, node.x, node.y, node.z
                ))
            }
            (0, 1) => {
                let frame = frames.first().and_then(|id| self.document.element(*id))?;
                Some(format!("Frame {}: {} - {}", frame.id, frame.node_a, frame.node_b))
            }
            _ => None,
        }
    }

    /// Send row clicks from the tables to the viewport
    pub fn process_table_selection(&mut self) {
        if let Some(update) = self.bridge.take_update() {
            tracing::debug!("Table selection changed");
            update.apply_to(&mut self.controller);
        }
    }

    /// Switch viewport mode
    pub fn set_mode(&mut self, kind: ModeKind) {
        self.controller.set_mode(kind);
    }

    /// Hint for the current mode
    pub fn mode_hint(&self) -> &'static str {
        match self.controller.mode().kind() {
            ModeKind::AddFrame => "Mode: Add Frame (Click Start Node -> Click End Node)",
            ModeKind::BoxSelect => "Mode: Box Selection (Drag mouse to select)",
            ModeKind::Normal => "Ready",
        }
    }

    /// Show a transient status message
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.set_status_at(text, Instant::now());
    }

    fn set_status_at(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: now + STATUS_DURATION,
        });
    }

    /// Status bar text: an unexpired message, otherwise the mode hint
    pub fn status_text(&self) -> &str {
        self.status_text_at(Instant::now())
    }

    fn status_text_at(&self, now: Instant) -> &str {
        match &self.status {
            Some(status) if now < status.expires_at => &status.text,
            _ => self.mode_hint(),
        }
    }

    /// Take operation messages for the terminal
    pub fn take_terminal_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.terminal)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(ViewportSettings::default())
    }
}
