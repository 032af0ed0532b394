// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport controller - mode state machine, selection and render buffers.
//!
//! The controller is the single owner of the scene snapshot, the selection
//! and the interaction mode. The surrounding UI drives it with typed
//! commands and drains [`ViewportEvent`]s after each call:
//!
//! ```text
//! on_press / on_drag / on_release ──► pick ──► selection / mode ──► buffers
//!                                                      │
//!                                                      └──► events
//! ```
//!
//! Store changes arrive only through [`ViewportController::update_scene_data`];
//! frame creation leaves as [`ViewportEvent::FrameCreationRequested`] and the
//! store decides whether it is valid.

use crate::camera::{OrbitCamera, ViewPreset, ViewPresetError};
use crate::grid::{compute_grid, GridSpec};
use crate::picking::{self, Pick, Projector, ScreenRect};
use crate::projection;
use crate::render::{RenderBuffers, SceneView, Visibility};
use crate::selection::SelectionState;
use crate::settings::ViewportSettings;
use crate::snapshot::SceneSnapshot;
use glam::{DVec2, DVec3};
use std::collections::BTreeSet;
use strucframe_editor_model::{Bounds, Frame, FrameId, Node, NodeId};

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl (Cmd on macOS)
    pub ctrl: bool,
    /// Shift
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };

    /// Ctrl only
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
}

/// Whether the controller used a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// Handled; the render layer should not act on it
    Consumed,
    /// Not handled; the render layer may orbit or pan the camera
    PassThrough,
}

impl InputResponse {
    /// Whether the event should reach the camera
    pub fn passes_through(self) -> bool {
        self == Self::PassThrough
    }
}

/// A box selection drag in progress, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDrag {
    /// Where the drag began
    pub start: DVec2,
    /// Latest pointer position
    pub current: DVec2,
}

impl BoxDrag {
    /// Normalized rectangle between the two corners
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::from_corners(self.start, self.current)
    }
}

/// Mode names without their transient state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Click to select
    Normal,
    /// Click two nodes to request a frame
    AddFrame,
    /// Drag a rectangle to select
    BoxSelect,
}

/// Current interaction mode with the state only that mode may hold
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    /// Click to select
    #[default]
    Normal,
    /// Click two nodes to request a frame
    AddFrame {
        /// Node chosen by the first click
        pending_first_node: Option<NodeId>,
    },
    /// Drag a rectangle to select
    BoxSelect {
        /// Drag in progress
        drag: Option<BoxDrag>,
    },
}

impl InteractionMode {
    /// Fresh mode with no transient state
    pub fn from_kind(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Normal => Self::Normal,
            ModeKind::AddFrame => Self::AddFrame {
                pending_first_node: None,
            },
            ModeKind::BoxSelect => Self::BoxSelect { drag: None },
        }
    }

    /// Mode name
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Normal => ModeKind::Normal,
            Self::AddFrame { .. } => ModeKind::AddFrame,
            Self::BoxSelect { .. } => ModeKind::BoxSelect,
        }
    }

    /// First node of an in-progress frame
    pub fn pending_first_node(&self) -> Option<NodeId> {
        match self {
            Self::AddFrame { pending_first_node } => *pending_first_node,
            _ => None,
        }
    }

    /// Box drag in progress
    pub fn drag(&self) -> Option<BoxDrag> {
        match self {
            Self::BoxSelect { drag } => *drag,
            _ => None,
        }
    }
}

/// World coordinate under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverReadout {
    /// Snapped node position or the Z = 0 plane hit
    pub point: DVec3,
    /// Whether `point` is a node position
    pub snapped: bool,
}

/// Notification from the controller to the surrounding UI
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    /// Selected node set after a viewport interaction
    NodeSelectionChanged(BTreeSet<NodeId>),
    /// Selected frame set after a viewport interaction
    FrameSelectionChanged(BTreeSet<FrameId>),
    /// Two distinct nodes were clicked in add-frame mode
    FrameCreationRequested {
        /// First clicked node
        node_a: NodeId,
        /// Second clicked node
        node_b: NodeId,
    },
    /// Pointer moved over the viewport
    CoordinateHover {
        /// World X
        x: f64,
        /// World Y
        y: f64,
        /// World Z
        z: f64,
        /// Whether the point is a node position
        snapped: bool,
    },
}

/// Owner of the viewport state
pub struct ViewportController {
    camera: OrbitCamera,
    snapshot: SceneSnapshot,
    selection: SelectionState,
    mode: InteractionMode,
    grid: GridSpec,
    visibility: Visibility,
    viewport_size: (f64, f64),
    settings: ViewportSettings,
    buffers: RenderBuffers,
    events: Vec<ViewportEvent>,
}

impl ViewportController {
    /// Create a controller with an empty scene
    pub fn new(settings: ViewportSettings) -> Self {
        let mut controller = Self {
            camera: settings.camera,
            snapshot: SceneSnapshot::default(),
            selection: SelectionState::new(),
            mode: InteractionMode::Normal,
            grid: GridSpec::default(),
            visibility: settings.visibility,
            viewport_size: (0.0, 0.0),
            settings,
            buffers: RenderBuffers::default(),
            events: Vec::new(),
        };
        controller.refresh_buffers();
        controller
    }

    /// Orbit camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Orbit camera for free-form navigation
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Matrices for the current camera and viewport size
    pub fn projector(&self) -> Projector {
        Projector::from_camera(&self.camera, self.viewport_size.0, self.viewport_size.1)
    }

    /// Current geometry
    pub fn snapshot(&self) -> &SceneSnapshot {
        &self.snapshot
    }

    /// Current selection
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selected node IDs
    pub fn selected_node_ids(&self) -> &BTreeSet<NodeId> {
        &self.selection.nodes
    }

    /// Selected frame IDs
    pub fn selected_frame_ids(&self) -> &BTreeSet<FrameId> {
        &self.selection.frames
    }

    /// Current mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Current grid
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Optional layers
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Settings the controller was created with
    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    /// Buffers for the current state
    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// Viewport size in pixels
    pub fn viewport_size(&self) -> (f64, f64) {
        self.viewport_size
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resize the viewport
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = (width.max(0.0), height.max(0.0));
    }

    /// Switch mode, dropping the previous mode's transient state
    pub fn set_mode(&mut self, kind: ModeKind) {
        let previous = self.mode.kind();
        self.mode = InteractionMode::from_kind(kind);
        if previous != kind {
            tracing::debug!("Viewport mode {:?} -> {:?}", previous, kind);
        }
        self.refresh_buffers();
    }

    /// Turn add-frame mode on or off
    pub fn set_add_frame_mode(&mut self, active: bool) {
        self.set_mode_active(ModeKind::AddFrame, active);
    }

    /// Turn box-selection mode on or off
    pub fn set_box_selection_mode(&mut self, active: bool) {
        self.set_mode_active(ModeKind::BoxSelect, active);
    }

    fn set_mode_active(&mut self, kind: ModeKind, active: bool) {
        if active {
            self.set_mode(kind);
        } else if self.mode.kind() == kind {
            self.set_mode(ModeKind::Normal);
        }
    }

    /// Replace the scene with fresh copies from the store.
    ///
    /// Selection and the pending add-frame node are pruned to the new
    /// snapshot before buffers are rebuilt.
    pub fn update_scene_data(&mut self, nodes: Vec<Node>, frames: Vec<Frame>) {
        self.snapshot = SceneSnapshot::new(nodes, frames);

        if self.selection.prune(&self.snapshot) {
            tracing::debug!("Pruned stale IDs from the selection");
        }
        if let InteractionMode::AddFrame { pending_first_node } = &mut self.mode {
            if pending_first_node.is_some_and(|id| !self.snapshot.contains_node(id)) {
                *pending_first_node = None;
            }
        }

        self.refresh_buffers();
    }

    /// Primary button pressed
    pub fn on_press(&mut self, x: f64, y: f64, modifiers: Modifiers) -> InputResponse {
        match self.mode {
            InteractionMode::BoxSelect { .. } => {
                let point = DVec2::new(x, y);
                self.mode = InteractionMode::BoxSelect {
                    drag: Some(BoxDrag {
                        start: point,
                        current: point,
                    }),
                };
                self.refresh_buffers();
                InputResponse::Consumed
            }
            InteractionMode::AddFrame { pending_first_node } => {
                let pick = self.pick(x, y);
                self.press_add_frame(pick, pending_first_node)
            }
            InteractionMode::Normal => {
                let pick = self.pick(x, y);
                self.press_normal(pick, modifiers)
            }
        }
    }

    fn press_add_frame(&mut self, pick: Option<Pick>, pending: Option<NodeId>) -> InputResponse {
        let next_pending = match (pick, pending) {
            (Some(Pick::Node(id)), None) => {
                tracing::debug!("Frame start node {}", id);
                Some(id)
            }
            (Some(Pick::Node(id)), Some(first)) if id != first => {
                tracing::debug!("Requesting frame {} -> {}", first, id);
                self.events.push(ViewportEvent::FrameCreationRequested {
                    node_a: first,
                    node_b: id,
                });
                None
            }
            _ => None,
        };

        self.mode = InteractionMode::AddFrame {
            pending_first_node: next_pending,
        };
        self.refresh_buffers();

        if pick.is_some() {
            InputResponse::Consumed
        } else {
            InputResponse::PassThrough
        }
    }

    fn press_normal(&mut self, pick: Option<Pick>, modifiers: Modifiers) -> InputResponse {
        match pick {
            Some(pick) => {
                if modifiers.ctrl {
                    self.selection.toggle(pick);
                } else {
                    self.selection.select_only(pick);
                }
                self.selection_changed();
                InputResponse::Consumed
            }
            None if modifiers.ctrl => InputResponse::PassThrough,
            None => {
                self.selection.clear();
                self.selection_changed();
                InputResponse::PassThrough
            }
        }
    }

    /// Pointer moved with the primary button held
    pub fn on_drag(&mut self, x: f64, y: f64) -> InputResponse {
        let InteractionMode::BoxSelect { drag: Some(drag) } = &mut self.mode else {
            return InputResponse::PassThrough;
        };
        drag.current = DVec2::new(x, y);
        self.refresh_buffers();
        InputResponse::Consumed
    }

    /// Primary button released
    pub fn on_release(&mut self, x: f64, y: f64, modifiers: Modifiers) -> InputResponse {
        let InteractionMode::BoxSelect { drag: Some(drag) } = self.mode else {
            return InputResponse::PassThrough;
        };
        self.mode = InteractionMode::BoxSelect { drag: None };

        let rect = ScreenRect::from_corners(drag.start, DVec2::new(x, y));
        if rect.is_at_least(self.settings.min_box_size) {
            let picked = picking::pick_rect(
                rect,
                &self.snapshot,
                &self.projector(),
                self.settings.min_box_size,
            );
            if modifiers.ctrl {
                self.selection.union(&picked);
            } else {
                self.selection.replace(picked);
            }
            self.selection_changed();
        } else {
            tracing::debug!("Box selection too small, ignored");
            self.refresh_buffers();
        }
        InputResponse::Consumed
    }

    /// Override the selection from a list view.
    ///
    /// A provided set replaces its counterpart; IDs missing from the snapshot
    /// are dropped. No selection events are emitted.
    pub fn set_selection(
        &mut self,
        node_ids: Option<BTreeSet<NodeId>>,
        frame_ids: Option<BTreeSet<FrameId>>,
    ) {
        if let Some(mut ids) = node_ids {
            ids.retain(|id| self.snapshot.contains_node(*id));
            self.selection.nodes = ids;
        }
        if let Some(mut ids) = frame_ids {
            ids.retain(|id| self.snapshot.contains_frame(*id));
            self.selection.frames = ids;
        }
        self.refresh_buffers();
    }

    /// World coordinate under a pixel, snapped to a nearby node
    pub fn hover(&self, x: f64, y: f64) -> Option<HoverReadout> {
        let projector = self.projector();
        if !projector.has_area() {
            return None;
        }
        let ray = projector.ray(x, y);

        let snapped = self
            .snapshot
            .nodes()
            .iter()
            .filter_map(|node| {
                let position = DVec3::new(node.x, node.y, node.z);
                let distance = projection::point_to_ray_distance(position, &ray)?;
                (distance < self.settings.snap_radius).then_some((position, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((point, _)) = snapped {
            return Some(HoverReadout {
                point,
                snapped: true,
            });
        }
        ray.intersect_z_plane(0.0).map(|point| HoverReadout {
            point,
            snapped: false,
        })
    }

    /// Pointer moved; queues a coordinate readout
    pub fn on_hover(&mut self, x: f64, y: f64) {
        if let Some(readout) = self.hover(x, y) {
            self.events.push(ViewportEvent::CoordinateHover {
                x: readout.point.x,
                y: readout.point.y,
                z: readout.point.z,
                snapped: readout.snapped,
            });
        }
    }

    /// Orient the camera to a preset, keeping distance and center
    pub fn set_view_direction(&mut self, preset: ViewPreset) {
        self.camera.apply_preset(preset);
        tracing::debug!("View direction {}", preset);
    }

    /// Orient the camera to a preset given by name
    pub fn set_view_direction_named(&mut self, name: &str) -> Result<(), ViewPresetError> {
        let preset = name.parse()?;
        self.set_view_direction(preset);
        Ok(())
    }

    /// Resize the grid to the model extents
    pub fn auto_adjust_grid(&mut self, bounds: &Bounds) {
        self.grid = compute_grid(bounds);
        tracing::debug!("Grid size {} spacing {}", self.grid.size, self.grid.spacing);
        self.refresh_buffers();
    }

    /// Show or hide the axes and grid
    pub fn toggle_axes(&mut self, visible: bool) {
        self.visibility.axes = visible;
        self.refresh_buffers();
    }

    /// Show or hide node ID labels
    pub fn toggle_node_labels(&mut self, visible: bool) {
        self.visibility.node_labels = visible;
        self.refresh_buffers();
    }

    /// Show or hide frame ID labels
    pub fn toggle_frame_labels(&mut self, visible: bool) {
        self.visibility.frame_labels = visible;
        self.refresh_buffers();
    }

    fn pick(&self, x: f64, y: f64) -> Option<Pick> {
        picking::pick_point(
            x,
            y,
            &self.snapshot,
            &self.projector(),
            &self.settings.pick_tolerance,
        )
    }

    fn selection_changed(&mut self) {
        self.refresh_buffers();
        self.events
            .push(ViewportEvent::NodeSelectionChanged(self.selection.nodes.clone()));
        self.events
            .push(ViewportEvent::FrameSelectionChanged(self.selection.frames.clone()));
    }

    fn refresh_buffers(&mut self) {
        self.buffers = RenderBuffers::build(&SceneView {
            snapshot: &self.snapshot,
            selection: &self.selection,
            pending_node: self.mode.pending_first_node(),
            grid: &self.grid,
            visibility: self.visibility,
            drag_rect: self.mode.drag().map(|drag| drag.rect()),
            palette: &self.settings.palette,
        });
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Top view from 100 units in an 800 x 600 viewport
    fn controller() -> ViewportController {
        let mut settings = ViewportSettings::default();
        settings.camera.distance = 100.0;
        settings.camera.apply_preset(ViewPreset::Top);
        let mut controller = ViewportController::new(settings);
        controller.set_viewport_size(800.0, 600.0);
        controller
    }

    fn nodes() -> Vec<Node> {
        vec![
            Node::new(NodeId(1), 0.0, 0.0, 0.0),
            Node::new(NodeId(2), 10.0, 0.0, 0.0),
            Node::new(NodeId(3), 0.0, 20.0, 0.0),
        ]
    }

    fn frames() -> Vec<Frame> {
        vec![
            Frame::new(FrameId(7), NodeId(2), NodeId(3)),
            Frame::new(FrameId(8), NodeId(1), NodeId(3)),
        ]
    }

    fn loaded() -> ViewportController {
        let mut controller = controller();
        controller.update_scene_data(nodes(), frames());
        controller
    }

    fn screen_of(controller: &ViewportController, x: f64, y: f64) -> DVec2 {
        controller.projector().project(DVec3::new(x, y, 0.0)).position()
    }

    fn ids<T: Ord + Copy>(items: &[T]) -> BTreeSet<T> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_click_node_replaces_frame_selection() {
        let mut controller = loaded();
        controller.set_selection(None, Some(ids(&[FrameId(7)])));
        assert!(controller.drain_events().is_empty());

        let p = screen_of(&controller, 0.0, 0.0);
        let response = controller.on_press(p.x, p.y, Modifiers::NONE);

        assert_eq!(response, InputResponse::Consumed);
        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(1)]));
        assert!(controller.selected_frame_ids().is_empty());
        assert_eq!(
            controller.drain_events(),
            vec![
                ViewportEvent::NodeSelectionChanged(ids(&[NodeId(1)])),
                ViewportEvent::FrameSelectionChanged(BTreeSet::new()),
            ]
        );
    }

    #[test]
    fn test_ctrl_click_deselects_node() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(1), NodeId(2)])), Some(ids(&[FrameId(8)])));

        let p = screen_of(&controller, 0.0, 0.0);
        controller.on_press(p.x, p.y, Modifiers::CTRL);

        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(2)]));
        assert_eq!(controller.selected_frame_ids(), &ids(&[FrameId(8)]));
    }

    #[test]
    fn test_click_frame() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(2)])), None);

        // Midpoint of frame 8, far from every node
        let p = screen_of(&controller, 0.0, 10.0);
        controller.on_press(p.x, p.y, Modifiers::NONE);

        assert!(controller.selected_node_ids().is_empty());
        assert_eq!(controller.selected_frame_ids(), &ids(&[FrameId(8)]));
        assert_eq!(controller.buffers().selected_frames.len(), 1);
    }

    #[test]
    fn test_empty_click() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(2)])), Some(ids(&[FrameId(7)])));

        // Ctrl on empty space keeps the selection and lets the camera orbit
        let response = controller.on_press(5.0, 5.0, Modifiers::CTRL);
        assert_eq!(response, InputResponse::PassThrough);
        assert_eq!(controller.selection().len(), 2);
        assert!(controller.drain_events().is_empty());

        let response = controller.on_press(5.0, 5.0, Modifiers::NONE);
        assert!(response.passes_through());
        assert!(controller.selection().is_empty());
        assert_eq!(controller.drain_events().len(), 2);
    }

    #[test]
    fn test_update_scene_data_is_idempotent() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(1)])), Some(ids(&[FrameId(7)])));
        controller.toggle_node_labels(true);

        let buffers = controller.buffers().clone();
        let selection = controller.selection().clone();
        controller.update_scene_data(nodes(), frames());
        controller.update_scene_data(nodes(), frames());

        assert_eq!(controller.buffers(), &buffers);
        assert_eq!(controller.selection(), &selection);
    }

    #[test]
    fn test_selection_pruned_to_snapshot() {
        let mut controller = loaded();
        controller.set_selection(
            Some(ids(&[NodeId(1), NodeId(2), NodeId(3)])),
            Some(ids(&[FrameId(7), FrameId(8)])),
        );

        let snapshots = [
            (nodes()[..2].to_vec(), vec![frames()[1]]),
            (vec![nodes()[0]], Vec::new()),
            (Vec::new(), Vec::new()),
        ];
        for (nodes, frames) in snapshots {
            let node_ids: BTreeSet<_> = nodes.iter().map(|n| n.id).collect();
            let frame_ids: BTreeSet<_> = frames.iter().map(|f| f.id).collect();
            controller.update_scene_data(nodes, frames);

            assert!(controller.selected_node_ids().is_subset(&node_ids));
            assert!(controller.selected_frame_ids().is_subset(&frame_ids));
            assert!(controller
                .buffers()
                .selected_frames
                .iter()
                .all(|s| frame_ids.contains(&s.id)));
        }
    }

    #[test]
    fn test_set_selection_drops_unknown_ids() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(1), NodeId(99)])), None);
        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(1)]));
    }

    #[test]
    fn test_add_frame_two_clicks() {
        let mut controller = loaded();
        controller.set_add_frame_mode(true);

        let a = screen_of(&controller, 0.0, 0.0);
        let b = screen_of(&controller, 10.0, 0.0);
        controller.on_press(a.x, a.y, Modifiers::NONE);
        assert_eq!(controller.mode().pending_first_node(), Some(NodeId(1)));
        let pending_color = controller.settings().palette.node_pending;
        assert_eq!(controller.buffers().nodes[0].color, pending_color);

        controller.on_press(b.x, b.y, Modifiers::NONE);
        assert_eq!(controller.mode().pending_first_node(), None);
        assert_eq!(
            controller.drain_events(),
            vec![ViewportEvent::FrameCreationRequested {
                node_a: NodeId(1),
                node_b: NodeId(2),
            }]
        );
        // Selection is untouched in add-frame mode
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn test_add_frame_cancel() {
        let mut controller = loaded();
        controller.set_add_frame_mode(true);
        let a = screen_of(&controller, 0.0, 0.0);

        // Same node twice
        controller.on_press(a.x, a.y, Modifiers::NONE);
        controller.on_press(a.x, a.y, Modifiers::NONE);
        assert_eq!(controller.mode().pending_first_node(), None);

        // Empty space after a first node
        controller.on_press(a.x, a.y, Modifiers::NONE);
        let response = controller.on_press(5.0, 5.0, Modifiers::NONE);
        assert_eq!(response, InputResponse::PassThrough);
        assert_eq!(controller.mode().pending_first_node(), None);

        // Frame after a first node
        controller.on_press(a.x, a.y, Modifiers::NONE);
        let mid = screen_of(&controller, 0.0, 10.0);
        assert_eq!(controller.on_press(mid.x, mid.y, Modifiers::NONE), InputResponse::Consumed);
        assert_eq!(controller.mode().pending_first_node(), None);

        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_pending_node_pruned() {
        let mut controller = loaded();
        controller.set_add_frame_mode(true);
        let a = screen_of(&controller, 0.0, 0.0);
        controller.on_press(a.x, a.y, Modifiers::NONE);

        controller.update_scene_data(nodes()[1..].to_vec(), Vec::new());
        assert_eq!(controller.mode().pending_first_node(), None);
        assert_eq!(controller.mode().kind(), ModeKind::AddFrame);
    }

    #[test]
    fn test_mode_exclusivity() {
        let mut controller = loaded();
        controller.set_add_frame_mode(true);
        let a = screen_of(&controller, 0.0, 0.0);
        controller.on_press(a.x, a.y, Modifiers::NONE);

        controller.set_box_selection_mode(true);
        assert_eq!(controller.mode(), &InteractionMode::BoxSelect { drag: None });

        controller.on_press(10.0, 10.0, Modifiers::NONE);
        assert!(controller.mode().drag().is_some());
        controller.set_add_frame_mode(true);
        assert_eq!(
            controller.mode(),
            &InteractionMode::AddFrame {
                pending_first_node: None
            }
        );
        assert!(controller.buffers().drag_rect.is_none());

        // Turning off the inactive mode changes nothing
        controller.set_box_selection_mode(false);
        assert_eq!(controller.mode().kind(), ModeKind::AddFrame);
        controller.set_add_frame_mode(false);
        assert_eq!(controller.mode(), &InteractionMode::Normal);
    }

    #[test]
    fn test_box_select() {
        let mut controller = loaded();
        controller.set_box_selection_mode(true);
        let a = screen_of(&controller, 0.0, 0.0);

        assert_eq!(controller.on_press(a.x - 20.0, a.y + 20.0, Modifiers::NONE), InputResponse::Consumed);
        controller.on_drag(a.x + 10.0, a.y);
        assert!(controller.buffers().drag_rect.is_some());
        // Nothing is picked mid-drag
        assert!(controller.selection().is_empty());

        controller.on_release(a.x + 20.0, a.y - 20.0, Modifiers::NONE);
        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(1)]));
        // Frame 8 has node 1 as an endpoint
        assert_eq!(controller.selected_frame_ids(), &ids(&[FrameId(8)]));
        assert!(controller.buffers().drag_rect.is_none());
        assert_eq!(controller.drain_events().len(), 2);

        // Ctrl adds to the selection
        let b = screen_of(&controller, 10.0, 0.0);
        controller.on_press(b.x - 10.0, b.y - 10.0, Modifiers::CTRL);
        controller.on_release(b.x + 10.0, b.y + 10.0, Modifiers::CTRL);
        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(1), NodeId(2)]));
        assert_eq!(controller.selected_frame_ids(), &ids(&[FrameId(7), FrameId(8)]));
    }

    #[test]
    fn test_degenerate_box_release() {
        let mut controller = loaded();
        controller.set_selection(Some(ids(&[NodeId(3)])), None);
        controller.set_box_selection_mode(true);

        controller.on_press(100.0, 100.0, Modifiers::NONE);
        controller.on_release(102.0, 300.0, Modifiers::NONE);

        assert_eq!(controller.selected_node_ids(), &ids(&[NodeId(3)]));
        assert!(controller.drain_events().is_empty());
        assert!(controller.mode().drag().is_none());
    }

    #[test]
    fn test_drag_outside_box_mode_passes_through() {
        let mut controller = loaded();
        assert!(controller.on_drag(10.0, 10.0).passes_through());
        assert!(controller.on_release(10.0, 10.0, Modifiers::NONE).passes_through());
    }

    #[test]
    fn test_hover() {
        let mut controller = loaded();

        let near_node = screen_of(&controller, 10.5, 0.5);
        let readout = controller.hover(near_node.x, near_node.y).unwrap();
        assert!(readout.snapped);
        assert_eq!(readout.point, DVec3::new(10.0, 0.0, 0.0));

        let empty = screen_of(&controller, 30.0, -25.0);
        let readout = controller.hover(empty.x, empty.y).unwrap();
        assert!(!readout.snapped);
        assert!(readout.point.distance(DVec3::new(30.0, -25.0, 0.0)) < 1.0e-4);

        controller.on_hover(empty.x, empty.y);
        assert!(matches!(
            controller.drain_events().as_slice(),
            [ViewportEvent::CoordinateHover { snapped: false, .. }]
        ));
    }

    #[test]
    fn test_hover_parallel_ray() {
        let mut controller = loaded();
        // No node on the center ray, so nothing to snap to
        controller.update_scene_data(vec![], vec![]);
        controller.set_view_direction(ViewPreset::Front);
        // Center pixel looks straight along +Y, parallel to the ground plane
        assert_eq!(controller.hover(400.0, 300.0), None);

        controller.set_viewport_size(0.0, 0.0);
        assert_eq!(controller.hover(0.0, 0.0), None);
    }

    #[test]
    fn test_view_direction() {
        let mut controller = loaded();
        controller.camera_mut().center = DVec3::new(5.0, 5.0, 0.0);
        controller.set_view_direction_named("ISO").unwrap();
        assert_eq!((controller.camera().elevation, controller.camera().azimuth), (30.0, 45.0));
        assert_eq!(controller.camera().distance, 100.0);
        assert_eq!(controller.camera().center, DVec3::new(5.0, 5.0, 0.0));

        assert!(controller.set_view_direction_named("BOTTOM").is_err());
        assert_eq!(controller.camera().elevation, 30.0);
    }

    #[test]
    fn test_grid_and_toggles() {
        let mut controller = loaded();
        controller.auto_adjust_grid(&Bounds::new(0.0, 1000.0, 0.0, 500.0, 0.0, 0.0));
        assert_eq!(controller.grid().size, 3000.0);
        assert_eq!(controller.grid().spacing, 100.0);

        controller.toggle_frame_labels(true);
        assert_eq!(controller.buffers().labels.len(), 2);
        controller.toggle_axes(false);
        assert!(controller.buffers().grid.is_empty());
        assert!(!controller.visibility().axes);
    }
}
