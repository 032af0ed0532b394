// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render buffers derived from the controller state.
//!
//! Buffers are plain data in world space (plus the drag rectangle in
//! pixels) so any render layer can draw them. They are rebuilt from scratch
//! on every state change and never edited in place.

use crate::grid::GridSpec;
use crate::picking::{Pick, ScreenRect};
use crate::selection::SelectionState;
use crate::snapshot::SceneSnapshot;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use strucframe_editor_model::{FrameId, NodeId};

/// Linear RGBA in `0..=1`
pub type Color = [f32; 4];

/// Length of each axis line from the origin
pub const AXIS_LENGTH: f64 = 50.0;

/// Axis label scale
pub const AXIS_LABEL_SCALE: f64 = 2.5;

/// ID label scale
pub const ID_LABEL_SCALE: f64 = 0.5;

/// Colors used when building buffers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Viewport background
    pub background: Color,
    /// Unselected node
    pub node: Color,
    /// Selected node
    pub node_selected: Color,
    /// First node of an in-progress frame
    pub node_pending: Color,
    /// Unselected frame
    pub frame: Color,
    /// Selected frame
    pub frame_selected: Color,
    /// Node ID labels
    pub node_label: Color,
    /// Frame ID labels
    pub frame_label: Color,
    /// Grid lines
    pub grid: Color,
    /// X, Y and Z axis colors
    pub axes: [Color; 3],
    /// Box selection outline
    pub selection_box: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [1.0, 1.0, 1.0, 1.0],
            node: [0.0, 0.0, 1.0, 1.0],
            node_selected: [1.0, 0.0, 0.0, 1.0],
            node_pending: [0.0, 1.0, 0.0, 1.0],
            frame: [0.4, 0.4, 0.4, 1.0],
            frame_selected: [1.0, 0.0, 0.0, 1.0],
            node_label: [0.0, 0.0, 0.0, 1.0],
            frame_label: [0.0, 0.0, 0.5, 1.0],
            grid: [0.2, 0.2, 0.2, 0.16],
            axes: [[1.0, 0.0, 0.0, 1.0], [0.0, 0.6, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
            selection_box: [0.2, 0.4, 1.0, 1.0],
        }
    }
}

/// A node marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    /// Node shown
    pub id: NodeId,
    /// World position
    pub position: DVec3,
    /// Fill color
    pub color: Color,
}

/// A frame line between its two node positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSegment {
    /// Frame shown
    pub id: FrameId,
    /// Start node position
    pub start: DVec3,
    /// End node position
    pub end: DVec3,
}

/// A colored world-space line that is not a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point
    pub start: DVec3,
    /// End point
    pub end: DVec3,
    /// Stroke color
    pub color: Color,
}

/// Text placed in the world, drawn with [`crate::labels::vector_text`]
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    /// Characters to draw
    pub text: String,
    /// Baseline origin
    pub position: DVec3,
    /// Glyph cell scale
    pub scale: f64,
    /// Stroke color
    pub color: Color,
}

/// Which optional layers are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    /// Axes and the reference grid
    pub axes: bool,
    /// Node ID labels
    pub node_labels: bool,
    /// Frame ID labels
    pub frame_labels: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            axes: true,
            node_labels: false,
            frame_labels: false,
        }
    }
}

/// Everything a render layer needs for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffers {
    /// Node markers in snapshot order
    pub nodes: Vec<NodePoint>,
    /// Unselected frames
    pub frames: Vec<FrameSegment>,
    /// Selected frames, drawn wider on top
    pub selected_frames: Vec<FrameSegment>,
    /// Node and frame ID labels
    pub labels: Vec<LabelAnchor>,
    /// Reference grid on Z = 0
    pub grid: Vec<[DVec3; 2]>,
    /// Axis lines
    pub axes: Vec<LineSegment>,
    /// Axis name labels
    pub axis_labels: Vec<LabelAnchor>,
    /// In-progress box selection, in pixels
    pub drag_rect: Option<ScreenRect>,
}

/// Inputs for [`RenderBuffers::build`]
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    /// Geometry
    pub snapshot: &'a SceneSnapshot,
    /// Highlighted entities
    pub selection: &'a SelectionState,
    /// First node of an in-progress frame
    pub pending_node: Option<NodeId>,
    /// Grid to draw under the model
    pub grid: &'a GridSpec,
    /// Optional layers
    pub visibility: Visibility,
    /// In-progress box selection
    pub drag_rect: Option<ScreenRect>,
    /// Colors
    pub palette: &'a Palette,
}

impl RenderBuffers {
    /// Rebuild every buffer
    pub fn build(scene: &SceneView<'_>) -> Self {
        let SceneView {
            snapshot,
            selection,
            pending_node,
            grid,
            visibility,
            drag_rect,
            palette,
        } = *scene;

        let nodes = snapshot
            .nodes()
            .iter()
            .map(|node| {
                let color = if selection.contains(Pick::Node(node.id)) {
                    palette.node_selected
                } else if pending_node == Some(node.id) {
                    palette.node_pending
                } else {
                    palette.node
                };
                NodePoint {
                    id: node.id,
                    position: DVec3::new(node.x, node.y, node.z),
                    color,
                }
            })
            .collect();

        let mut frames = Vec::new();
        let mut selected_frames = Vec::new();
        let mut labels = Vec::new();

        if visibility.node_labels {
            labels.extend(snapshot.nodes().iter().map(|node| LabelAnchor {
                text: node.id.to_string(),
                position: DVec3::new(node.x + 1.0, node.y, node.z + 1.0),
                scale: ID_LABEL_SCALE,
                color: palette.node_label,
            }));
        }

        for frame in snapshot.frames() {
            let Some((start, end)) = snapshot.frame_endpoints(frame) else {
                continue;
            };
            let segment = FrameSegment {
                id: frame.id,
                start,
                end,
            };
            if selection.contains(Pick::Frame(frame.id)) {
                selected_frames.push(segment);
            } else {
                frames.push(segment);
            }

            if visibility.frame_labels {
                labels.push(LabelAnchor {
                    text: format!("F{}", frame.id),
                    position: (start + end) / 2.0 + DVec3::Z,
                    scale: ID_LABEL_SCALE,
                    color: palette.frame_label,
                });
            }
        }

        let (grid, axes, axis_labels) = if visibility.axes {
            axis_layers(grid, palette)
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };

        Self {
            nodes,
            frames,
            selected_frames,
            labels,
            grid,
            axes,
            axis_labels,
            drag_rect,
        }
    }
}

/// Grid lines, axis lines and axis labels
fn axis_layers(grid: &GridSpec, palette: &Palette) -> (Vec<[DVec3; 2]>, Vec<LineSegment>, Vec<LabelAnchor>) {
    let directions = [("X", DVec3::X), ("Y", DVec3::Y), ("Z", DVec3::Z)];

    let axes = directions
        .iter()
        .zip(palette.axes)
        .map(|(&(_, dir), color)| LineSegment {
            start: DVec3::ZERO,
            end: dir * AXIS_LENGTH,
            color,
        })
        .collect();

    let axis_labels = directions
        .iter()
        .zip(palette.axes)
        .map(|(&(name, dir), color)| LabelAnchor {
            text: name.to_string(),
            position: dir * (AXIS_LENGTH + 5.0),
            scale: AXIS_LABEL_SCALE,
            color,
        })
        .collect();

    (grid.lines(), axes, axis_labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strucframe_editor_model::{Frame, Node};

    fn snapshot() -> SceneSnapshot {
        SceneSnapshot::new(
            vec![
                Node::new(NodeId(1), 0.0, 0.0, 0.0),
                Node::new(NodeId(2), 10.0, 0.0, 0.0),
                Node::new(NodeId(3), 10.0, 10.0, 4.0),
            ],
            vec![
                Frame::new(FrameId(1), NodeId(1), NodeId(2)),
                Frame::new(FrameId(2), NodeId(2), NodeId(3)),
            ],
        )
    }

    fn build(selection: &SelectionState, pending: Option<NodeId>, visibility: Visibility) -> RenderBuffers {
        let snapshot = snapshot();
        let grid = GridSpec::default();
        let palette = Palette::default();
        RenderBuffers::build(&SceneView {
            snapshot: &snapshot,
            selection,
            pending_node: pending,
            grid: &grid,
            visibility,
            drag_rect: None,
            palette: &palette,
        })
    }

    #[test]
    fn test_node_colors() {
        let palette = Palette::default();
        let mut selection = SelectionState::new();
        selection.nodes.insert(NodeId(2));

        let buffers = build(&selection, Some(NodeId(3)), Visibility::default());
        let colors: Vec<_> = buffers.nodes.iter().map(|n| n.color).collect();
        assert_eq!(colors, vec![palette.node, palette.node_selected, palette.node_pending]);
    }

    #[test]
    fn test_frames_split_by_selection() {
        let mut selection = SelectionState::new();
        selection.frames.insert(FrameId(2));

        let buffers = build(&selection, None, Visibility::default());
        assert_eq!(buffers.frames.len(), 1);
        assert_eq!(buffers.frames[0].id, FrameId(1));
        assert_eq!(buffers.selected_frames.len(), 1);
        assert_eq!(buffers.selected_frames[0].end, DVec3::new(10.0, 10.0, 4.0));
    }

    #[test]
    fn test_labels_follow_toggles() {
        let selection = SelectionState::new();
        let hidden = build(&selection, None, Visibility::default());
        assert!(hidden.labels.is_empty());

        let shown = build(
            &selection,
            None,
            Visibility {
                axes: true,
                node_labels: true,
                frame_labels: true,
            },
        );
        assert_eq!(shown.labels.len(), 5);
        assert_eq!(shown.labels[0].text, "1");
        assert_eq!(shown.labels[0].position, DVec3::new(1.0, 0.0, 1.0));
        let frame_label = shown.labels.iter().find(|l| l.text == "F2").unwrap();
        assert_eq!(frame_label.position, DVec3::new(10.0, 5.0, 3.0));
    }

    #[test]
    fn test_axes_toggle_hides_grid() {
        let selection = SelectionState::new();
        let shown = build(&selection, None, Visibility::default());
        assert_eq!(shown.axes.len(), 3);
        assert_eq!(shown.axis_labels[2].position, DVec3::new(0.0, 0.0, 55.0));
        assert!(!shown.grid.is_empty());

        let hidden = build(
            &selection,
            None,
            Visibility {
                axes: false,
                ..Visibility::default()
            },
        );
        assert!(hidden.axes.is_empty());
        assert!(hidden.grid.is_empty());
        assert!(hidden.axis_labels.is_empty());
    }
}
