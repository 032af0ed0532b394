// SPDX-License-Identifier: MIT OR Apache-2.0
//! Screen-space picking of nodes and frames.
//!
//! All thresholds are in pixels. Nodes always win over frames, and anything
//! behind the camera (or past the far plane) is never picked.

use crate::camera::OrbitCamera;
use crate::projection::{self, Ray, ScreenPoint};
use crate::snapshot::SceneSnapshot;
use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strucframe_editor_model::{FrameId, NodeId};

/// Default box-selection threshold in pixels
pub const DEFAULT_MIN_BOX_SIZE: f64 = 5.0;

/// Camera matrices and viewport size used to project the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// World to camera
    pub view: DMat4,
    /// Camera to clip
    pub projection: DMat4,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
}

impl Projector {
    /// Matrices for an orbit camera in a viewport of the given size
    pub fn from_camera(camera: &OrbitCamera, width: f64, height: f64) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(width, height),
            width,
            height,
        }
    }

    /// Whether the viewport has any area to pick in
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Project a world point
    pub fn project(&self, world: DVec3) -> ScreenPoint {
        projection::world_to_screen(world, &self.view, &self.projection, self.width, self.height)
    }

    /// Pick ray through a pixel
    pub fn ray(&self, x: f64, y: f64) -> Ray {
        projection::screen_to_ray(x, y, &self.view, &self.projection, self.width, self.height)
    }

    /// Project a point and keep it only when it is visible and finite
    fn visible(&self, world: DVec3) -> Option<DVec2> {
        let screen = self.project(world);
        (screen.is_visible() && screen.position().is_finite()).then_some(screen.position())
    }
}

/// What a single click hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pick {
    /// A node
    Node(NodeId),
    /// A frame
    Frame(FrameId),
}

/// Pixel thresholds for single-click picking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickTolerance {
    /// Maximum pixel distance from a node's projected center
    pub node_radius: f64,
    /// Maximum pixel distance from a frame's projected segment
    pub frame_tolerance: f64,
}

impl Default for PickTolerance {
    fn default() -> Self {
        Self {
            node_radius: 15.0,
            frame_tolerance: 10.0,
        }
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner
    pub min: DVec2,
    /// Bottom-right corner
    pub max: DVec2,
}

impl ScreenRect {
    /// Normalized rectangle spanning two arbitrary corners
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Inclusive containment test
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Whether both sides reach `min_size`
    pub fn is_at_least(&self, min_size: f64) -> bool {
        self.width() >= min_size && self.height() >= min_size
    }
}

/// Result of a box selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectPick {
    /// Nodes inside the rectangle
    pub node_ids: BTreeSet<NodeId>,
    /// Frames with at least one endpoint inside the rectangle
    pub frame_ids: BTreeSet<FrameId>,
}

impl RectPick {
    /// True when nothing was caught
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.frame_ids.is_empty()
    }
}

/// Find the node or frame under a pixel
pub fn pick_point(
    x: f64,
    y: f64,
    snapshot: &SceneSnapshot,
    projector: &Projector,
    tolerance: &PickTolerance,
) -> Option<Pick> {
    if !projector.has_area() || snapshot.is_empty() {
        return None;
    }
    let cursor = DVec2::new(x, y);

    let node_limit = tolerance.node_radius * tolerance.node_radius;
    let best_node = snapshot
        .nodes()
        .iter()
        .filter_map(|node| {
            let screen = projector.visible(DVec3::new(node.x, node.y, node.z))?;
            let dist_sq = screen.distance_squared(cursor);
            (dist_sq < node_limit).then_some((node.id, dist_sq))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((id, dist_sq)) = best_node {
        tracing::debug!("Picked node {} at {:.1}px", id, dist_sq.sqrt());
        return Some(Pick::Node(id));
    }

    let frame_limit = tolerance.frame_tolerance * tolerance.frame_tolerance;
    let best_frame = snapshot
        .frames()
        .iter()
        .filter_map(|frame| {
            let (a, b) = snapshot.frame_endpoints(frame)?;
            let a = projector.visible(a)?;
            let b = projector.visible(b)?;
            let dist_sq = projection::point_to_segment_distance_sq_2d(cursor, a, b);
            (dist_sq < frame_limit).then_some((frame.id, dist_sq))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    best_frame.map(|(id, dist_sq)| {
        tracing::debug!("Picked frame {} at {:.1}px", id, dist_sq.sqrt());
        Pick::Frame(id)
    })
}

/// Collect everything inside a screen rectangle.
///
/// Rectangles narrower or shorter than `min_size` pixels select nothing.
pub fn pick_rect(
    rect: ScreenRect,
    snapshot: &SceneSnapshot,
    projector: &Projector,
    min_size: f64,
) -> RectPick {
    let rect = ScreenRect::from_corners(rect.min, rect.max);
    let mut result = RectPick::default();
    if !rect.is_at_least(min_size) || !projector.has_area() {
        return result;
    }

    for node in snapshot.nodes() {
        if let Some(screen) = projector.visible(DVec3::new(node.x, node.y, node.z)) {
            if rect.contains(screen) {
                result.node_ids.insert(node.id);
            }
        }
    }

    for frame in snapshot.frames() {
        let Some((a, b)) = snapshot.frame_endpoints(frame) else {
            continue;
        };
        let (Some(a), Some(b)) = (projector.visible(a), projector.visible(b)) else {
            continue;
        };
        if rect.contains(a) || rect.contains(b) {
            result.frame_ids.insert(frame.id);
        }
    }

    tracing::debug!(
        "Box pick caught {} nodes and {} frames",
        result.node_ids.len(),
        result.frame_ids.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewPreset;
    use strucframe_editor_model::{Frame, Node};

    /// Looking straight down at the origin from 100 units, 800 x 600
    fn top_projector() -> Projector {
        let mut camera = OrbitCamera {
            distance: 100.0,
            ..OrbitCamera::default()
        };
        camera.apply_preset(ViewPreset::Top);
        Projector::from_camera(&camera, 800.0, 600.0)
    }

    fn node(id: u32, x: f64, y: f64, z: f64) -> Node {
        Node::new(NodeId(id), x, y, z)
    }

    fn frame(id: u32, a: u32, b: u32) -> Frame {
        Frame::new(FrameId(id), NodeId(a), NodeId(b))
    }

    #[test]
    fn test_pick_node() {
        let projector = top_projector();
        let snapshot = SceneSnapshot::new(vec![node(1, 0.0, 0.0, 0.0), node(2, 20.0, 0.0, 0.0)], vec![]);
        let origin = projector.project(DVec3::ZERO);

        let pick = pick_point(origin.x + 3.0, origin.y - 4.0, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Node(NodeId(1))));

        let miss = pick_point(origin.x + 40.0, origin.y + 40.0, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(miss, None);
    }

    #[test]
    fn test_node_beats_frame() {
        let projector = top_projector();
        // Frame 1 passes right through the click, node 3 is 8px away
        let snapshot = SceneSnapshot::new(
            vec![node(1, -20.0, 0.0, 0.0), node(2, 20.0, 0.0, 0.0), node(3, 0.0, 0.0, 0.0)],
            vec![frame(1, 1, 2)],
        );
        let origin = projector.project(DVec3::ZERO);

        let pick = pick_point(origin.x, origin.y + 8.0, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Node(NodeId(3))));
    }

    #[test]
    fn test_pick_frame() {
        let projector = top_projector();
        let snapshot = SceneSnapshot::new(
            vec![node(1, -20.0, 0.0, 0.0), node(2, 20.0, 0.0, 0.0)],
            vec![frame(1, 1, 2)],
        );
        let origin = projector.project(DVec3::ZERO);

        let pick = pick_point(origin.x, origin.y + 6.0, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Frame(FrameId(1))));

        let miss = pick_point(origin.x, origin.y + 12.0, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(miss, None);
    }

    #[test]
    fn test_nearest_of_two_nodes_wins() {
        let projector = top_projector();
        // One world unit is about 5px here, so both nodes are inside the radius
        let snapshot = SceneSnapshot::new(vec![node(1, 0.0, 0.0, 0.0), node(2, 1.0, 0.0, 0.0)], vec![]);
        let second = projector.project(DVec3::new(1.0, 0.0, 0.0));

        let pick = pick_point(second.x + 1.0, second.y, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Node(NodeId(2))));

        let first = projector.project(DVec3::ZERO);
        let pick = pick_point(first.x - 1.0, first.y, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Node(NodeId(1))));
    }

    #[test]
    fn test_nearest_of_two_frames_wins() {
        let projector = top_projector();
        // Parallel frames one world unit apart, both within tolerance of the click
        let snapshot = SceneSnapshot::new(
            vec![
                node(1, -20.0, 0.0, 0.0),
                node(2, 20.0, 0.0, 0.0),
                node(3, -20.0, 1.0, 0.0),
                node(4, 20.0, 1.0, 0.0),
            ],
            vec![frame(1, 1, 2), frame(2, 3, 4)],
        );
        let on_second = projector.project(DVec3::new(0.0, 1.0, 0.0));
        let on_first = projector.project(DVec3::ZERO);
        let away = (on_second.y - on_first.y).signum();

        let pick = pick_point(on_second.x, on_second.y + away, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Frame(FrameId(2))));

        let pick = pick_point(on_first.x, on_first.y - away, &snapshot, &projector, &PickTolerance::default());
        assert_eq!(pick, Some(Pick::Frame(FrameId(1))));
    }

    #[test]
    fn test_nothing_behind_camera_is_picked() {
        let projector = top_projector();
        // Camera sits at z = 100; this node is above it
        let snapshot = SceneSnapshot::new(vec![node(1, 0.0, 0.0, 150.0)], vec![]);
        assert_eq!(pick_point(400.0, 300.0, &snapshot, &projector, &PickTolerance::default()), None);
    }

    #[test]
    fn test_degenerate_inputs_give_no_pick() {
        let mut projector = top_projector();
        let empty = SceneSnapshot::default();
        assert_eq!(pick_point(400.0, 300.0, &empty, &projector, &PickTolerance::default()), None);

        let snapshot = SceneSnapshot::new(vec![node(1, 0.0, 0.0, 0.0)], vec![]);
        projector.width = 0.0;
        assert_eq!(pick_point(0.0, 300.0, &snapshot, &projector, &PickTolerance::default()), None);

        let singular = Projector {
            view: DMat4::ZERO,
            projection: DMat4::ZERO,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(pick_point(400.0, 300.0, &snapshot, &singular, &PickTolerance::default()), None);
        assert!(pick_rect(
            ScreenRect::from_corners(DVec2::ZERO, DVec2::new(800.0, 600.0)),
            &snapshot,
            &singular,
            DEFAULT_MIN_BOX_SIZE
        )
        .is_empty());
    }

    #[test]
    fn test_box_containment() {
        let projector = top_projector();
        let snapshot = SceneSnapshot::new(
            vec![node(1, 0.0, 0.0, 0.0), node(2, 30.0, 0.0, 0.0), node(3, 0.0, 30.0, 0.0)],
            vec![frame(1, 1, 2), frame(2, 2, 3)],
        );
        let a = projector.project(DVec3::ZERO).position();

        // Reversed corners are normalized
        let rect = ScreenRect::from_corners(a + DVec2::new(10.0, 10.0), a - DVec2::new(10.0, 10.0));
        let result = pick_rect(rect, &snapshot, &projector, DEFAULT_MIN_BOX_SIZE);

        assert_eq!(result.node_ids, BTreeSet::from([NodeId(1)]));
        // Frame 1 has one endpoint inside, frame 2 none
        assert_eq!(result.frame_ids, BTreeSet::from([FrameId(1)]));
    }

    #[test]
    fn test_small_box_selects_nothing() {
        let projector = top_projector();
        let snapshot = SceneSnapshot::new(vec![node(1, 0.0, 0.0, 0.0)], vec![]);
        let a = projector.project(DVec3::ZERO).position();

        let thin = ScreenRect::from_corners(a - DVec2::new(50.0, 2.0), a + DVec2::new(50.0, 2.0));
        assert!(pick_rect(thin, &snapshot, &projector, DEFAULT_MIN_BOX_SIZE).is_empty());
    }

    #[test]
    fn test_box_skips_frames_with_clipped_endpoint() {
        let projector = top_projector();
        let snapshot = SceneSnapshot::new(
            vec![node(1, 0.0, 0.0, 0.0), node(2, 0.0, 0.0, 150.0)],
            vec![frame(1, 1, 2)],
        );
        let everything = ScreenRect::from_corners(DVec2::ZERO, DVec2::new(800.0, 600.0));
        let result = pick_rect(everything, &snapshot, &projector, DEFAULT_MIN_BOX_SIZE);
        assert_eq!(result.node_ids, BTreeSet::from([NodeId(1)]));
        assert!(result.frame_ids.is_empty());
    }
}
