// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport panel - paints the render buffers and routes pointer input.

use super::to_modifiers;
use crate::state::EditorState;
use glam::DVec3;
use strucframe_editor_viewport::labels::vector_text;
use strucframe_editor_viewport::{Color, LabelAnchor, Projector, ViewPreset};

/// Convert a buffer color to egui
fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color;
    egui::Rgba::from_rgba_unmultiplied(r, g, b, a).into()
}

/// Projects world points into the panel rectangle
struct ScreenMapper {
    projector: Projector,
    origin: egui::Pos2,
}

impl ScreenMapper {
    fn point(&self, world: DVec3) -> Option<egui::Pos2> {
        let screen = self.projector.project(world);
        screen
            .is_visible()
            .then(|| self.origin + egui::vec2(screen.x as f32, screen.y as f32))
    }

    fn segment(&self, start: DVec3, end: DVec3) -> Option<[egui::Pos2; 2]> {
        Some([self.point(start)?, self.point(end)?])
    }
}

/// Primary button gesture in progress
#[derive(Debug, Clone, Copy)]
struct PrimaryGesture {
    /// The controller did not use the press, so dragging orbits
    orbit: bool,
}

/// The viewport panel
pub struct ViewportPanel {
    gesture: Option<PrimaryGesture>,
    /// Scale applied to egui scroll points before zooming
    pub zoom_sensitivity: f32,
}

impl ViewportPanel {
    /// Create a new viewport panel
    pub fn new() -> Self {
        Self {
            gesture: None,
            zoom_sensitivity: 2.0,
        }
    }

    /// Render the viewport panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        ui.horizontal(|ui| {
            self.toolbar(ui, state);
        });

        ui.separator();

        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let rect = response.rect;
        state
            .controller
            .set_viewport_size(f64::from(rect.width()), f64::from(rect.height()));

        self.handle_input(ui, &response, state);
        state.process_viewport_events();

        self.paint(&painter, rect, state);
        Self::draw_overlay(&painter, rect, state);
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        for preset in ViewPreset::ALL {
            if ui
                .button(preset.name())
                .on_hover_text(format!("{preset} view"))
                .clicked()
            {
                state.controller.set_view_direction(preset);
            }
        }
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect, state: &EditorState) {
        let controller = &state.controller;
        let settings = controller.settings();
        let palette = &settings.palette;
        let buffers = controller.buffers();

        painter.rect_filled(rect, 0.0, to_color32(palette.background));

        let mapper = ScreenMapper {
            projector: controller.projector(),
            origin: rect.min,
        };
        if !mapper.projector.has_area() {
            return;
        }

        let grid_stroke = egui::Stroke::new(1.0, to_color32(palette.grid));
        for [start, end] in &buffers.grid {
            if let Some(points) = mapper.segment(*start, *end) {
                painter.line_segment(points, grid_stroke);
            }
        }

        for axis in &buffers.axes {
            if let Some(points) = mapper.segment(axis.start, axis.end) {
                painter.line_segment(points, egui::Stroke::new(2.0, to_color32(axis.color)));
            }
        }
        for label in &buffers.axis_labels {
            Self::paint_label(painter, &mapper, label, 2.0);
        }

        let frame_stroke = egui::Stroke::new(settings.frame_width, to_color32(palette.frame));
        for frame in &buffers.frames {
            if let Some(points) = mapper.segment(frame.start, frame.end) {
                painter.line_segment(points, frame_stroke);
            }
        }
        let selected_stroke =
            egui::Stroke::new(settings.selected_frame_width, to_color32(palette.frame_selected));
        for frame in &buffers.selected_frames {
            if let Some(points) = mapper.segment(frame.start, frame.end) {
                painter.line_segment(points, selected_stroke);
            }
        }

        let radius = settings.node_point_size / 2.0;
        for node in &buffers.nodes {
            if let Some(center) = mapper.point(node.position) {
                painter.circle_filled(center, radius, to_color32(node.color));
            }
        }

        for label in &buffers.labels {
            Self::paint_label(painter, &mapper, label, 1.0);
        }

        if let Some(drag) = buffers.drag_rect {
            let color = to_color32(palette.selection_box);
            let drag_rect = egui::Rect::from_min_max(
                rect.min + egui::vec2(drag.min.x as f32, drag.min.y as f32),
                rect.min + egui::vec2(drag.max.x as f32, drag.max.y as f32),
            );
            painter.rect_filled(drag_rect, 0.0, color.gamma_multiply(0.15));
            painter.rect_stroke(drag_rect, 0.0, egui::Stroke::new(1.0, color));
        }
    }

    fn paint_label(painter: &egui::Painter, mapper: &ScreenMapper, label: &LabelAnchor, width: f32) {
        let stroke = egui::Stroke::new(width, to_color32(label.color));
        for [start, end] in vector_text(&label.text, label.position, label.scale) {
            if let Some(points) = mapper.segment(start, end) {
                painter.line_segment(points, stroke);
            }
        }
    }

    fn draw_overlay(painter: &egui::Painter, rect: egui::Rect, state: &EditorState) {
        let Some(hover) = state.hover else {
            return;
        };
        let mut text = format!(
            "X: {:.2}  Y: {:.2}  Z: {:.2}",
            hover.point.x, hover.point.y, hover.point.z
        );
        if hover.snapped {
            text.push_str("  [SNAP]");
        }
        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::monospace(12.0),
            egui::Color32::from_rgb(40, 40, 40),
        );
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, state: &mut EditorState) {
        let rect = response.rect;
        let (pressed, released, pointer, modifiers, scroll) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                to_modifiers(i.modifiers),
                i.raw_scroll_delta.y,
            )
        });
        let local = pointer.map(|p| p - rect.min);

        if let Some(hover) = response.hover_pos() {
            let local = hover - rect.min;
            state.controller.on_hover(f64::from(local.x), f64::from(local.y));
        }

        if pressed && response.hovered() {
            if let Some(local) = local {
                let result = state
                    .controller
                    .on_press(f64::from(local.x), f64::from(local.y), modifiers);
                self.gesture = Some(PrimaryGesture {
                    orbit: result.passes_through(),
                });
            }
        }

        if let (Some(gesture), Some(local)) = (self.gesture, local) {
            if response.dragged_by(egui::PointerButton::Primary) {
                let result = state.controller.on_drag(f64::from(local.x), f64::from(local.y));
                if gesture.orbit && result.passes_through() {
                    let delta = response.drag_delta();
                    state
                        .controller
                        .camera_mut()
                        .orbit(f64::from(delta.x), f64::from(delta.y));
                }
            }
            if released {
                state
                    .controller
                    .on_release(f64::from(local.x), f64::from(local.y), modifiers);
                self.gesture = None;
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            state
                .controller
                .camera_mut()
                .orbit(f64::from(delta.x), f64::from(delta.y));
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            state.controller.camera_mut().pan(
                f64::from(delta.x),
                f64::from(delta.y),
                f64::from(rect.height()),
            );
        }

        if response.hovered() && scroll != 0.0 {
            state
                .controller
                .camera_mut()
                .zoom(f64::from(scroll * self.zoom_sensitivity));
        }
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strucframe_editor_viewport::OrbitCamera;

    #[test]
    fn test_mapper_offsets_by_panel_origin() {
        let mut camera = OrbitCamera::default();
        camera.apply_preset(ViewPreset::Top);
        let mapper = ScreenMapper {
            projector: Projector::from_camera(&camera, 800.0, 600.0),
            origin: egui::pos2(100.0, 50.0),
        };
        let center = mapper.point(DVec3::ZERO).unwrap();
        assert!((center.x - 500.0).abs() < 1e-3);
        assert!((center.y - 350.0).abs() < 1e-3);
    }

    #[test]
    fn test_mapper_skips_points_behind_camera() {
        let camera = OrbitCamera::default();
        let mapper = ScreenMapper {
            projector: Projector::from_camera(&camera, 800.0, 600.0),
            origin: egui::Pos2::ZERO,
        };
        let behind = camera.eye() + (camera.eye() - camera.center);
        assert!(mapper.point(behind).is_none());
        assert!(mapper.segment(DVec3::ZERO, behind).is_none());
    }
}
