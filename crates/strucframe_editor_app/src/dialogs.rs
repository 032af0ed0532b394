// SPDX-License-Identifier: MIT OR Apache-2.0
//! Modal dialogs for adding nodes and defining materials.

use crate::state::EditorState;
use strucframe_editor_model::material::MAX_POISSON_RATIO;

/// Coordinate limit of the Add Node fields
pub const COORDINATE_LIMIT: f64 = 10_000.0;

/// Add Node dialog
#[derive(Debug, Clone, Default)]
pub struct AddNodeDialog {
    /// Whether the dialog is shown
    pub open: bool,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl AddNodeDialog {
    /// Show the dialog with zeroed fields
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Render the dialog if open
    pub fn show(&mut self, ctx: &egui::Context, state: &mut EditorState) {
        if !self.open {
            return;
        }

        let mut submit = false;
        let mut cancel = false;

        egui::Window::new("Add Node")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("add_node_fields").num_columns(2).show(ui, |ui| {
                    for (label, value) in [("X:", &mut self.x), ("Y:", &mut self.y), ("Z:", &mut self.z)] {
                        ui.label(label);
                        ui.add(
                            egui::DragValue::new(value)
                                .range(-COORDINATE_LIMIT..=COORDINATE_LIMIT)
                                .speed(0.1)
                                .max_decimals(3),
                        );
                        ui.end_row();
                    }
                });

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("Add").clicked() {
                        submit = true;
                    }
                });
            });

        if submit {
            let (x, y, z) = clamp_coordinates(self.x, self.y, self.z);
            state.add_node(x, y, z);
        }
        if submit || cancel {
            self.open = false;
        }
    }
}

fn clamp_coordinates(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let clamp = |v: f64| v.clamp(-COORDINATE_LIMIT, COORDINATE_LIMIT);
    (clamp(x), clamp(y), clamp(z))
}

/// Add Material dialog
#[derive(Debug, Clone)]
pub struct AddMaterialDialog {
    /// Whether the dialog is shown
    pub open: bool,
    /// Material name
    pub name: String,
    /// Elastic modulus E (MPa)
    pub elastic_modulus: f64,
    /// Poisson ratio
    pub poisson_ratio: f64,
    /// Density (kN/m3)
    pub density: f64,
    error: Option<String>,
}

impl Default for AddMaterialDialog {
    fn default() -> Self {
        Self {
            open: false,
            name: String::new(),
            elastic_modulus: 30_000.0,
            poisson_ratio: 0.2,
            density: 25.0,
            error: None,
        }
    }
}

impl AddMaterialDialog {
    /// Show the dialog with default concrete properties
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Render the dialog if open
    pub fn show(&mut self, ctx: &egui::Context, state: &mut EditorState) {
        if !self.open {
            return;
        }

        let mut submit = false;
        let mut cancel = false;

        egui::Window::new("Define Material")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("add_material_fields").num_columns(2).show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut self.name).hint_text("Concrete"));
                    ui.end_row();

                    ui.label("E (MPa):");
                    ui.add(
                        egui::DragValue::new(&mut self.elastic_modulus)
                            .range(0.0..=f64::MAX)
                            .speed(100.0),
                    );
                    ui.end_row();

                    ui.label("\u{3bd}:");
                    ui.add(
                        egui::DragValue::new(&mut self.poisson_ratio)
                            .range(0.0..=MAX_POISSON_RATIO)
                            .speed(0.01)
                            .max_decimals(3),
                    );
                    ui.end_row();

                    ui.label("\u{3c1} (kN/m\u{b3}):");
                    ui.add(
                        egui::DragValue::new(&mut self.density)
                            .range(0.0..=f64::MAX)
                            .speed(0.5),
                    );
                    ui.end_row();
                });

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), error);
                }

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("OK").clicked() {
                        submit = true;
                    }
                });
            });

        if cancel {
            self.open = false;
        } else if submit {
            self.submit(state);
        }
    }

    /// Add the material; the dialog stays open with the error on failure
    pub fn submit(&mut self, state: &mut EditorState) {
        match state.add_material(&self.name, self.elastic_modulus, self.poisson_ratio, self.density) {
            Ok(_) => self.open = false,
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let mut dialog = AddMaterialDialog::default();
        dialog.name = "Steel".to_string();
        dialog.open();
        assert!(dialog.open);
        assert!(dialog.name.is_empty());
        assert_eq!(dialog.elastic_modulus, 30_000.0);
        assert_eq!(dialog.poisson_ratio, 0.2);
        assert_eq!(dialog.density, 25.0);
    }

    #[test]
    fn test_material_submit() {
        let mut state = EditorState::default();
        let mut dialog = AddMaterialDialog::default();
        dialog.open();

        dialog.submit(&mut state);
        assert!(dialog.open);
        assert!(dialog.error.is_some());

        dialog.name = "C30".to_string();
        dialog.submit(&mut state);
        assert!(!dialog.open);
        assert_eq!(state.document.material_count(), 1);
    }

    #[test]
    fn test_coordinates_are_clamped() {
        assert_eq!(
            clamp_coordinates(20_000.0, -1.5, -30_000.0),
            (COORDINATE_LIMIT, -1.5, -COORDINATE_LIMIT)
        );
    }
}
