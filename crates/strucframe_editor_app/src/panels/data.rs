// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data panel - node, frame and material tables.
//!
//! Row clicks go into the selection bridge; the editor forwards them to the
//! viewport once per frame.

use super::to_modifiers;
use crate::state::{DataView, EditorState};
use strucframe_editor_viewport::{ListSelection, Modifiers};

/// The data panel
pub struct DataPanel;

impl DataPanel {
    /// Create a new data panel
    pub fn new() -> Self {
        Self
    }

    /// Render the table chosen in the work tree
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        ui.horizontal(|ui| {
            ui.heading(state.data_view.name());
            let has_selection = match state.data_view {
                DataView::Nodes => !state.bridge.nodes.selected().is_empty(),
                DataView::Frames => !state.bridge.frames.selected().is_empty(),
                DataView::Materials => false,
            };
            if ui
                .add_enabled(has_selection, egui::Button::new("Clear selection"))
                .clicked()
            {
                state.clear_table_selection();
            }
        });
        ui.separator();

        let modifiers = ui.input(|i| to_modifiers(i.modifiers));

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| match state.data_view {
                DataView::Nodes => Self::node_table(ui, state, modifiers),
                DataView::Frames => Self::frame_table(ui, state, modifiers),
                DataView::Materials => Self::material_table(ui, state),
            });

        state.process_table_selection();
    }

    fn node_table(ui: &mut egui::Ui, state: &mut EditorState, modifiers: Modifiers) {
        let EditorState {
            document, bridge, ..
        } = state;
        egui::Grid::new("node_table")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                header_row(ui, &["ID", "X", "Y", "Z"]);
                for node in document.nodes() {
                    selectable_cell(ui, &mut bridge.nodes, node.id, node.id.to_string(), modifiers);
                    ui.label(format!("{:.2}", node.x));
                    ui.label(format!("{:.2}", node.y));
                    ui.label(format!("{:.2}", node.z));
                    ui.end_row();
                }
            });
    }

    fn frame_table(ui: &mut egui::Ui, state: &mut EditorState, modifiers: Modifiers) {
        let EditorState {
            document, bridge, ..
        } = state;
        egui::Grid::new("frame_table")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                header_row(ui, &["Frame ID", "Node A", "Node B"]);
                for frame in document.elements() {
                    selectable_cell(ui, &mut bridge.frames, frame.id, frame.id.to_string(), modifiers);
                    ui.label(frame.node_a.to_string());
                    ui.label(frame.node_b.to_string());
                    ui.end_row();
                }
            });
    }

    fn material_table(ui: &mut egui::Ui, state: &EditorState) {
        egui::Grid::new("material_table")
            .num_columns(5)
            .striped(true)
            .show(ui, |ui| {
                header_row(ui, &["ID", "Name", "E (MPa)", "\u{3bd}", "\u{3c1} (kN/m\u{b3})"]);
                for material in state.document.materials() {
                    ui.label(material.id.to_string());
                    ui.label(&material.name);
                    ui.label(format!("{}", material.elastic_modulus));
                    ui.label(format!("{}", material.poisson_ratio));
                    ui.label(format!("{}", material.density));
                    ui.end_row();
                }
            });
    }
}

impl Default for DataPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn header_row(ui: &mut egui::Ui, titles: &[&str]) {
    for title in titles {
        ui.strong(*title);
    }
    ui.end_row();
}

/// First cell of a row; clicking it selects the row
fn selectable_cell<Id: Copy + Ord>(
    ui: &mut egui::Ui,
    list: &mut ListSelection<Id>,
    id: Id,
    text: String,
    modifiers: Modifiers,
) {
    if ui.selectable_label(list.is_selected(id), text).clicked() {
        list.click_row(id, modifiers);
    }
}
