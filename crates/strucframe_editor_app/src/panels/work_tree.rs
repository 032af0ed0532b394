// SPDX-License-Identifier: MIT OR Apache-2.0
//! Work tree panel - model items that choose the data table.

use crate::state::{DataView, EditorState};

/// The work tree panel
pub struct WorkTreePanel {
    /// Whether the model branch is open
    pub expanded: bool,
}

impl WorkTreePanel {
    /// Create a new work tree panel
    pub fn new() -> Self {
        Self { expanded: true }
    }

    /// Render the work tree panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            let header = egui::CollapsingHeader::new("\u{1f3d7} Model")
                .open(Some(self.expanded))
                .show(ui, |ui| {
                    for view in DataView::ALL {
                        let label = format!("{} ({})", view.name(), item_count(view, state));
                        if ui.selectable_label(state.data_view == view, label).clicked() {
                            tracing::debug!("Data view {}", view.name());
                            state.data_view = view;
                        }
                    }
                });
            if header.header_response.clicked() {
                self.expanded = !self.expanded;
            }

            ui.separator();
            let selected = state.selection_count();
            ui.label(
                egui::RichText::new(format!("{selected} selected"))
                    .small()
                    .color(egui::Color32::GRAY),
            );
        });
    }
}

impl Default for WorkTreePanel {
    fn default() -> Self {
        Self::new()
    }
}

fn item_count(view: DataView, state: &EditorState) -> usize {
    match view {
        DataView::Nodes => state.document.node_count(),
        DataView::Frames => state.document.element_count(),
        DataView::Materials => state.document.material_count(),
    }
}
