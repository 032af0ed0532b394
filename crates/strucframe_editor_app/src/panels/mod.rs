// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor panels.

pub mod data;
pub mod terminal;
pub mod viewport;
pub mod work_tree;

pub use data::DataPanel;
pub use terminal::TerminalPanel;
pub use viewport::ViewportPanel;
pub use work_tree::WorkTreePanel;

use strucframe_editor_viewport::Modifiers;

/// Convert egui modifiers for viewport clicks and table rows; Cmd counts as Ctrl
pub(crate) fn to_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.ctrl || modifiers.command,
        shift: modifiers.shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_map_command_to_ctrl() {
        let modifiers = to_modifiers(egui::Modifiers {
            command: true,
            ..egui::Modifiers::default()
        });
        assert!(modifiers.ctrl);
        assert!(!modifiers.shift);
    }

    #[test]
    fn test_modifiers_keep_shift_with_ctrl() {
        let modifiers = to_modifiers(egui::Modifiers {
            ctrl: true,
            shift: true,
            ..egui::Modifiers::default()
        });
        assert_eq!(modifiers, Modifiers { ctrl: true, shift: true });
        assert_eq!(to_modifiers(egui::Modifiers::default()), Modifiers::NONE);
    }
}
