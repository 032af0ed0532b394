// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared panel type definitions.

/// Panel types that can be docked in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Model tree listing nodes, frames and materials
    WorkTree,
    /// 3D viewport
    Viewport,
    /// Table for the item chosen in the work tree
    Data,
    /// Operation messages and log output
    Terminal,
}

impl PanelType {
    /// Every panel, in default layout order
    pub const ALL: [Self; 4] = [Self::WorkTree, Self::Viewport, Self::Data, Self::Terminal];

    /// Get the display name for this panel type
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkTree => "Work Tree",
            Self::Viewport => "Viewport",
            Self::Data => "Data",
            Self::Terminal => "Terminal",
        }
    }

    /// Get the icon for this panel type
    pub fn icon(&self) -> &'static str {
        match self {
            Self::WorkTree => "\u{1f4c2}", // folder
            Self::Viewport => "\u{1f3a5}", // camera
            Self::Data => "\u{1f4ca}",     // chart
            Self::Terminal => "\u{1f4bb}", // terminal
        }
    }
}
