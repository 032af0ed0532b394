// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive 3D viewport core for the `StrucFrame` editor.
//!
//! This crate turns a node/frame snapshot and 2D pointer input into:
//! - Picks (single click and rectangular box selection)
//! - Selection state shared with list views
//! - Frame creation requests from the two-click add-frame mode
//! - Render buffers (points, segments, labels, grid) for any render layer
//!
//! ## Architecture
//!
//! [`projection`], [`grid`], [`labels`] and [`picking`] are pure functions.
//! [`ViewportController`] is the single owner of camera, snapshot, selection
//! and interaction mode; everything outside talks to it through typed
//! commands and drains [`ViewportEvent`]s from it. [`SelectionBridge`] keeps
//! list views in step without feeding their own updates back to them.

pub mod bridge;
pub mod camera;
pub mod controller;
pub mod grid;
pub mod labels;
pub mod picking;
pub mod projection;
pub mod render;
pub mod selection;
pub mod settings;
pub mod snapshot;

pub use bridge::{ListSelection, SelectionBridge, SelectionUpdate};
pub use camera::{OrbitCamera, ViewPreset, ViewPresetError};
pub use controller::{
    BoxDrag, HoverReadout, InputResponse, InteractionMode, ModeKind, Modifiers, ViewportController,
    ViewportEvent,
};
pub use grid::{compute_grid, GridSpec};
pub use picking::{Pick, PickTolerance, Projector, RectPick, ScreenRect};
pub use render::{Color, LabelAnchor, Palette, RenderBuffers, Visibility};
pub use selection::SelectionState;
pub use settings::{SettingsError, ViewportSettings};
pub use snapshot::SceneSnapshot;
