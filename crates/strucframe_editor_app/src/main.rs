// SPDX-License-Identifier: MIT OR Apache-2.0
//! `StrucFrame` Editor - interactive 3D structural model editor
//!
//! Place nodes, join them with frames and define materials:
//! - Viewport with picking, box selection and two-click frame creation
//! - Work tree and data tables kept in sync with the viewport selection
//! - Terminal showing operation messages and log output
//!
//! ## Architecture
//!
//! The window host (winit + wgpu) drives egui with `egui_dock` for panel
//! docking. Model and viewport logic live in the `strucframe_editor_model`
//! and `strucframe_editor_viewport` crates and have no GPU dependency.

mod app;
mod dialogs;
mod panel_types;
mod panels;
mod state;

use app::EditorApp;
use panels::terminal::TracingBridge;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: [&str; 3] = ["strucframe_editor_app=debug", "wgpu=warn", "naga=warn"];

fn env_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .fold(EnvFilter::from_default_env(), |filter, directive| match directive.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(e) => {
                eprintln!("Ignoring log directive {directive}: {e}");
                filter
            }
        })
}

fn main() {
    // Terminal panel receives events through this channel
    let (bridge_layer, tracing_rx) = TracingBridge::new();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(bridge_layer)
        .init();

    tracing::info!("Starting StrucFrame Editor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = EditorApp::run_with_tracing_receiver(Some(tracing_rx)) {
        tracing::error!("Editor failed: {e}");
        std::process::exit(1);
    }
}
