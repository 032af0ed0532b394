// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport configuration stored as RON.

use crate::camera::OrbitCamera;
use crate::picking::{PickTolerance, DEFAULT_MIN_BOX_SIZE};
use crate::render::{Palette, Visibility};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "strucframe.ron";

/// Tunable viewport behavior and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Click thresholds in pixels
    pub pick_tolerance: PickTolerance,
    /// Smallest box selection in pixels
    pub min_box_size: f64,
    /// World-space radius for snapping the hover readout to a node
    pub snap_radius: f64,
    /// Node marker diameter in pixels
    pub node_point_size: f32,
    /// Unselected frame stroke width in pixels
    pub frame_width: f32,
    /// Selected frame stroke width in pixels
    pub selected_frame_width: f32,
    /// Camera at start-up
    pub camera: OrbitCamera,
    /// Layers shown at start-up
    pub visibility: Visibility,
    /// Colors
    pub palette: Palette,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            pick_tolerance: PickTolerance::default(),
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            snap_radius: 5.0,
            node_point_size: 12.0,
            frame_width: 2.0,
            selected_frame_width: 4.0,
            camera: OrbitCamera::default(),
            visibility: Visibility::default(),
            palette: Palette::default(),
        }
    }
}

impl ViewportSettings {
    /// Parse settings; missing fields take their defaults
    pub fn from_ron_str(content: &str) -> Result<Self, SettingsError> {
        ron::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config).map_err(|e| SettingsError::Serialize(e.to_string()))
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&content)?;
        tracing::info!("Loaded viewport settings from {}", path.display());
        Ok(settings)
    }

    /// Write to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content is not valid settings RON
    #[error("Invalid settings: {0}")]
    Parse(String),

    /// Settings could not be encoded
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}
