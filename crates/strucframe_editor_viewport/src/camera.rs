// SPDX-License-Identifier: MIT OR Apache-2.0
//! Z-up orbital camera and named view presets.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Orbital camera looking at `center` from `distance`, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCamera {
    /// Distance from the orbit center
    pub distance: f64,
    /// Angle above the XY plane
    pub elevation: f64,
    /// Angle around Z, measured from +X
    pub azimuth: f64,
    /// Orbit center
    pub center: DVec3,
    /// Vertical field of view
    pub fov: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 150.0,
            elevation: 30.0,
            azimuth: 45.0,
            center: DVec3::ZERO,
            fov: 60.0,
        }
    }
}

impl OrbitCamera {
    /// Create a camera with the default orbit
    pub fn new() -> Self {
        Self::default()
    }

    /// World to camera transform
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_translation(DVec3::new(0.0, 0.0, -self.distance))
            * DMat4::from_rotation_x((self.elevation - 90.0).to_radians())
            * DMat4::from_rotation_z(-(self.azimuth + 90.0).to_radians())
            * DMat4::from_translation(-self.center)
    }

    /// Camera to clip transform for a viewport of the given pixel size
    pub fn projection_matrix(&self, viewport_width: f64, viewport_height: f64) -> DMat4 {
        let aspect = if viewport_height > 0.0 {
            viewport_width / viewport_height
        } else {
            1.0
        };
        DMat4::perspective_rh_gl(
            self.fov.to_radians(),
            aspect,
            self.distance * 0.001,
            self.distance * 1000.0,
        )
    }

    /// Camera position in world space
    pub fn eye(&self) -> DVec3 {
        let elev = self.elevation.to_radians();
        let azim = self.azimuth.to_radians();
        self.center
            + self.distance * DVec3::new(elev.cos() * azim.cos(), elev.cos() * azim.sin(), elev.sin())
    }

    /// Rotate around the center by pixel deltas
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        self.azimuth -= delta_x;
        self.elevation = (self.elevation + delta_y).clamp(-90.0, 90.0);
    }

    /// Slide the center in the view plane so the scene follows the pointer
    pub fn pan(&mut self, delta_x: f64, delta_y: f64, viewport_height: f64) {
        if viewport_height <= 0.0 {
            return;
        }
        let world_per_pixel =
            2.0 * self.distance * (self.fov.to_radians() / 2.0).tan() / viewport_height;
        let camera_to_world = self.view_matrix().inverse();
        let right = camera_to_world.transform_vector3(DVec3::X);
        let up = camera_to_world.transform_vector3(DVec3::Y);

        self.center += (up * delta_y - right * delta_x) * world_per_pixel;
    }

    /// Scale the distance by a wheel delta in points; positive moves closer
    pub fn zoom(&mut self, wheel_delta: f64) {
        self.distance = (self.distance * 0.999f64.powf(wheel_delta)).clamp(0.01, 1.0e7);
    }

    /// Jump to a named view, keeping distance and center
    pub fn apply_preset(&mut self, preset: ViewPreset) {
        let (elevation, azimuth) = preset.angles();
        self.elevation = elevation;
        self.azimuth = azimuth;
    }
}

/// Named camera orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPreset {
    /// Isometric view from the +X +Y quadrant
    Iso,
    /// Looking down -Z
    Top,
    /// Looking along +Y
    Front,
    /// Looking along -X
    Right,
}

impl ViewPreset {
    /// Every preset in toolbar order
    pub const ALL: [ViewPreset; 4] = [Self::Iso, Self::Top, Self::Front, Self::Right];

    /// `(elevation, azimuth)` in degrees
    pub fn angles(self) -> (f64, f64) {
        match self {
            Self::Iso => (30.0, 45.0),
            Self::Top => (90.0, -90.0),
            Self::Front => (0.0, -90.0),
            Self::Right => (0.0, 0.0),
        }
    }

    /// Upper-case name
    pub fn name(self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Top => "TOP",
            Self::Front => "FRONT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = ViewPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ViewPresetError::Unknown(trimmed.to_string()))
    }
}

/// Error parsing a view preset name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewPresetError {
    /// Name matches no preset
    #[error("Unknown view preset: {0}")]
    Unknown(String),
}
