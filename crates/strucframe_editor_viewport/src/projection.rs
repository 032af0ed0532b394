// SPDX-License-Identifier: MIT OR Apache-2.0
//! World, camera and screen space conversions.
//!
//! Matrices follow OpenGL clip conventions: after the perspective divide the
//! visible volume is the `[-1, 1]` cube, with the near plane at NDC z = -1
//! and the far plane at NDC z = +1. Screen space is in pixels with the
//! origin at the top-left corner and Y growing downward.

use glam::{DMat4, DVec2, DVec3, DVec4};

/// Determinants smaller than this are treated as singular
const SINGULAR_EPSILON: f64 = 1.0e-12;

/// Clip-space `w` values closer to zero than this cannot be divided safely
const CLIP_W_EPSILON: f64 = 1.0e-9;

/// A projected point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixel X, growing right
    pub x: f64,
    /// Pixel Y, growing down
    pub y: f64,
    /// NDC depth (`-1` at the near plane, `1` at the far plane)
    pub depth: f64,
}

impl ScreenPoint {
    /// Whether the point lies in front of the far plane
    pub fn is_visible(&self) -> bool {
        self.depth < 1.0
    }

    /// Pixel position as a vector
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// A half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point (on the near plane for pick rays)
    pub origin: DVec3,
    /// Unit direction
    pub direction: DVec3,
}

impl Ray {
    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the horizontal plane `z = height`, if the ray is not parallel to it
    pub fn intersect_z_plane(&self, height: f64) -> Option<DVec3> {
        if self.direction.z.abs() <= 1.0e-6 {
            return None;
        }
        let t = (height - self.origin.z) / self.direction.z;
        Some(self.at(t))
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            direction: DVec3::Z,
        }
    }
}

/// Project a world point to pixel coordinates.
///
/// Points that cannot be divided through (clip `w` of zero, non-finite
/// results) come back with infinite depth so callers treat them as clipped.
pub fn world_to_screen(
    world: DVec3,
    view: &DMat4,
    projection: &DMat4,
    viewport_width: f64,
    viewport_height: f64,
) -> ScreenPoint {
    let clip = *projection * (*view * DVec4::new(world.x, world.y, world.z, 1.0));
    if clip.w.abs() <= CLIP_W_EPSILON {
        return ScreenPoint {
            x: f64::NAN,
            y: f64::NAN,
            depth: f64::INFINITY,
        };
    }
    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() {
        return ScreenPoint {
            x: f64::NAN,
            y: f64::NAN,
            depth: f64::INFINITY,
        };
    }

    ScreenPoint {
        x: (ndc.x + 1.0) * viewport_width / 2.0,
        y: (1.0 - ndc.y) * viewport_height / 2.0,
        depth: ndc.z,
    }
}

/// Build the world-space pick ray through a pixel.
///
/// Returns [`Ray::default`] when the viewport has no area or the combined
/// view-projection matrix cannot be inverted.
pub fn screen_to_ray(
    screen_x: f64,
    screen_y: f64,
    view: &DMat4,
    projection: &DMat4,
    viewport_width: f64,
    viewport_height: f64,
) -> Ray {
    if viewport_width <= 0.0 || viewport_height <= 0.0 {
        return Ray::default();
    }

    let view_proj = *projection * *view;
    let det = view_proj.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Ray::default();
    }
    let inverse = view_proj.inverse();

    let ndc_x = (2.0 * screen_x) / viewport_width - 1.0;
    let ndc_y = 1.0 - (2.0 * screen_y) / viewport_height;

    let near = inverse.project_point3(DVec3::new(ndc_x, ndc_y, -1.0));
    let far = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
    let direction = (far - near).normalize_or_zero();

    if !near.is_finite() || direction == DVec3::ZERO || !direction.is_finite() {
        return Ray::default();
    }

    Ray {
        origin: near,
        direction,
    }
}

/// Squared 2D distance from `point` to the segment `a`-`b`
pub fn point_to_segment_distance_sq_2d(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let segment = b - a;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return point.distance_squared(a);
    }

    let t = ((point - a).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance_squared(a + segment * t)
}

/// Perpendicular distance from a point to a ray.
///
/// `None` when the point projects behind the ray origin.
pub fn point_to_ray_distance(point: DVec3, ray: &Ray) -> Option<f64> {
    let t = (point - ray.origin).dot(ray.direction);
    if t < 0.0 {
        return None;
    }
    Some(point.distance(ray.at(t)))
}
