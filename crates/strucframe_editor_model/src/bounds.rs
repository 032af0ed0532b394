// SPDX-License-Identifier: MIT OR Apache-2.0
//! Axis-aligned model extents.

/// Axis-aligned bounding box of the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum X
    pub min_x: f64,
    /// Maximum X
    pub max_x: f64,
    /// Minimum Y
    pub min_y: f64,
    /// Maximum Y
    pub max_y: f64,
    /// Minimum Z
    pub min_z: f64,
    /// Maximum Z
    pub max_z: f64,
}

impl Bounds {
    /// Extents reported for a model without nodes, so a grid stays visible
    pub const EMPTY_MODEL: Bounds = Bounds::new(-10.0, 10.0, -10.0, 10.0, 0.0, 0.0);

    /// Create bounds from `(min_x, max_x, min_y, max_y, min_z, max_z)`
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z,
            max_z,
        }
    }

    /// Smallest bounds enclosing every point, or `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = [f64; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let [x, y, z] = points.next()?;
        let mut bounds = Self::new(x, x, y, y, z, z);
        for [x, y, z] in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
            bounds.min_z = bounds.min_z.min(z);
            bounds.max_z = bounds.max_z.max(z);
        }
        Some(bounds)
    }

    /// Extent along X
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along Y
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// As a `(min_x, max_x, min_y, max_y, min_z, max_z)` tuple
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.min_x, self.max_x, self.min_y, self.max_y, self.min_z, self.max_z)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points([[0.0, 5.0, -1.0], [10.0, -2.0, 3.0], [4.0, 1.0, 0.0]])
            .unwrap();
        assert_eq!(bounds.as_tuple(), (0.0, 10.0, -2.0, 5.0, -1.0, 3.0));
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 7.0);
    }

    #[test]
    fn test_from_no_points() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }
}
