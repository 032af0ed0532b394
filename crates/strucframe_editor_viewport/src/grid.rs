// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference grid sized to the model.

use glam::DVec3;
use strucframe_editor_model::Bounds;

/// Models no larger than this get the fixed small grid
const SMALL_MODEL_LIMIT: f64 = 10.0;

/// Grid size and spacing for models up to [`SMALL_MODEL_LIMIT`]
const SMALL_GRID: (f64, f64) = (100.0, 10.0);

/// Smallest grid side length
const MIN_GRID_SIZE: f64 = 100.0;

/// Most lines per model extent before the spacing is coarsened
const MAX_LINES_PER_EXTENT: f64 = 20.0;

/// Square grid on the Z = 0 plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Side length
    pub size: f64,
    /// Distance between lines
    pub spacing: f64,
    /// Center X
    pub center_x: f64,
    /// Center Y
    pub center_y: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        compute_grid(&Bounds::EMPTY_MODEL)
    }
}

impl GridSpec {
    /// Line segments of the grid on Z = 0, X-parallel lines first
    pub fn lines(&self) -> Vec<[DVec3; 2]> {
        if self.spacing <= 0.0 || !self.spacing.is_finite() || !self.size.is_finite() {
            return Vec::new();
        }

        let half = self.size / 2.0;
        let steps = (self.size / self.spacing).round() as i64;
        let (x0, x1) = (self.center_x - half, self.center_x + half);
        let (y0, y1) = (self.center_y - half, self.center_y + half);

        let mut lines = Vec::with_capacity(2 * (steps as usize + 1));
        for i in 0..=steps {
            let y = y0 + i as f64 * self.spacing;
            lines.push([DVec3::new(x0, y, 0.0), DVec3::new(x1, y, 0.0)]);
        }
        for i in 0..=steps {
            let x = x0 + i as f64 * self.spacing;
            lines.push([DVec3::new(x, y0, 0.0), DVec3::new(x, y1, 0.0)]);
        }
        lines
    }
}

/// Size the grid so it covers the model with a readable line density
pub fn compute_grid(bounds: &Bounds) -> GridSpec {
    let max_dim = bounds.width().max(bounds.height());
    let center_x = (bounds.min_x + bounds.max_x) / 2.0;
    let center_y = (bounds.min_y + bounds.max_y) / 2.0;

    let (size, spacing) = if max_dim <= SMALL_MODEL_LIMIT || !max_dim.is_finite() {
        SMALL_GRID
    } else {
        let exponent = max_dim.log10().floor();
        let mut spacing = 10f64.powf(exponent - 1.0);
        if max_dim / spacing > MAX_LINES_PER_EXTENT {
            spacing *= 5.0;
        }
        ((max_dim * 3.0).max(MIN_GRID_SIZE), spacing)
    };

    GridSpec {
        size,
        spacing,
        center_x,
        center_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_model_grid() {
        let grid = compute_grid(&Bounds::new(-5.0, 5.0, -5.0, 5.0, 0.0, 0.0));
        assert_eq!(grid.size, 100.0);
        assert_eq!(grid.spacing, 10.0);
        assert_eq!((grid.center_x, grid.center_y), (0.0, 0.0));
    }

    #[test]
    fn test_small_grid_limit_is_inclusive() {
        let at_limit = compute_grid(&Bounds::new(0.0, 10.0, 0.0, 4.0, 0.0, 0.0));
        assert_eq!((at_limit.size, at_limit.spacing), (100.0, 10.0));

        let past_limit = compute_grid(&Bounds::new(0.0, 10.5, 0.0, 4.0, 0.0, 0.0));
        assert_eq!((past_limit.size, past_limit.spacing), (100.0, 1.0));
    }

    #[test]
    fn test_large_model_grid() {
        let grid = compute_grid(&Bounds::new(0.0, 1000.0, 0.0, 500.0, 0.0, 0.0));
        assert_eq!(grid.size, 3000.0);
        assert_eq!(grid.spacing, 100.0);
        assert_eq!((grid.center_x, grid.center_y), (500.0, 250.0));
    }

    #[test]
    fn test_dense_grid_is_coarsened() {
        // 500 / 10 = 50 lines is too many, so spacing becomes 50
        let grid = compute_grid(&Bounds::new(0.0, 500.0, 0.0, 100.0, 0.0, 0.0));
        assert_eq!(grid.spacing, 50.0);
        assert_eq!(grid.size, 1500.0);
    }

    #[test]
    fn test_size_floor() {
        let grid = compute_grid(&Bounds::new(0.0, 12.0, 0.0, 3.0, 0.0, 0.0));
        assert_eq!(grid.size, 100.0);
        assert_eq!(grid.spacing, 1.0);
    }

    #[test]
    fn test_empty_model_default() {
        let grid = GridSpec::default();
        // 20 wide, so not the small branch
        assert_eq!(grid.size, 100.0);
        assert_eq!(grid.spacing, 1.0);
    }

    #[test]
    fn test_grid_lines() {
        let grid = GridSpec {
            size: 100.0,
            spacing: 10.0,
            center_x: 0.0,
            center_y: 0.0,
        };
        let lines = grid.lines();
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[0], [DVec3::new(-50.0, -50.0, 0.0), DVec3::new(50.0, -50.0, 0.0)]);
        assert!(lines.iter().flatten().all(|p| p.z == 0.0));
    }
}
