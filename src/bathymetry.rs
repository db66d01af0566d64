use faer::Mat;
use faer_core::MatRef;

use crate::{grid::Grid, problem::ConfigError, Float};

/// Per-cell bed elevation. Set once at configuration time, read-only for the
/// rest of the run.
#[derive(Debug, Clone)]
pub struct Bathymetry {
    levels: Mat<Float>,
}

impl Bathymetry {
    /// Flat bed at elevation zero.
    pub fn flat(grid: &Grid) -> Self {
        Self {
            levels: Mat::zeros(grid.cells(), 1),
        }
    }

    /// Sample an elevation profile `x → zb` at every cell center.
    pub fn from_profile(grid: &Grid, profile: impl Fn(Float) -> Float) -> Self {
        Self {
            levels: Mat::from_fn(grid.cells(), 1, |i, _| profile(grid.cell_center(i))),
        }
    }

    /// Use explicit per-cell elevations; the length must match the grid.
    pub fn from_levels(grid: &Grid, levels: &[Float]) -> Result<Self, ConfigError> {
        if levels.len() != grid.cells() {
            return Err(ConfigError::BathymetryLength {
                expected: grid.cells(),
                got: levels.len(),
            });
        }
        Ok(Self {
            levels: Mat::from_fn(grid.cells(), 1, |i, _| levels[i]),
        })
    }

    /// Bed elevation of cell `i`.
    pub fn level(&self, i: usize) -> Float {
        self.levels[(i, 0)]
    }

    pub fn levels(&self) -> MatRef<'_, Float> {
        self.levels.as_ref()
    }
}
