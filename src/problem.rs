use core::fmt;
use std::rc::Rc;

use faer::Mat;
use thiserror::Error;

use crate::{
    bathymetry::Bathymetry, bc::BoundaryPolicy, flux::FluxScheme, grid::Grid, state::State, Float,
    DRY_DEPTH, GRAVITY,
};

/// A configuration precondition violation, rejected before any timestep is
/// taken. Fatal: none of these are recoverable mid-run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cell count must be positive")]
    EmptyGrid,
    #[error("the interior update needs at least 3 cells, got {0}")]
    TooFewCells(usize),
    #[error("domain length must be positive and finite, got {0}")]
    InvalidLength(Float),
    #[error("CFL number must lie in (0, 1), got {0}")]
    InvalidCfl(Float),
    #[error("final time must be positive, got {0}")]
    InvalidFinalTime(Float),
    #[error("initial depth in cell {cell} is negative: {depth}")]
    NegativeDepth { cell: usize, depth: Float },
    #[error("bathymetry has {got} values, grid has {expected} cells")]
    BathymetryLength { expected: usize, got: usize },
}

/// Supplies the initial `(h, hu)` state at a cell-center coordinate.
pub trait InitialCondition: Fn(Float) -> State {}
impl<T> InitialCondition for T where T: Fn(Float) -> State {}

/// Everything a run needs: discretization, bed shape, physical constants,
/// scheme and boundary choices, and the initial-state provider. All
/// configuration is explicit — there is no process-wide state.
#[derive(Clone)]
pub struct Problem<'pb> {
    pub(crate) name: String,
    pub(crate) grid: Grid,
    pub(crate) bathymetry: Bathymetry,
    pub(crate) scheme: FluxScheme,
    pub(crate) boundary: BoundaryPolicy,
    pub(crate) initial: Rc<dyn InitialCondition + 'pb>,
    pub(crate) cfl_number: Float,
    pub(crate) final_time: Float,
    pub(crate) gravity: Float,
    pub(crate) dry_depth: Float,
}

impl<'pb> Problem<'pb> {
    pub fn new(
        name: impl AsRef<str>,
        grid: Grid,
        bathymetry: Bathymetry,
        scheme: FluxScheme,
        boundary: BoundaryPolicy,
        initial: impl InitialCondition + 'pb,
    ) -> Self {
        Self {
            name: name.as_ref().to_string(),
            grid,
            bathymetry,
            scheme,
            boundary,
            initial: Rc::new(initial),
            cfl_number: 0.45,
            final_time: 0.2,
            gravity: GRAVITY,
            dry_depth: DRY_DEPTH,
        }
    }

    pub fn with_cfl(mut self, number: Float) -> Self {
        self.cfl_number = number;
        self
    }

    pub fn with_final_time(mut self, final_time: Float) -> Self {
        self.final_time = final_time;
        self
    }

    pub fn with_gravity(mut self, gravity: Float) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_dry_depth(mut self, dry_depth: Float) -> Self {
        self.dry_depth = dry_depth;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn bathymetry(&self) -> &Bathymetry {
        &self.bathymetry
    }

    pub fn scheme(&self) -> FluxScheme {
        self.scheme
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn cfl_number(&self) -> Float {
        self.cfl_number
    }

    pub fn final_time(&self) -> Float {
        self.final_time
    }

    pub fn gravity(&self) -> Float {
        self.gravity
    }

    pub fn dry_depth(&self) -> Float {
        self.dry_depth
    }

    /// Check every construction precondition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cells() < 3 {
            return Err(ConfigError::TooFewCells(self.grid.cells()));
        }
        if !(self.cfl_number > 0.0 && self.cfl_number < 1.0) {
            return Err(ConfigError::InvalidCfl(self.cfl_number));
        }
        if !self.final_time.is_finite() || self.final_time <= 0.0 {
            return Err(ConfigError::InvalidFinalTime(self.final_time));
        }
        Ok(())
    }

    /// Sample the initial condition at every cell center into a fresh
    /// `cells × 2` solution matrix.
    pub(crate) fn initial_state(&self) -> Result<Mat<Float>, ConfigError> {
        let mut solution = Mat::<Float>::zeros(self.grid.cells(), 2);
        let mut view = solution.as_mut();
        for (i, x) in self.grid.centers().enumerate() {
            let w = (self.initial)(x);
            if w.h < 0.0 {
                return Err(ConfigError::NegativeDepth {
                    cell: i,
                    depth: w.h,
                });
            }
            w.store(&mut view, i);
        }
        drop(view);
        Ok(solution)
    }
}

impl fmt::Debug for Problem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("name", &self.name)
            .field("grid", &self.grid)
            .field("scheme", &self.scheme.name())
            .field("boundary", &self.boundary.name())
            .field("initial", &"<dyn InitialCondition>")
            .field("cfl_number", &self.cfl_number)
            .field("final_time", &self.final_time)
            .field("gravity", &self.gravity)
            .field("dry_depth", &self.dry_depth)
            .finish()
    }
}
