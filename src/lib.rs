//! Finite-volume solver for the 1D Saint-Venant (shallow-water) equations
//! with pluggable numerical fluxes, variable bed topography and a
//! CFL-adaptive explicit Godunov update.

pub mod bathymetry;
pub mod bc;
pub mod cfl;
pub mod diagnostics;
pub mod driver;
pub mod flux;
pub mod grid;
pub mod integrator;
pub mod problem;
pub mod reconstruction;
pub mod scenarios;
pub mod state;

pub use bathymetry::Bathymetry;
pub use bc::BoundaryPolicy;
pub use cfl::CflController;
pub use driver::{BinarySnapshotWriter, Driver, Logger, ObsCtx, Observer, SimError, SnapshotWriter};
pub use flux::{FluxContext, FluxScheme};
pub use grid::Grid;
pub use integrator::{Integrator, StepReport};
pub use problem::{ConfigError, Problem};
pub use state::State;

/// Scalar type used throughout the solver.
pub type Float = f64;

/// Standard gravitational acceleration, m/s².
pub const GRAVITY: Float = 9.81;

/// Default depth below which a cell is treated as dry.
pub const DRY_DEPTH: Float = 1e-6;

// Wave speeds below this count as a domain at rest.
pub(crate) const SPEED_EPSILON: Float = 1e-10;
