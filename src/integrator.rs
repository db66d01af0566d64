use faer_core::{Mat, MatRef};
use reborrow::*;

use crate::{
    bathymetry::Bathymetry,
    bc::BoundaryPolicy,
    cfl::CflController,
    flux::{FluxContext, FluxScheme},
    grid::Grid,
    problem::{ConfigError, Problem},
    reconstruction,
    state::State,
    Float,
};

/// What one `advance` call did.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    /// Timestep actually taken.
    pub dt: Float,
    /// Cells forced to exactly `(0, 0)` by the dry clamp.
    pub clamped_cells: usize,
    /// Smallest depth in the updated buffer before the clamp. Slightly
    /// negative values are an expected regime of the explicit scheme near
    /// dry fronts, masked by the clamp rather than raised as errors.
    pub min_depth: Float,
}

/// Explicit Godunov update loop.
///
/// Owns the evolving solution for the lifetime of the run and advances it
/// one timestep per call: CFL timestep, hydrostatic reconstruction and
/// numerical flux at every interior interface, conservative update into a
/// fresh buffer, boundary fill, dry clamp, commit.
pub struct Integrator {
    grid: Grid,
    bathymetry: Bathymetry,
    scheme: FluxScheme,
    boundary: BoundaryPolicy,
    controller: CflController,
    gravity: Float,
    dry_depth: Float,
    solution: Mat<Float>,
    time: Float,
    steps: usize,
}

impl Integrator {
    /// Validate the problem and set up a run. All configuration rejection
    /// happens here, before the first step.
    pub fn new(problem: &Problem<'_>) -> Result<Self, ConfigError> {
        problem.validate()?;
        Ok(Self::from_parts(
            problem.grid(),
            problem.bathymetry().clone(),
            problem.scheme(),
            problem.boundary(),
            CflController::new(problem.cfl_number()),
            problem.gravity(),
            problem.dry_depth(),
            problem.initial_state()?,
        ))
    }

    /// Assemble a run from raw parts, skipping validation. Callers own the
    /// validity of what they pass; `solution` must be a `cells × 2` matrix
    /// with at least 3 rows.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        grid: Grid,
        bathymetry: Bathymetry,
        scheme: FluxScheme,
        boundary: BoundaryPolicy,
        controller: CflController,
        gravity: Float,
        dry_depth: Float,
        solution: Mat<Float>,
    ) -> Self {
        Self {
            grid,
            bathymetry,
            scheme,
            boundary,
            controller,
            gravity,
            dry_depth,
            solution,
            time: 0.0,
            steps: 0,
        }
    }

    pub fn solution(&self) -> MatRef<'_, Float> {
        self.solution.as_ref()
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
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

    /// One explicit step at the CFL-stable timestep.
    pub fn advance(&mut self) -> StepReport {
        self.advance_capped(Float::INFINITY)
    }

    /// One explicit step, with the timestep shortened so the run lands
    /// exactly on `t_end` instead of overshooting it.
    pub fn advance_capped(&mut self, t_end: Float) -> StepReport {
        // Domain-wide reduction, completed before any flux is evaluated.
        // The same maximum drives the CFL timestep and the global
        // Lax-Friedrichs dissipation.
        let v_max =
            CflController::max_wave_speed(self.solution.as_ref(), self.gravity, self.dry_depth);
        let mut dt = self.controller.timestep(v_max, self.grid.dx());
        let remaining = t_end - self.time;
        if remaining.is_finite() && dt > remaining {
            dt = remaining.max(0.0);
        }
        self.step(dt, v_max)
    }

    fn step(&mut self, dt: Float, v_max: Float) -> StepReport {
        let n = self.grid.cells();
        let r = dt / self.grid.dx();
        let ctx = FluxContext {
            g: self.gravity,
            dry_depth: self.dry_depth,
            global_wave_speed: v_max,
        };

        // Fresh buffer every step: fluxes read the previous solution only,
        // writes land in disjoint memory.
        let mut next = Mat::<Float>::zeros(n, 2);
        {
            let current = self.solution.as_ref();
            let mut out = next.as_mut();

            for i in 1..n - 1 {
                let w = State::read(current, i);
                let zb = self.bathymetry.level(i);

                let left_face = reconstruction::reconstruct(
                    State::read(current, i - 1),
                    self.bathymetry.level(i - 1),
                    w,
                    zb,
                );
                let flux_left = self
                    .scheme
                    .interface_flux(left_face.left, left_face.right, &ctx);

                let right_face = reconstruction::reconstruct(
                    w,
                    zb,
                    State::read(current, i + 1),
                    self.bathymetry.level(i + 1),
                );
                let flux_right = self
                    .scheme
                    .interface_flux(right_face.left, right_face.right, &ctx);

                // Bed-slope source built from the same reconstructed depths,
                // so the hydrostatic flux imbalance cancels exactly over a
                // resting free surface.
                let source =
                    reconstruction::momentum_source(self.gravity, right_face.left.h, left_face.right.h);

                out[(i, 0)] = w.h - r * (flux_right.h - flux_left.h);
                out[(i, 1)] = w.hu - r * (flux_right.hu - flux_left.hu) + r * source;
            }

            self.boundary.apply(out.rb_mut());
        }

        // Dry clamp: mask any negative depth the update produced and kill
        // ghost velocities in near-empty cells.
        let mut clamped_cells = 0usize;
        let mut min_depth = Float::INFINITY;
        {
            let mut out = next.as_mut();
            for i in 0..n {
                let h = out[(i, 0)];
                min_depth = min_depth.min(h);
                if h <= self.dry_depth {
                    out[(i, 0)] = 0.0;
                    out[(i, 1)] = 0.0;
                    clamped_cells += 1;
                }
            }
        }

        self.solution = next;
        self.time += dt;
        self.steps += 1;

        StepReport {
            dt,
            clamped_cells,
            min_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    fn problem<'pb>(
        cells: usize,
        scheme: FluxScheme,
        initial: impl Fn(Float) -> State + 'pb,
    ) -> Problem<'pb> {
        let grid = Grid::new(cells, 1.0).unwrap();
        let bed = Bathymetry::flat(&grid);
        Problem::new("step test", grid, bed, scheme, BoundaryPolicy::Transmissive, initial)
    }

    #[test]
    fn uniform_still_water_does_not_move() {
        let problem = problem(50, FluxScheme::Hll, scenarios::uniform(1.5, 0.0));
        let mut integrator = Integrator::new(&problem).unwrap();
        let report = integrator.advance();

        assert!(report.dt > 0.0);
        assert_eq!(report.clamped_cells, 0);
        for i in 0..50 {
            let w = State::read(integrator.solution(), i);
            assert!((w.h - 1.5).abs() < 1e-14);
            assert!(w.hu.abs() < 1e-14);
        }
    }

    #[test]
    fn dry_domain_uses_the_fallback_timestep_and_stays_dry() {
        let problem = problem(10, FluxScheme::Rusanov, scenarios::uniform(0.0, 0.0));
        let mut integrator = Integrator::new(&problem).unwrap();
        let report = integrator.advance();

        assert_eq!(report.dt, 0.01);
        assert_eq!(report.clamped_cells, 10);
        for i in 0..10 {
            assert_eq!(State::read(integrator.solution(), i), State::ZERO);
        }
    }

    #[test]
    fn time_and_step_counters_advance() {
        let problem = problem(20, FluxScheme::Rusanov, scenarios::uniform(1.0, 0.0));
        let mut integrator = Integrator::new(&problem).unwrap();
        let a = integrator.advance();
        let b = integrator.advance();
        assert_eq!(integrator.steps_taken(), 2);
        assert!((integrator.time() - (a.dt + b.dt)).abs() < 1e-15);
    }

    #[test]
    fn capped_step_lands_on_the_final_time() {
        let problem = problem(20, FluxScheme::Rusanov, scenarios::uniform(1.0, 0.0));
        let mut integrator = Integrator::new(&problem).unwrap();
        let tiny = 1e-6;
        let report = integrator.advance_capped(tiny);
        assert!((report.dt - tiny).abs() < 1e-18);
        assert!((integrator.time() - tiny).abs() < 1e-18);
    }

    #[test]
    fn invalid_configuration_never_builds_an_integrator() {
        let bad = problem(20, FluxScheme::Rusanov, scenarios::uniform(1.0, 0.0)).with_cfl(2.0);
        assert!(Integrator::new(&bad).is_err());
    }

    #[test]
    fn depth_stays_non_negative_and_dry_cells_carry_no_discharge() {
        // Dam break onto an almost dry bed.
        let problem = problem(
            100,
            FluxScheme::Hll,
            scenarios::dam_break(1.0, 0.0, 0.5),
        );
        let mut integrator = Integrator::new(&problem).unwrap();
        for _ in 0..200 {
            integrator.advance();
            for i in 0..100 {
                let w = State::read(integrator.solution(), i);
                assert!(w.h >= 0.0);
                if w.h <= problem.dry_depth() {
                    assert_eq!(w.hu, 0.0);
                }
            }
        }
    }
}
