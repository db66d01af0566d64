use std::io::Write;

use bytemuck::bytes_of;
use faer_core::MatRef;
use thiserror::Error;

use crate::{
    bathymetry::Bathymetry,
    grid::Grid,
    integrator::Integrator,
    problem::{ConfigError, Problem},
    state::State,
    Float,
};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("output error")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}

/// Read-only view handed to observers at every sampled step.
pub struct ObsCtx<'pb, 'ctx> {
    problem: &'ctx Problem<'pb>,
    iter: usize,
    time: Float,
    dt: Float,
    solution: MatRef<'ctx, Float>,
    sampling: usize,
}

impl<'pb, 'ctx> ObsCtx<'pb, 'ctx> {
    pub fn problem(&self) -> &Problem<'pb> {
        self.problem
    }

    pub fn grid(&self) -> Grid {
        self.problem.grid()
    }

    pub fn bathymetry(&self) -> &Bathymetry {
        self.problem.bathymetry()
    }

    pub fn iter(&self) -> usize {
        self.iter
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn dt(&self) -> Float {
        self.dt
    }

    pub fn solution(&self) -> MatRef<'ctx, Float> {
        self.solution
    }

    pub fn sampling_period(&self) -> usize {
        self.sampling
    }
}

/// Snapshot consumer driven by [`Driver::run`]. The integrator never owns
/// an output handle; everything it produces flows through these hooks.
#[allow(unused_variables)]
pub trait Observer {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }

    fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }
}

/// Owns the run loop: advances the integrator until the configured final
/// time, sampling observers every `sampling` steps and once at the end.
pub struct Driver<'pb, 'd> {
    problem: Problem<'pb>,
    integrator: Integrator,
    observers: Vec<Box<dyn Observer + 'd>>,
    sampling: usize,
}

impl<'pb, 'd> Driver<'pb, 'd> {
    /// Validates the problem; configuration rejection happens here, before
    /// any stepping.
    pub fn new(problem: Problem<'pb>) -> Result<Self, ConfigError> {
        let integrator = Integrator::new(&problem)?;
        Ok(Self {
            problem,
            integrator,
            observers: Vec::new(),
            sampling: 50,
        })
    }

    /// Emit a snapshot to the observers every `period` steps.
    pub fn with_sampling(mut self, period: usize) -> Self {
        self.sampling = period.max(1);
        self
    }

    pub fn with_observer(mut self, observer: impl Observer + 'd) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn run(&mut self) -> Result<(), SimError> {
        let t_final = self.problem.final_time();

        for o in self.observers.iter_mut() {
            o.at_startup(ObsCtx {
                problem: &self.problem,
                iter: 0,
                time: self.integrator.time(),
                dt: 0.0,
                solution: self.integrator.solution(),
                sampling: self.sampling,
            })?;
        }

        while self.integrator.time() < t_final {
            let before = self.integrator.time();
            let report = self.integrator.advance_capped(t_final);
            // A capped timestep below the time resolution makes no
            // progress; stop instead of spinning.
            if self.integrator.time() <= before {
                break;
            }

            let n = self.integrator.steps_taken();
            if report.clamped_cells > 0 {
                tracing::event!(
                    tracing::Level::TRACE,
                    "step {}: clamped {} dry cells (min depth {:e})",
                    n,
                    report.clamped_cells,
                    report.min_depth,
                );
            }

            if n % self.sampling == 0 || self.integrator.time() >= t_final {
                for o in self.observers.iter_mut() {
                    o.at_each_iteration(ObsCtx {
                        problem: &self.problem,
                        iter: n,
                        time: self.integrator.time(),
                        dt: report.dt,
                        solution: self.integrator.solution(),
                        sampling: self.sampling,
                    })?;
                }
            }
        }

        for o in self.observers.iter_mut() {
            o.at_cleanup(ObsCtx {
                problem: &self.problem,
                iter: self.integrator.steps_taken(),
                time: self.integrator.time(),
                dt: 0.0,
                solution: self.integrator.solution(),
                sampling: self.sampling,
            })?;
        }

        Ok(())
    }
}

/// Console progress via `tracing` events.
pub struct Logger;

impl Observer for Logger {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::INFO,
            "start of `{}` (`{}` flux, {} boundary, {} cells, Δx={:e}, CFL={})",
            ctx.problem().name(),
            ctx.problem().scheme().name(),
            ctx.problem().boundary().name(),
            ctx.grid().cells(),
            ctx.grid().dx(),
            ctx.problem().cfl_number(),
        );
        Ok(())
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::TRACE,
            "`{}`: step {} (t={:e}, dt={:e})",
            ctx.problem().name(),
            ctx.iter(),
            ctx.time(),
            ctx.dt(),
        );
        Ok(())
    }

    fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::INFO,
            "finished `{}` at t={:e} after {} steps",
            ctx.problem().name(),
            ctx.time(),
            ctx.iter(),
        );
        Ok(())
    }
}

/// Writes the block-delimited text layout the plotting scripts consume: one
/// `time x h u zb h+zb` row per cell, snapshots separated by a blank line.
/// This layout is a compatibility contract; do not change it.
pub struct SnapshotWriter<W> {
    output: W,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> Observer for SnapshotWriter<W> {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        self.at_each_iteration(ctx)
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        let dry_depth = ctx.problem().dry_depth();
        let grid = ctx.grid();
        for i in 0..ctx.solution().nrows() {
            let w = State::read(ctx.solution(), i);
            let zb = ctx.bathymetry().level(i);
            writeln!(
                self.output,
                "{} {} {} {} {} {}",
                ctx.time(),
                grid.cell_center(i),
                w.h,
                w.velocity(dry_depth),
                zb,
                w.surface(zb),
            )?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn at_cleanup(&mut self, _ctx: ObsCtx) -> Result<(), SimError> {
        self.output.flush().map_err(SimError::from)
    }
}

const SVFF1_HEADER: &[u8] = b"SVFF1";

/// Compact binary sibling of [`SnapshotWriter`] for fast post-processing:
/// framed layout header (including the static bed elevations), then one
/// time-stamped depth/discharge column pair per snapshot.
pub struct BinarySnapshotWriter<W> {
    output: W,
}

impl<W: Write> BinarySnapshotWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> Observer for BinarySnapshotWriter<W> {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        let output = &mut self.output;
        // magic bytes
        output.write_all(SVFF1_HEADER)?;
        // float precision
        output.write_all(bytes_of(&(std::mem::size_of::<Float>() as u8)))?;
        // layout
        output.write_all(bytes_of(&(ctx.grid().cells() as u32)))?;
        output.write_all(bytes_of(&(ctx.sampling_period() as u32)))?;
        output.write_all(bytes_of(&ctx.grid().length()))?;
        output.write_all(bytes_of(&ctx.problem().gravity()))?;
        // flux scheme name
        let name = ctx.problem().scheme().name().as_bytes();
        output.write_all(bytes_of(&(name.len() as u32)))?;
        output.write_all(name)?;
        // bed elevations, written once since they never change
        output.write_all(bytemuck::cast_slice(column_slice(
            ctx.bathymetry().levels(),
            0,
        )))?;

        // marker
        output.write_all(&[0xFF, 0xFF, 0xFF, 0xFF])?;

        // initial snapshot
        self.at_each_iteration(ctx)
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        self.output.write_all(bytes_of(&ctx.time()))?;
        let u = ctx.solution();
        self.output.write_all(bytemuck::cast_slice(column_slice(u, 0)))?;
        self.output.write_all(bytemuck::cast_slice(column_slice(u, 1)))?;
        Ok(())
    }

    fn at_cleanup(&mut self, _ctx: ObsCtx) -> Result<(), SimError> {
        self.output.write_all(&[0xFF, 0xFF, 0xFF, 0xFF])?;
        self.output.flush().map_err(SimError::from)
    }
}

fn column_slice<'a>(m: MatRef<'a, Float>, j: usize) -> &'a [Float] {
    // SAFETY: faer stores matrices in column-major order with the guarantee
    // that each column is contiguous; this takes exactly one column.
    unsafe { std::slice::from_raw_parts(m.col(j).as_ptr(), m.nrows()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bc::BoundaryPolicy, flux::FluxScheme, scenarios};

    fn problem<'pb>() -> Problem<'pb> {
        let grid = Grid::new(20, 1.0).unwrap();
        let bed = Bathymetry::flat(&grid);
        Problem::new(
            "driver test",
            grid,
            bed,
            FluxScheme::Rusanov,
            BoundaryPolicy::Transmissive,
            scenarios::uniform(1.0, 0.0),
        )
        .with_final_time(0.01)
    }

    #[test]
    fn run_reaches_the_final_time_exactly() {
        let mut driver = Driver::new(problem()).unwrap();
        driver.run().unwrap();
        assert!((driver.integrator().time() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn text_snapshots_have_six_columns_and_blank_separators() {
        let mut buffer = Vec::new();
        {
            let mut driver = Driver::new(problem())
                .unwrap()
                .with_sampling(5)
                .with_observer(SnapshotWriter::new(&mut buffer));
            driver.run().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        let mut blocks = 0;
        for block in text.split("\n\n").filter(|b| !b.trim().is_empty()) {
            blocks += 1;
            for line in block.lines() {
                assert_eq!(line.split_whitespace().count(), 6, "bad row: {line:?}");
            }
        }
        // At least the startup and final snapshots.
        assert!(blocks >= 2);
    }

    #[test]
    fn binary_snapshots_are_framed_with_the_magic_bytes() {
        let mut buffer = Vec::new();
        {
            let mut driver = Driver::new(problem())
                .unwrap()
                .with_observer(BinarySnapshotWriter::new(&mut buffer));
            driver.run().unwrap();
        }
        assert_eq!(&buffer[..5], b"SVFF1");
        assert_eq!(buffer[5] as usize, std::mem::size_of::<Float>());
        assert_eq!(&buffer[buffer.len() - 4..], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
