//! Solitary wave translating over a flat bed, written both as plottable
//! text and as a compact binary stream.

use std::{fs::File, io::BufWriter};

use tracing::info;

use saintvenant::{
    diagnostics, scenarios, Bathymetry, BinarySnapshotWriter, BoundaryPolicy, Driver, FluxScheme,
    Grid, Logger, Problem, SimError, SnapshotWriter, GRAVITY,
};

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt::init();

    let grid = Grid::new(800, 2.0)?;
    let problem = Problem::new(
        "soliton",
        grid,
        Bathymetry::flat(&grid),
        FluxScheme::Hll,
        BoundaryPolicy::Transmissive,
        scenarios::soliton(1.0, 0.3, 0.6, GRAVITY),
    )
    .with_cfl(0.5)
    .with_final_time(0.25);

    let mut driver = Driver::new(problem)?
        .with_sampling(25)
        .with_observer(Logger)
        .with_observer(SnapshotWriter::new(BufWriter::new(File::create(
            "solution_soliton.txt",
        )?)))
        .with_observer(BinarySnapshotWriter::new(BufWriter::new(File::create(
            "solution_soliton.svff",
        )?)));
    driver.run()?;

    let integrator = driver.integrator();
    if let Some(crest) = diagnostics::crest_position(
        integrator.solution(),
        &grid,
        integrator.bathymetry(),
        1e-6,
    ) {
        info!(
            "crest at x={crest:.3} after t={:.3} (celerity {:.3} m/s)",
            integrator.time(),
            (GRAVITY * 1.3f64).sqrt()
        );
    }

    Ok(())
}
