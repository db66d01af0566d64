//! Well-balancing check: a resting lake over a parabolic bump. The largest
//! residual discharge after a long run is reported; it should sit at
//! rounding level.

use std::{fs::File, io::BufWriter};

use tracing::info;

use saintvenant::{
    diagnostics, scenarios, Bathymetry, BoundaryPolicy, Driver, FluxScheme, Grid, Logger, Problem,
    SimError, SnapshotWriter, State,
};

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt::init();

    let grid = Grid::new(200, 1.0)?;
    let bed_shape = scenarios::parabolic_bump_bed(0.4, 0.5, 0.2);
    let bed = Bathymetry::from_profile(&grid, &bed_shape);
    let problem = Problem::new(
        "lake at rest",
        grid,
        bed,
        FluxScheme::Rusanov,
        BoundaryPolicy::Reflective,
        scenarios::lake_at_rest(1.0, bed_shape),
    )
    .with_cfl(0.45)
    .with_final_time(2.0);

    let mut driver = Driver::new(problem)?
        .with_sampling(200)
        .with_observer(Logger)
        .with_observer(SnapshotWriter::new(BufWriter::new(File::create(
            "solution_lake.txt",
        )?)));
    driver.run()?;

    let integrator = driver.integrator();
    let mut max_discharge: f64 = 0.0;
    for i in 0..grid.cells() {
        max_discharge = max_discharge.max(State::read(integrator.solution(), i).hu.abs());
    }
    let mass = diagnostics::total_mass(integrator.solution(), &grid);
    info!("largest |hu| = {max_discharge:e}, total mass = {mass:.6}");

    Ok(())
}
