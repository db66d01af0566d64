//! Classical dam break run with all four flux schemes, one output file per
//! scheme for side-by-side plotting.

use std::{fs::File, io::BufWriter};

use tracing::info;

use saintvenant::{
    scenarios, Bathymetry, BoundaryPolicy, Driver, FluxScheme, Grid, Logger, Problem, SimError,
    SnapshotWriter,
};

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt::init();

    for (scheme, path) in [
        (FluxScheme::LaxFriedrichs, "solution_lf.txt"),
        (FluxScheme::Rusanov, "solution_rusanov.txt"),
        (FluxScheme::Hll, "solution_hll.txt"),
        (FluxScheme::Roe, "solution_roe.txt"),
    ] {
        let grid = Grid::new(200, 1.0)?;
        let problem = Problem::new(
            format!("dam break / {}", scheme.name()),
            grid,
            Bathymetry::flat(&grid),
            scheme,
            BoundaryPolicy::Reflective,
            scenarios::dam_break(2.0, 0.5, 0.5),
        )
        .with_cfl(0.45)
        .with_final_time(0.2);

        let output = BufWriter::new(File::create(path)?);
        let mut driver = Driver::new(problem)?
            .with_sampling(50)
            .with_observer(Logger)
            .with_observer(SnapshotWriter::new(output));
        driver.run()?;

        info!("wrote {path}");
    }

    Ok(())
}
