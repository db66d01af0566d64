//! The CFL bound is load-bearing: below 1 the dam break stays bounded, at
//! 1.1 the explicit update drives some depth negative before the dry clamp
//! masks it.

use faer::Mat;
use saintvenant::{
    scenarios, Bathymetry, BoundaryPolicy, CflController, FluxScheme, Grid, Integrator, Problem,
    State, DRY_DEPTH, GRAVITY,
};

#[test]
fn stable_cfl_keeps_the_dam_break_bounded() {
    let grid = Grid::new(200, 1.0).unwrap();
    let problem = Problem::new(
        "stable dam break",
        grid,
        Bathymetry::flat(&grid),
        FluxScheme::Rusanov,
        BoundaryPolicy::Transmissive,
        scenarios::dam_break(2.0, 0.5, 0.5),
    )
    .with_cfl(0.45);

    let mut integrator = Integrator::new(&problem).unwrap();
    for _ in 0..500 {
        let report = integrator.advance();
        assert!(
            report.min_depth > 0.0,
            "depth went negative under a stable CFL"
        );
        for i in 0..grid.cells() {
            let w = State::read(integrator.solution(), i);
            assert!(w.h.is_finite() && w.hu.is_finite());
            assert!(w.h <= 2.5, "depth blew up to {}", w.h);
        }
    }
}

#[test]
fn cfl_above_one_is_rejected_at_construction() {
    let grid = Grid::new(200, 1.0).unwrap();
    let problem = Problem::new(
        "rejected",
        grid,
        Bathymetry::flat(&grid),
        FluxScheme::Rusanov,
        BoundaryPolicy::Transmissive,
        scenarios::dam_break(2.0, 0.5, 0.5),
    )
    .with_cfl(1.1);
    assert!(Integrator::new(&problem).is_err());
}

#[test]
fn cfl_above_one_drives_a_depth_negative_before_clamping() {
    // Construction validation forbids this configuration, so assemble the
    // integrator from raw parts and let the instability develop.
    let grid = Grid::new(200, 1.0).unwrap();
    let initial = scenarios::dam_break(2.0, 0.5, 0.5);
    let solution = Mat::from_fn(grid.cells(), 2, |i, j| {
        let w = initial(grid.cell_center(i));
        if j == 0 {
            w.h
        } else {
            w.hu
        }
    });

    let mut integrator = Integrator::from_parts(
        grid,
        Bathymetry::flat(&grid),
        FluxScheme::Rusanov,
        BoundaryPolicy::Transmissive,
        CflController::new(1.1),
        GRAVITY,
        DRY_DEPTH,
        solution,
    );

    let mut went_negative = false;
    for _ in 0..2000 {
        let report = integrator.advance();
        if report.min_depth < 0.0 {
            went_negative = true;
            break;
        }
    }
    assert!(
        went_negative,
        "CFL = 1.1 never produced a pre-clamp negative depth"
    );
}
