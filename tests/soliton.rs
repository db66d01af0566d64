//! Translation speed of a solitary wave: the measured crest speed must sit
//! within 5% of the finite-amplitude celerity `√(g·(h₀ + A))`.

use saintvenant::{
    diagnostics, scenarios, Bathymetry, BoundaryPolicy, FluxScheme, Grid, Integrator, Problem,
    GRAVITY,
};

#[test]
fn soliton_crest_travels_at_the_finite_amplitude_celerity() {
    let rest_depth = 1.0;
    let amplitude = 0.3;

    let grid = Grid::new(2000, 2.0).unwrap();
    let problem = Problem::new(
        "soliton translation",
        grid,
        Bathymetry::flat(&grid),
        FluxScheme::Hll,
        BoundaryPolicy::Transmissive,
        scenarios::soliton(rest_depth, amplitude, 0.6, GRAVITY),
    )
    .with_cfl(0.5);

    let mut integrator = Integrator::new(&problem).unwrap();
    let dry = problem.dry_depth();

    let crest = |integrator: &Integrator| -> f64 {
        diagnostics::crest_position(
            integrator.solution(),
            &grid,
            integrator.bathymetry(),
            dry,
        )
        .unwrap()
    };

    // Skip the initial transient, then measure over a fixed window.
    let (t0, t1) = (0.02, 0.12);
    while integrator.time() < t0 {
        integrator.advance_capped(t0);
    }
    let x0 = crest(&integrator);
    while integrator.time() < t1 {
        integrator.advance_capped(t1);
    }
    let x1 = crest(&integrator);

    let measured = (x1 - x0) / (t1 - t0);
    let theoretical = (GRAVITY * (rest_depth + amplitude)).sqrt();
    let relative_error = ((measured - theoretical) / theoretical).abs();

    assert!(x1 > x0, "crest did not move right: {x0} -> {x1}");
    assert!(
        relative_error < 0.05,
        "crest speed {measured} deviates {:.1}% from {theoretical}",
        100.0 * relative_error
    );
}
