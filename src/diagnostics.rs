//! Read-only reductions over a solution, used for validation. Nothing here
//! mutates solver state or participates in the update loop.

use faer_core::MatRef;

use crate::{bathymetry::Bathymetry, grid::Grid, state::State, Float};

/// Water volume per unit width: `Σ hᵢ·dx`.
pub fn total_mass(solution: MatRef<'_, Float>, grid: &Grid) -> Float {
    let mut sum = 0.0;
    for i in 0..solution.nrows() {
        sum += solution[(i, 0)];
    }
    sum * grid.dx()
}

/// Potential plus kinetic energy: `Σ (½·g·h² + ½·h·u²)·dx`.
pub fn total_energy(
    solution: MatRef<'_, Float>,
    grid: &Grid,
    g: Float,
    dry_depth: Float,
) -> Float {
    let mut sum = 0.0;
    for i in 0..solution.nrows() {
        let w = State::read(solution, i);
        let u = w.velocity(dry_depth);
        sum += 0.5 * g * w.h * w.h + 0.5 * w.h * u * u;
    }
    sum * grid.dx()
}

/// Cell center of the wet cell with the highest free surface, or `None`
/// when every cell is dry.
pub fn crest_position(
    solution: MatRef<'_, Float>,
    grid: &Grid,
    bathymetry: &Bathymetry,
    dry_depth: Float,
) -> Option<Float> {
    let mut best: Option<(usize, Float)> = None;
    for i in 0..solution.nrows() {
        let w = State::read(solution, i);
        if w.h > dry_depth {
            let surface = w.surface(bathymetry.level(i));
            if best.map_or(true, |(_, top)| surface > top) {
                best = Some((i, surface));
            }
        }
    }
    best.map(|(i, _)| grid.cell_center(i))
}
