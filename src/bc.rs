use faer_core::MatMut;
use reborrow::*;

use crate::{state::State, Float};

/// Edge-cell policy applied after every interior update.
///
/// Both policies are legitimate depending on the physical scenario, so the
/// choice is an explicit configuration input with no hardcoded default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Open domain: waves leave freely; each edge cell copies its interior
    /// neighbour.
    Transmissive,
    /// Solid walls: each edge cell copies its interior neighbour with the
    /// discharge negated.
    Reflective,
}

impl BoundaryPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryPolicy::Transmissive => "transmissive",
            BoundaryPolicy::Reflective => "reflective",
        }
    }

    /// Fill both edge cells of a freshly updated solution buffer.
    pub fn apply(&self, mut solution: MatMut<'_, Float>) {
        let n = solution.nrows();
        let lo = State::read(solution.rb(), 1);
        let hi = State::read(solution.rb(), n - 2);
        let (lo, hi) = match self {
            BoundaryPolicy::Transmissive => (lo, hi),
            BoundaryPolicy::Reflective => (
                State::new(lo.h, -lo.hu),
                State::new(hi.h, -hi.hu),
            ),
        };
        lo.store(&mut solution, 0);
        hi.store(&mut solution, n - 1);
    }
}
