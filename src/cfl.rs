use faer_core::MatRef;

use crate::{state::State, Float, SPEED_EPSILON};

/// Derives a stable explicit timestep from the current wave speeds
/// (Courant–Friedrichs–Lewy condition).
///
/// `number` must lie in `(0, 1)` for the explicit scheme to be stable —
/// 0.45 is conservative, 0.9 aggressive. That precondition is validated at
/// problem construction, not here: the controller applies whatever it is
/// given and never corrects it silently.
#[derive(Debug, Clone, Copy)]
pub struct CflController {
    pub number: Float,
    /// Timestep used when the whole domain is at rest.
    pub fallback_dt: Float,
}

impl CflController {
    pub fn new(number: Float) -> Self {
        Self {
            number,
            fallback_dt: 0.01,
        }
    }

    /// Domain-wide `max(|u| + c)` over a solution matrix.
    pub fn max_wave_speed(solution: MatRef<'_, Float>, g: Float, dry_depth: Float) -> Float {
        let mut v_max: Float = 0.0;
        for i in 0..solution.nrows() {
            v_max = v_max.max(State::read(solution, i).max_wave_speed(g, dry_depth));
        }
        v_max
    }

    /// `CFL·dx / v_max`, or the fixed fallback when nothing moves.
    pub fn timestep(&self, v_max: Float, dx: Float) -> Float {
        if v_max > SPEED_EPSILON {
            self.number * dx / v_max
        } else {
            self.fallback_dt
        }
    }
}
