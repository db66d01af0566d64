use crate::{state::State, Float, SPEED_EPSILON};

/// Per-step inputs shared by every interface flux evaluation.
///
/// `global_wave_speed` is the domain-wide `max(|u| + c)` reduction for the
/// current step; it must be computed before any interface is visited and is
/// what distinguishes global Lax-Friedrichs dissipation from the local
/// Rusanov variant.
#[derive(Debug, Clone, Copy)]
pub struct FluxContext {
    pub g: Float,
    pub dry_depth: Float,
    pub global_wave_speed: Float,
}

/// Numerical flux strategy, chosen at configuration time and fixed for the
/// whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxScheme {
    /// Central average with domain-wide dissipation. Most robust, most
    /// dissipative.
    LaxFriedrichs,
    /// Same formula with dissipation taken per interface instead of over
    /// the whole domain.
    Rusanov,
    /// Two-wave approximate Riemann solver with classical wave-speed
    /// estimates.
    Hll,
    /// Linearized Riemann solver on Roe averages. Carries no entropy fix,
    /// so accuracy degrades near transonic rarefactions.
    Roe,
}

impl FluxScheme {
    pub fn name(&self) -> &'static str {
        match self {
            FluxScheme::LaxFriedrichs => "Lax-Friedrichs",
            FluxScheme::Rusanov => "Rusanov",
            FluxScheme::Hll => "HLL",
            FluxScheme::Roe => "Roe",
        }
    }

    /// Numerical flux at the interface between `left` and `right`.
    ///
    /// Every variant degrades to a zero flux across an interface whose both
    /// sides are dry.
    pub fn interface_flux(&self, left: State, right: State, ctx: &FluxContext) -> State {
        if left.is_dry(ctx.dry_depth) && right.is_dry(ctx.dry_depth) {
            return State::ZERO;
        }
        match self {
            FluxScheme::LaxFriedrichs => {
                central_flux(left, right, ctx.global_wave_speed, ctx)
            }
            FluxScheme::Rusanov => rusanov(left, right, ctx),
            FluxScheme::Hll => hll(left, right, ctx),
            FluxScheme::Roe => roe(left, right, ctx),
        }
    }
}

/// Physical flux `F(W) = (hu, hu²/h + ½·g·h²)`; the advective and pressure
/// parts are dropped for a dry cell.
pub fn physical_flux(w: State, ctx: &FluxContext) -> State {
    if w.is_dry(ctx.dry_depth) {
        State::new(w.hu, 0.0)
    } else {
        let u = w.hu / w.h;
        State::new(w.hu, w.hu * u + 0.5 * ctx.g * w.h * w.h)
    }
}

/// `½(F_L + F_R) − ½·α·(W_R − W_L)`, the shared Lax-Friedrichs/Rusanov
/// form; only the choice of `α` differs between the two schemes.
fn central_flux(left: State, right: State, alpha: Float, ctx: &FluxContext) -> State {
    let fl = physical_flux(left, ctx);
    let fr = physical_flux(right, ctx);
    State::new(
        0.5 * (fl.h + fr.h) - 0.5 * alpha * (right.h - left.h),
        0.5 * (fl.hu + fr.hu) - 0.5 * alpha * (right.hu - left.hu),
    )
}

fn rusanov(left: State, right: State, ctx: &FluxContext) -> State {
    let alpha = left
        .max_wave_speed(ctx.g, ctx.dry_depth)
        .max(right.max_wave_speed(ctx.g, ctx.dry_depth));
    central_flux(left, right, alpha, ctx)
}

fn hll(left: State, right: State, ctx: &FluxContext) -> State {
    let ul = left.velocity(ctx.dry_depth);
    let ur = right.velocity(ctx.dry_depth);
    let cl = left.celerity(ctx.g, ctx.dry_depth);
    let cr = right.celerity(ctx.g, ctx.dry_depth);

    // Classical bounding wave-speed estimates.
    let s_l = (ul - cl).min(ur - cr);
    let s_r = (ul + cl).max(ur + cr);

    if s_l >= 0.0 {
        // Every wave runs right: upwind on the left state.
        physical_flux(left, ctx)
    } else if s_r <= 0.0 {
        physical_flux(right, ctx)
    } else if s_r - s_l < SPEED_EPSILON {
        // Degenerate fan; the blend below would divide by ~0.
        rusanov(left, right, ctx)
    } else {
        let fl = physical_flux(left, ctx);
        let fr = physical_flux(right, ctx);
        let inv = 1.0 / (s_r - s_l);
        State::new(
            inv * (s_r * fl.h - s_l * fr.h + s_l * s_r * (right.h - left.h)),
            inv * (s_r * fl.hu - s_l * fr.hu + s_l * s_r * (right.hu - left.hu)),
        )
    }
}

fn roe(left: State, right: State, ctx: &FluxContext) -> State {
    let fl = physical_flux(left, ctx);
    let fr = physical_flux(right, ctx);

    let ul = left.velocity(ctx.dry_depth);
    let ur = right.velocity(ctx.dry_depth);

    let sqrt_hl = left.h.max(0.0).sqrt();
    let sqrt_hr = right.h.max(0.0).sqrt();
    let sqrt_sum = sqrt_hl + sqrt_hr;

    // Roe averages: arithmetic mean for the depth, √h-weighted mean for the
    // velocity.
    let h_avg = 0.5 * (left.h + right.h);
    let u_avg = if sqrt_sum > SPEED_EPSILON {
        (sqrt_hl * ul + sqrt_hr * ur) / sqrt_sum
    } else {
        0.0
    };
    let c_avg = (ctx.g * h_avg).sqrt();

    let lambda1 = u_avg - c_avg;
    let lambda2 = u_avg + c_avg;

    let dh = right.h - left.h;
    let dhu = right.hu - left.hu;

    // Wave strengths from the conserved-variable jump. A vanishing average
    // depth would put c_avg near zero, so both strengths collapse there.
    let (a1, a2) = if h_avg < ctx.dry_depth {
        (0.0, 0.0)
    } else {
        let du = dhu - dh * u_avg;
        (
            (du + c_avg * dh) / (2.0 * c_avg),
            (-du + c_avg * dh) / (2.0 * c_avg),
        )
    };

    let diss_h = lambda1.abs() * a1 + lambda2.abs() * a2;
    let diss_hu = lambda1.abs() * a1 * lambda1 + lambda2.abs() * a2 * lambda2;

    State::new(
        0.5 * (fl.h + fr.h) - 0.5 * diss_h,
        0.5 * (fl.hu + fr.hu) - 0.5 * diss_hu,
    )
}
