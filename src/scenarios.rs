//! Initial-condition and bed-profile builders for the classical test
//! scenarios. Each returns a closure suitable for [`Problem`] or
//! [`Bathymetry::from_profile`].
//!
//! [`Problem`]: crate::problem::Problem
//! [`Bathymetry::from_profile`]: crate::bathymetry::Bathymetry::from_profile

use std::f64::consts::PI;

use crate::{state::State, Float};

/// Two-level dam break: `h_left` of still water left of `x_dam`, `h_right`
/// right of it.
pub fn dam_break(h_left: Float, h_right: Float, x_dam: Float) -> impl Fn(Float) -> State {
    move |x| {
        if x < x_dam {
            State::new(h_left, 0.0)
        } else {
            State::new(h_right, 0.0)
        }
    }
}

/// Right-running solitary wave of the given amplitude over `rest_depth`.
///
/// sech² surface profile; the discharge is initialized co-moving with the
/// wave (`hu = c·(h − h₀)` with `c = √(g·(h₀+A))`), otherwise the bump
/// splits into two opposite-running halves.
pub fn soliton(
    rest_depth: Float,
    amplitude: Float,
    center: Float,
    g: Float,
) -> impl Fn(Float) -> State {
    let k = (3.0 * amplitude / (4.0 * rest_depth.powi(3))).sqrt();
    let c = (g * (rest_depth + amplitude)).sqrt();
    move |x| {
        let sech = 1.0 / (k * (x - center)).cosh();
        let h = rest_depth + amplitude * sech * sech;
        State::new(h, c * (h - rest_depth))
    }
}

/// Gaussian free-surface bump at rest.
pub fn gaussian_bump(
    rest_depth: Float,
    amplitude: Float,
    center: Float,
    width: Float,
) -> impl Fn(Float) -> State {
    move |x| {
        let r = (x - center) / width;
        State::new(rest_depth + amplitude * (-r * r).exp(), 0.0)
    }
}

/// Sinusoidal surface perturbation at rest, one wavelength per domain
/// length.
pub fn sine_wave(rest_depth: Float, amplitude: Float, length: Float) -> impl Fn(Float) -> State {
    move |x| State::new(rest_depth + amplitude * (2.0 * PI * x / length).sin(), 0.0)
}

/// Uniform depth and velocity everywhere.
pub fn uniform(h0: Float, u0: Float) -> impl Fn(Float) -> State {
    move |_x| State::from_primitives(h0, u0)
}

/// Still water with a flat free surface at `level` over the given bed:
/// `h = max(0, level − zb)`, zero discharge. The canonical well-balancing
/// scenario.
pub fn lake_at_rest(level: Float, bed: impl Fn(Float) -> Float) -> impl Fn(Float) -> State {
    move |x| State::new((level - bed(x)).max(0.0), 0.0)
}

/// Parabolic bed bump of the given height, zero outside `center ±
/// half_width`.
pub fn parabolic_bump_bed(
    height: Float,
    center: Float,
    half_width: Float,
) -> impl Fn(Float) -> Float {
    move |x| {
        let r = (x - center) / half_width;
        if r.abs() < 1.0 {
            height * (1.0 - r * r)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dam_break_is_a_sharp_step() {
        let ic = dam_break(2.0, 0.5, 0.5);
        assert_eq!(ic(0.49), State::new(2.0, 0.0));
        assert_eq!(ic(0.51), State::new(0.5, 0.0));
    }

    #[test]
    fn soliton_peaks_at_its_center_and_moves_right() {
        let ic = soliton(1.0, 0.3, 2.0, 9.81);
        let crest = ic(2.0);
        assert!((crest.h - 1.3).abs() < 1e-12);
        assert!(crest.hu > 0.0);
        // Far from the center the water is at rest at the base depth.
        let far = ic(20.0);
        assert!((far.h - 1.0).abs() < 1e-9);
        assert!(far.hu.abs() < 1e-8);
    }

    #[test]
    fn lake_at_rest_levels_the_surface() {
        let bed = parabolic_bump_bed(0.4, 0.5, 0.2);
        let ic = lake_at_rest(1.0, parabolic_bump_bed(0.4, 0.5, 0.2));
        for x in [0.1, 0.45, 0.5, 0.62, 0.9] {
            let w = ic(x);
            assert!((w.h + bed(x) - 1.0).abs() < 1e-12);
            assert_eq!(w.hu, 0.0);
        }
    }

    #[test]
    fn gaussian_bump_decays_away_from_its_center() {
        let ic = gaussian_bump(1.0, 0.2, 0.5, 0.1);
        assert!((ic(0.5).h - 1.2).abs() < 1e-12);
        assert!(ic(0.5).hu == 0.0);
        assert!((ic(0.0).h - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sine_wave_averages_to_the_rest_depth() {
        let ic = sine_wave(1.0, 0.1, 2.0);
        assert!((ic(0.5).h - 1.1).abs() < 1e-12);
        assert!((ic(1.5).h - 0.9).abs() < 1e-12);
        assert!((ic(1.0).h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bump_bed_vanishes_outside_its_support() {
        let bed = parabolic_bump_bed(0.25, 1.0, 0.25);
        assert_eq!(bed(0.5), 0.0);
        assert!((bed(1.0) - 0.25).abs() < 1e-12);
    }
}
