use std::ops::{Add, Mul, Sub};

use faer_core::{MatMut, MatRef};

use crate::Float;

/// Conserved variables of a single cell: water depth `h` and discharge
/// `hu = h·u`.
///
/// A cell is wet when its depth exceeds the dry threshold; derived
/// quantities of dry cells (velocity, celerity) are zero by convention so
/// no division by a vanishing depth ever happens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct State {
    pub h: Float,
    pub hu: Float,
}

impl State {
    pub const ZERO: State = State { h: 0.0, hu: 0.0 };

    pub fn new(h: Float, hu: Float) -> Self {
        Self { h, hu }
    }

    /// Build from primitive variables depth and velocity.
    pub fn from_primitives(h: Float, u: Float) -> Self {
        Self { h, hu: h * u }
    }

    pub fn is_dry(&self, dry_depth: Float) -> bool {
        self.h <= dry_depth
    }

    /// `hu / h` for wet cells, zero for dry ones.
    pub fn velocity(&self, dry_depth: Float) -> Float {
        if self.h > dry_depth {
            self.hu / self.h
        } else {
            0.0
        }
    }

    /// Gravity-wave celerity `√(g·h)`, zero for dry cells.
    pub fn celerity(&self, g: Float, dry_depth: Float) -> Float {
        if self.h > dry_depth {
            (g * self.h).sqrt()
        } else {
            0.0
        }
    }

    /// `|u| + c`, the fastest characteristic speed leaving this cell.
    pub fn max_wave_speed(&self, g: Float, dry_depth: Float) -> Float {
        self.velocity(dry_depth).abs() + self.celerity(g, dry_depth)
    }

    /// Free-surface elevation above the given bed level.
    pub fn surface(&self, zb: Float) -> Float {
        self.h + zb
    }

    /// Read cell `i` out of a `cells × 2` solution matrix.
    pub fn read(solution: MatRef<'_, Float>, i: usize) -> Self {
        Self {
            h: solution[(i, 0)],
            hu: solution[(i, 1)],
        }
    }

    /// Write this state into cell `i` of a solution matrix.
    pub fn store(self, solution: &mut MatMut<'_, Float>, i: usize) {
        solution[(i, 0)] = self.h;
        solution[(i, 1)] = self.hu;
    }
}

impl Add for State {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            h: self.h + rhs.h,
            hu: self.hu + rhs.hu,
        }
    }
}

impl Sub for State {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            h: self.h - rhs.h,
            hu: self.hu - rhs.hu,
        }
    }
}

impl Mul<Float> for State {
    type Output = Self;

    fn mul(self, scalar: Float) -> Self {
        Self {
            h: self.h * scalar,
            hu: self.hu * scalar,
        }
    }
}
