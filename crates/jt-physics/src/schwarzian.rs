// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Schwarzian Evaluator
// ─────────────────────────────────────────────────────────────────────
//! S{f, t} = f'''/f' − 3/2 (f''/f')²
//!
//! f' can cross zero when the boundary oscillation phases line up, so
//! every division goes through [`safe_derivative`]. The initial profile,
//! the equations of motion and the reconstruction all call the functions
//! in this module; none of them restates the formula.

use crate::grid::TimeGrid;
use crate::perturbation::FieldSample;

/// Clamp f' away from zero: values with |f'| < ε become ±ε with the sign
/// bit of f' kept (so +0.0 → +ε, −0.0 → −ε). |result| ≥ ε for all finite
/// input.
#[inline]
pub fn safe_derivative(f_prime: f64, epsilon: f64) -> f64 {
    if f_prime.abs() < epsilon {
        epsilon.copysign(f_prime)
    } else {
        f_prime
    }
}

/// Schwarzian derivative from f', f'', f''' with the guarded division.
#[inline]
pub fn schwarzian(f_prime: f64, f_double_prime: f64, f_triple_prime: f64, epsilon: f64) -> f64 {
    let fp = safe_derivative(f_prime, epsilon);
    let ratio = f_double_prime / fp;
    f_triple_prime / fp - 1.5 * ratio * ratio
}

/// Bulk form of [`schwarzian`] over aligned arrays.
pub fn schwarzian_profile(
    f_prime: &[f64],
    f_double_prime: &[f64],
    f_triple_prime: &[f64],
    epsilon: f64,
) -> Vec<f64> {
    f_prime
        .iter()
        .zip(f_double_prime)
        .zip(f_triple_prime)
        .map(|((&a, &b), &c)| schwarzian(a, b, c, epsilon))
        .collect()
}

/// Reparametrization f = t + φ and its Schwarzian before evolution.
#[derive(Debug, Clone, Default)]
pub struct InitialProfile {
    pub f: Vec<f64>,
    pub f_prime: Vec<f64>,
    pub f_double_prime: Vec<f64>,
    pub f_triple_prime: Vec<f64>,
    pub schwarzian: Vec<f64>,
}

impl InitialProfile {
    /// f = t + φ, f' = 1 + φ', f'' = φ'', f''' = φ'''.
    pub fn from_perturbation(grid: &TimeGrid, phi: &FieldSample, epsilon: f64) -> Self {
        let f = grid
            .as_slice()
            .iter()
            .zip(&phi.value)
            .map(|(t, p)| t + p)
            .collect();
        let f_prime: Vec<f64> = phi.first.iter().map(|p| 1.0 + p).collect();
        let f_double_prime = phi.second.clone();
        let f_triple_prime = phi.third.clone();
        let schwarzian = schwarzian_profile(&f_prime, &f_double_prime, &f_triple_prime, epsilon);
        Self {
            f,
            f_prime,
            f_double_prime,
            f_triple_prime,
            schwarzian,
        }
    }

    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }
}
