// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Closed-Form Perturbation Fields
// ─────────────────────────────────────────────────────────────────────
//! Exact derivatives of the initial perturbation and dilaton.
//!
//!   φ(t) = δ sin(ωt),   χ(t) = δ cos(ωt),   ω = 2π / (t_end − t_start)
//!
//! Each field is a [`Harmonic`]; differentiation maps a harmonic to
//! another harmonic, so φ', φ'', φ''' and χ' carry no truncation error.
//! Evaluation is one bulk pass over the grid per array.

use serde::{Deserialize, Serialize};

use crate::grid::TimeGrid;

/// Which trigonometric function a harmonic term uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrature {
    Sin,
    Cos,
}

/// `coeff · sin(omega·t)` or `coeff · cos(omega·t)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    pub coeff: f64,
    pub omega: f64,
    pub kind: Quadrature,
}

impl Harmonic {
    pub fn sine(coeff: f64, omega: f64) -> Self {
        Self { coeff, omega, kind: Quadrature::Sin }
    }

    pub fn cosine(coeff: f64, omega: f64) -> Self {
        Self { coeff, omega, kind: Quadrature::Cos }
    }

    /// d/dt (a sin ωt) = aω cos ωt,  d/dt (a cos ωt) = −aω sin ωt.
    pub fn derivative(&self) -> Self {
        match self.kind {
            Quadrature::Sin => Self::cosine(self.coeff * self.omega, self.omega),
            Quadrature::Cos => Self::sine(-self.coeff * self.omega, self.omega),
        }
    }

    pub fn nth_derivative(&self, order: usize) -> Self {
        (0..order).fold(*self, |h, _| h.derivative())
    }

    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        let phase = self.omega * t;
        match self.kind {
            Quadrature::Sin => self.coeff * phase.sin(),
            Quadrature::Cos => self.coeff * phase.cos(),
        }
    }

    pub fn evaluate(&self, t: &[f64]) -> Vec<f64> {
        t.iter().map(|&ti| self.at(ti)).collect()
    }
}

/// A scalar field and its first three derivatives on a grid.
#[derive(Debug, Clone, Default)]
pub struct FieldSample {
    pub value: Vec<f64>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    pub third: Vec<f64>,
}

impl FieldSample {
    pub fn from_harmonic(h: &Harmonic, t: &[f64]) -> Self {
        let d1 = h.derivative();
        let d2 = d1.derivative();
        let d3 = d2.derivative();
        Self {
            value: h.evaluate(t),
            first: d1.evaluate(t),
            second: d2.evaluate(t),
            third: d3.evaluate(t),
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// The six grid-aligned arrays seeding the pipeline.
#[derive(Debug, Clone, Default)]
pub struct InitialFields {
    /// φ, φ', φ'', φ'''.
    pub perturbation: FieldSample,
    /// χ.
    pub dilaton: Vec<f64>,
    /// χ'.
    pub dilaton_prime: Vec<f64>,
}

/// One full oscillation over the grid span.
#[inline]
pub fn base_frequency(grid: &TimeGrid) -> f64 {
    std::f64::consts::TAU / grid.span()
}

/// Build φ = δ sin(ωt) and χ = δ cos(ωt) with their exact derivatives.
pub fn derive_initial_fields(grid: &TimeGrid, delta: f64) -> InitialFields {
    let omega = base_frequency(grid);
    let t = grid.as_slice();
    let phi = Harmonic::sine(delta, omega);
    let chi = Harmonic::cosine(delta, omega);
    InitialFields {
        perturbation: FieldSample::from_harmonic(&phi, t),
        dilaton: chi.evaluate(t),
        dilaton_prime: chi.derivative().evaluate(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fourth_derivative_returns_to_start() {
        let h = Harmonic::sine(0.3, 2.0);
        let d4 = h.nth_derivative(4);
        assert_eq!(d4.kind, Quadrature::Sin);
        assert!((d4.coeff - 0.3 * 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = Harmonic::cosine(0.01, 2.0 * PI / 3.0);
        let d = h.derivative();
        let step = 1e-6;
        for &t in &[0.0, 0.4, 1.7, 2.9] {
            let fd = (h.at(t + step) - h.at(t - step)) / (2.0 * step);
            assert!((fd - d.at(t)).abs() < 1e-9, "t={t}: fd={fd} exact={}", d.at(t));
        }
    }

    #[test]
    fn test_initial_fields_shapes_and_values() {
        let grid = TimeGrid::new(0.0, 3.0, 301).unwrap();
        let fields = derive_initial_fields(&grid, 0.01);
        let omega = 2.0 * PI / 3.0;

        assert_eq!(fields.perturbation.len(), 301);
        assert_eq!(fields.dilaton.len(), 301);
        assert_eq!(fields.dilaton_prime.len(), 301);

        // t = 0: φ = 0, φ' = δω, φ'' = 0, φ''' = −δω³, χ = δ, χ' = 0
        let p = &fields.perturbation;
        assert_eq!(p.value[0], 0.0);
        assert!((p.first[0] - 0.01 * omega).abs() < 1e-15);
        assert_eq!(p.second[0], 0.0);
        assert!((p.third[0] + 0.01 * omega.powi(3)).abs() < 1e-15);
        assert_eq!(fields.dilaton[0], 0.01);
        assert_eq!(fields.dilaton_prime[0], 0.0);
    }

    #[test]
    fn test_one_period_over_span() {
        let grid = TimeGrid::new(1.0, 5.0, 11).unwrap();
        let omega = base_frequency(&grid);
        assert!((omega * grid.span() - 2.0 * PI).abs() < 1e-12);
    }
}
