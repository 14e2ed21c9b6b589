// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Trajectory Reconstruction
// ─────────────────────────────────────────────────────────────────────
//! Turns the sampled ODE trajectory into the evolved observables.
//!
//! f''' is not part of the state vector. It is recomputed from the
//! equation of motion at each grid time with the same source evaluation
//! the integrator saw, then fed to the Schwarzian evaluator.

use jt_ode::Solution;
use jt_types::{JtError, JtResult};

use crate::eom::{BoundaryDynamics, STATE_DIM};
use crate::schwarzian::schwarzian;

/// Evolved fields on the grid.
#[derive(Debug, Clone, Default)]
pub struct EvolvedProfile {
    pub f: Vec<f64>,
    pub f_prime: Vec<f64>,
    pub f_double_prime: Vec<f64>,
    pub f_triple_prime: Vec<f64>,
    pub dilaton: Vec<f64>,
    pub dilaton_prime: Vec<f64>,
    pub schwarzian: Vec<f64>,
    /// f − t.
    pub phi_from_f: Vec<f64>,
    /// Grid points where |f'| fell inside the guard band.
    pub guarded_samples: usize,
}

impl EvolvedProfile {
    /// Consume the trajectory and rebuild f''' and S on the grid `t`.
    pub fn reconstruct(
        solution: Solution,
        t: &[f64],
        dynamics: &BoundaryDynamics,
    ) -> JtResult<Self> {
        if solution.len() != t.len() {
            return Err(JtError::integration(format!(
                "trajectory has {} samples, grid has {}",
                solution.len(),
                t.len()
            )));
        }
        let columns: [Vec<f64>; STATE_DIM] = solution.y.try_into().map_err(|y: Vec<Vec<f64>>| {
            JtError::integration(format!(
                "trajectory has {} components, expected {STATE_DIM}",
                y.len()
            ))
        })?;
        let [f, f_prime, f_double_prime, dilaton, dilaton_prime] = columns;

        let source = dynamics.source().effective_sorted(t);
        let epsilon = dynamics.epsilon();

        let f_triple_prime: Vec<f64> = (0..t.len())
            .map(|i| {
                dynamics.third_derivative(source[i], f_prime[i], f_double_prime[i], dilaton_prime[i])
            })
            .collect();

        let schwarzian: Vec<f64> = (0..t.len())
            .map(|i| schwarzian(f_prime[i], f_double_prime[i], f_triple_prime[i], epsilon))
            .collect();

        let phi_from_f = f.iter().zip(t).map(|(fi, ti)| fi - ti).collect();

        let guarded_samples = f_prime.iter().filter(|v| v.abs() < epsilon).count();
        if guarded_samples > 0 {
            log::warn!(
                "f' entered the guard band |f'| < {epsilon:e} at {guarded_samples} grid points"
            );
        }

        Ok(Self {
            f,
            f_prime,
            f_double_prime,
            f_triple_prime,
            dilaton,
            dilaton_prime,
            schwarzian,
            phi_from_f,
            guarded_samples,
        })
    }

    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }

    /// f_evolved − f_initial, element-wise.
    pub fn difference_from(&self, f_initial: &[f64]) -> Vec<f64> {
        self.f.iter().zip(f_initial).map(|(a, b)| a - b).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eom::SourceTerm;
    use crate::spline::NaturalCubicSpline;
    use crate::temperature::TemperatureModel;
    use jt_ode::OdeSystem;

    fn dynamics() -> BoundaryDynamics {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.1, -0.2, 0.05, 0.3];
        BoundaryDynamics::new(
            SourceTerm::new(
                NaturalCubicSpline::new(&x, &y).unwrap(),
                TemperatureModel::new(0.01, 0.5),
            ),
            1.0,
            f64::EPSILON,
        )
    }

    fn fake_solution(t: &[f64], rows: &[[f64; STATE_DIM]]) -> Solution {
        Solution {
            t: t.to_vec(),
            y: (0..STATE_DIM).map(|k| rows.iter().map(|r| r[k]).collect()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_third_derivative_matches_rhs() {
        let dyn_ = dynamics();
        let t = [0.0, 1.5, 3.0];
        let rows = [
            [0.0, 1.0, 0.0, 0.01, 0.0],
            [1.4, 0.9, -0.1, 0.0, -0.02],
            [3.1, 1.2, 0.3, -0.01, 0.01],
        ];
        let profile = EvolvedProfile::reconstruct(fake_solution(&t, &rows), &t, &dyn_).unwrap();
        for (i, row) in rows.iter().enumerate() {
            let mut dydt = [0.0; STATE_DIM];
            dyn_.rhs(t[i], row, &mut dydt);
            assert_eq!(profile.f_triple_prime[i], dydt[2], "sample {i}");
        }
        assert!((profile.phi_from_f[1] + 0.1).abs() < 1e-15);
        assert_eq!(profile.guarded_samples, 0);
    }

    #[test]
    fn test_guard_band_is_counted_and_finite() {
        let dyn_ = dynamics();
        let t = [0.0, 1.0];
        let rows = [[0.0, 0.0, 0.2, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0, 0.0]];
        let profile = EvolvedProfile::reconstruct(fake_solution(&t, &rows), &t, &dyn_).unwrap();
        assert_eq!(profile.guarded_samples, 1);
        assert!(profile.schwarzian.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let dyn_ = dynamics();
        let rows = [[0.0, 1.0, 0.0, 0.0, 0.0]];
        let err = EvolvedProfile::reconstruct(fake_solution(&[0.0], &rows), &[0.0, 1.0], &dyn_);
        assert!(matches!(err, Err(JtError::Integration(_))));
    }

    #[test]
    fn test_difference_from_initial() {
        let profile = EvolvedProfile {
            f: vec![1.0, 2.5],
            ..Default::default()
        };
        assert_eq!(profile.difference_from(&[1.0, 2.0]), vec![0.0, 0.5]);
    }
}
