// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Output Series
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Integrator bookkeeping for one completed solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverReport {
    /// Accepted steps.
    pub steps: u64,
    /// Rejected steps (error test or Newton failure).
    pub rejected_steps: u64,
    /// Right-hand-side evaluations.
    pub rhs_evals: u64,
    /// Jacobian evaluations.
    pub jacobian_evals: u64,
    /// LU decompositions of the Newton and error matrices.
    pub lu_decompositions: u64,
}

/// Everything the presentation layer needs after a successful run.
///
/// Every vector is aligned with `t`. Consumers plot these directly and
/// perform no further numerical work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSeries {
    /// Time grid.
    pub t: Vec<f64>,
    /// Initial perturbation φ(t) = δ·sin(ωt).
    pub phi_initial: Vec<f64>,
    /// Evolved perturbation recovered from the trajectory as f(t) − t.
    pub phi_evolved: Vec<f64>,
    /// Initial Schwarzian profile.
    pub s_initial: Vec<f64>,
    /// Evolved Schwarzian profile.
    pub s_evolved: Vec<f64>,
    /// Temperature modulation T(t).
    pub temperature: Vec<f64>,
    /// Initial reparametrization f(t) = t + φ(t).
    pub f_initial: Vec<f64>,
    pub f_evolved: Vec<f64>,
    pub f_prime_evolved: Vec<f64>,
    pub f_double_prime_evolved: Vec<f64>,
    pub f_triple_prime_evolved: Vec<f64>,
    /// Directly integrated dilaton.
    pub dilaton_evolved: Vec<f64>,
    pub dilaton_prime_evolved: Vec<f64>,
    /// f_evolved − f_initial.
    pub f_difference: Vec<f64>,
    pub solver: SolverReport,
}

impl SimulationSeries {
    /// Number of grid samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Every array paired with the name the plotting side keys on.
    pub fn named(&self) -> [(&'static str, &[f64]); 14] {
        [
            ("t", self.t.as_slice()),
            ("phi_initial", self.phi_initial.as_slice()),
            ("phi_evolved", self.phi_evolved.as_slice()),
            ("s_initial", self.s_initial.as_slice()),
            ("s_evolved", self.s_evolved.as_slice()),
            ("temperature", self.temperature.as_slice()),
            ("f_initial", self.f_initial.as_slice()),
            ("f_evolved", self.f_evolved.as_slice()),
            ("f_prime_evolved", self.f_prime_evolved.as_slice()),
            ("f_double_prime_evolved", self.f_double_prime_evolved.as_slice()),
            ("f_triple_prime_evolved", self.f_triple_prime_evolved.as_slice()),
            ("dilaton_evolved", self.dilaton_evolved.as_slice()),
            ("dilaton_prime_evolved", self.dilaton_prime_evolved.as_slice()),
            ("f_difference", self.f_difference.as_slice()),
        ]
    }

    /// Largest |(f − t) − φ| over the grid.
    ///
    /// Left as an observable: the pipeline never acts on it.
    pub fn max_consistency_gap(&self) -> f64 {
        self.phi_evolved
            .iter()
            .zip(&self.dilaton_evolved)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Name of the first series holding a NaN or infinity, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.named()
            .into_iter()
            .find(|(_, values)| values.iter().any(|v| !v.is_finite()))
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> SimulationSeries {
        SimulationSeries {
            t: vec![0.0, 1.0],
            phi_evolved: vec![0.0, 0.5],
            dilaton_evolved: vec![0.1, 0.1],
            ..Default::default()
        }
    }

    #[test]
    fn test_consistency_gap() {
        let s = tiny();
        assert!((s.max_consistency_gap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_first_non_finite() {
        let mut s = tiny();
        assert_eq!(s.first_non_finite(), None);
        s.dilaton_evolved[1] = f64::NAN;
        assert_eq!(s.first_non_finite(), Some("dilaton_evolved"));
    }

    #[test]
    fn test_named_is_exhaustive() {
        let names: Vec<_> = tiny().named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&"s_evolved"));
        assert!(names.contains(&"f_difference"));
    }

    #[test]
    fn test_json_round_trip_keeps_report() {
        let mut s = tiny();
        s.solver.steps = 179;
        let json = serde_json::to_string(&s).unwrap();
        let back: SimulationSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back.solver.steps, 179);
        assert_eq!(back.len(), 2);
    }
}
