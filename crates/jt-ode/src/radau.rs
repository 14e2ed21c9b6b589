// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Radau IIA Integrator
// ─────────────────────────────────────────────────────────────────────
//! Three-stage Radau IIA (order 5, L-stable) for stiff systems:
//!
//!   Z = h (A ⊗ I) F(t + c h, y + Z),   y_new = y + Z_3
//!
//! The nonlinear stage system is solved by simplified Newton iterations
//! on the full 3n × 3n matrix I − h (A ⊗ J). The local error estimate
//! solves (μ/h · I − J) e = f(t, y) + (Σ E_k Z_k) / h, with μ the real
//! eigenvalue of A⁻¹. Step size follows the predictive (Gustafsson)
//! controller; a step is rejected when the scaled RMS error exceeds 1.

use std::cell::Cell;

use nalgebra::{DMatrix, DVector, LU, Dyn};
use serde::{Deserialize, Serialize};

use crate::dense::CollocationPolynomial;
use crate::error::SolverError;
use crate::solution::{Solution, SolverStats};
use crate::system::OdeSystem;

const S6: f64 = 2.449_489_742_783_178; // √6

/// Collocation nodes c_1, c_2, c_3.
pub(crate) const NODES: [f64; 3] = [(4.0 - S6) / 10.0, (4.0 + S6) / 10.0, 1.0];

/// Butcher matrix A of Radau IIA, row-major.
const A: [[f64; 3]; 3] = [
    [
        (88.0 - 7.0 * S6) / 360.0,
        (296.0 - 169.0 * S6) / 1800.0,
        (-2.0 + 3.0 * S6) / 225.0,
    ],
    [
        (296.0 + 169.0 * S6) / 1800.0,
        (88.0 + 7.0 * S6) / 360.0,
        (-2.0 - 3.0 * S6) / 225.0,
    ],
    [(16.0 - S6) / 36.0, (16.0 + S6) / 36.0, 1.0 / 9.0],
];

/// Error-estimate weights on the stage increments.
const E: [f64; 3] = [(-13.0 - 7.0 * S6) / 3.0, (-13.0 + 7.0 * S6) / 3.0, -1.0 / 3.0];

/// μ = 3 + 3^(2/3) − 3^(1/3), real eigenvalue of A⁻¹.
const MU_REAL: f64 = 3.637_834_252_744_496;

const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Tolerances and iteration limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadauSettings {
    pub rtol: f64,
    pub atol: f64,
    /// Initial step; chosen automatically when `None`.
    pub first_step: Option<f64>,
    pub max_newton_iter: usize,
}

impl Default for RadauSettings {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-8,
            first_step: None,
            max_newton_iter: 6,
        }
    }
}

impl RadauSettings {
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }
}

/// RHS/Jacobian wrapper that keeps the work counters.
struct Counted<'a, S: ?Sized> {
    system: &'a S,
    n: usize,
    rhs_evals: Cell<u64>,
    jacobian_evals: Cell<u64>,
}

impl<'a, S: OdeSystem + ?Sized> Counted<'a, S> {
    fn new(system: &'a S) -> Self {
        Self {
            system,
            n: system.dim(),
            rhs_evals: Cell::new(0),
            jacobian_evals: Cell::new(0),
        }
    }

    fn rhs(&self, t: f64, y: &DVector<f64>) -> DVector<f64> {
        self.rhs_evals.set(self.rhs_evals.get() + 1);
        let mut out = DVector::zeros(self.n);
        self.system.rhs(t, y.as_slice(), out.as_mut_slice());
        out
    }

    fn jacobian(&self, t: f64, y: &DVector<f64>) -> DMatrix<f64> {
        self.jacobian_evals.set(self.jacobian_evals.get() + 1);
        let mut jac = DMatrix::zeros(self.n, self.n);
        self.system.jacobian(t, y.as_slice(), &mut jac);
        jac
    }
}

/// Factorised Newton matrix and error-estimate matrix for one step size.
struct Factors {
    h: f64,
    newton: LU<f64, Dyn, Dyn>,
    error: LU<f64, Dyn, Dyn>,
}

impl Factors {
    fn new(jac: &DMatrix<f64>, h: f64, t: f64) -> Result<Self, SolverError> {
        let n = jac.nrows();
        let a = DMatrix::from_fn(3, 3, |i, j| A[i][j]);
        let newton = DMatrix::identity(3 * n, 3 * n) - a.kronecker(jac) * h;
        let error = DMatrix::identity(n, n) * (MU_REAL / h) - jac;

        let newton = newton.lu();
        let error = error.lu();
        if !newton.is_invertible() || !error.is_invertible() {
            return Err(SolverError::SingularMatrix { t });
        }
        Ok(Self { h, newton, error })
    }
}

struct NewtonOutcome {
    converged: bool,
    z: DVector<f64>,
    iterations: usize,
    rate: Option<f64>,
}

/// Scaled RMS norm; `scale` has one entry per state component and is
/// cycled for stacked stage vectors.
fn rms_norm(v: &DVector<f64>, scale: &DVector<f64>) -> f64 {
    let n = scale.len();
    let sum: f64 = v
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let r = x / scale[i % n];
            r * r
        })
        .sum();
    (sum / v.len() as f64).sqrt()
}

fn predict_factor(h: f64, h_old: Option<f64>, err: f64, err_old: Option<f64>) -> f64 {
    let multiplier = match (h_old, err_old) {
        (Some(h_old), Some(err_old)) if err > 0.0 => h / h_old * (err_old / err).powf(0.25),
        _ => 1.0,
    };
    if err == 0.0 {
        return f64::INFINITY;
    }
    multiplier.min(1.0) * err.powf(-0.25)
}

/// Radau IIA integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadauIIA {
    pub settings: RadauSettings,
}

impl RadauIIA {
    pub fn new(settings: RadauSettings) -> Self {
        Self { settings }
    }

    fn newton_tolerance(&self) -> f64 {
        (10.0 * f64::EPSILON / self.settings.rtol).max(self.settings.rtol.sqrt().min(0.03))
    }

    fn scale_of(&self, y: &DVector<f64>) -> DVector<f64> {
        y.map(|v| self.settings.atol + v.abs() * self.settings.rtol)
    }

    /// Hairer–Wanner starting step for a method of order 5.
    fn initial_step<S: OdeSystem + ?Sized>(
        &self,
        ev: &Counted<'_, S>,
        t0: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
        span: f64,
    ) -> f64 {
        let scale = self.scale_of(y0);
        let d0 = rms_norm(y0, &scale);
        let d1 = rms_norm(f0, &scale);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 }.min(span);

        let y1 = y0 + f0 * h0;
        let f1 = ev.rhs(t0 + h0, &y1);
        let d2 = rms_norm(&(f1 - f0), &scale) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 6.0)
        };
        (100.0 * h0).min(h1).min(span)
    }

    /// Simplified Newton on the stacked stage increments.
    #[allow(clippy::too_many_arguments)]
    fn solve_collocation<S: OdeSystem + ?Sized>(
        &self,
        ev: &Counted<'_, S>,
        t: f64,
        y: &DVector<f64>,
        h: f64,
        mut z: DVector<f64>,
        scale: &DVector<f64>,
        factors: &Factors,
    ) -> NewtonOutcome {
        let n = y.len();
        let max_iter = self.settings.max_newton_iter;
        let tol = self.newton_tolerance();
        let mut residual = DVector::zeros(3 * n);
        let mut stage_f: [DVector<f64>; 3] = std::array::from_fn(|_| DVector::zeros(n));
        let mut norm_old: Option<f64> = None;
        let mut rate: Option<f64> = None;

        for k in 0..max_iter {
            for (s, fs) in stage_f.iter_mut().enumerate() {
                let ys = y + z.rows(s * n, n);
                *fs = ev.rhs(t + NODES[s] * h, &ys);
            }
            if stage_f.iter().any(|fs| fs.iter().any(|v| !v.is_finite())) {
                return NewtonOutcome { converged: false, z, iterations: k + 1, rate };
            }

            // residual = −(Z − h (A ⊗ I) F)
            for s in 0..3 {
                for i in 0..n {
                    let coupled: f64 = (0..3).map(|m| A[s][m] * stage_f[m][i]).sum();
                    residual[s * n + i] = h * coupled - z[s * n + i];
                }
            }
            let Some(dz) = factors.newton.solve(&residual) else {
                return NewtonOutcome { converged: false, z, iterations: k + 1, rate };
            };

            let dz_norm = rms_norm(&dz, scale);
            if let Some(old) = norm_old {
                rate = Some(dz_norm / old);
            }
            if let Some(r) = rate {
                let remaining = (max_iter - k) as i32;
                if r >= 1.0 || r.powi(remaining) / (1.0 - r) * dz_norm > tol {
                    return NewtonOutcome { converged: false, z, iterations: k + 1, rate };
                }
            }

            z += &dz;

            let done = dz_norm == 0.0 || rate.is_some_and(|r| r / (1.0 - r) * dz_norm < tol);
            if done {
                return NewtonOutcome { converged: true, z, iterations: k + 1, rate };
            }
            norm_old = Some(dz_norm);
        }
        NewtonOutcome { converged: false, z, iterations: max_iter, rate }
    }

    /// Integrate from `t_span.0` to `t_span.1`, sampling the continuous
    /// solution at every time in `t_eval` (non-decreasing, inside the span).
    ///
    /// Samples equal to the start time return `y0` bit-for-bit; samples
    /// equal to the end time return the final accepted state.
    pub fn integrate<S: OdeSystem + ?Sized>(
        &self,
        system: &S,
        t_span: (f64, f64),
        y0: &[f64],
        t_eval: &[f64],
    ) -> Result<Solution, SolverError> {
        let (t0, t1) = t_span;
        if !(t0.is_finite() && t1.is_finite()) || t1 <= t0 {
            return Err(SolverError::InvalidSpan { t0, t1 });
        }
        let n = system.dim();
        if y0.len() != n {
            return Err(SolverError::DimensionMismatch { expected: n, got: y0.len() });
        }
        let ordered = t_eval.windows(2).all(|w| w[0] <= w[1]);
        let inside = t_eval.first().map_or(true, |&a| a >= t0)
            && t_eval.last().map_or(true, |&b| b <= t1);
        if !ordered || !inside {
            return Err(SolverError::EvalTimesOutOfSpan { t0, t1 });
        }

        let ev = Counted::new(system);
        let mut stats = SolverStats::default();
        let mut out = Solution::with_capacity(n, t_eval.len());
        let mut scratch = vec![0.0; n];

        let mut t = t0;
        let mut y = DVector::from_column_slice(y0);
        if y.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFinite { t });
        }
        let mut f = ev.rhs(t, &y);

        let mut next = 0;
        while next < t_eval.len() && t_eval[next] <= t0 {
            out.push(t_eval[next], y0);
            next += 1;
        }

        let span = t1 - t0;
        let mut h_abs = match self.settings.first_step {
            Some(h) => h.min(span),
            None => self.initial_step(&ev, t, &y, &f, span),
        };

        let mut jac = ev.jacobian(t, &y);
        let mut jac_current = true;
        let mut factors: Option<Factors> = None;
        let mut h_abs_old: Option<f64> = None;
        let mut err_old: Option<f64> = None;
        let mut previous: Option<CollocationPolynomial> = None;
        let max_iter = self.settings.max_newton_iter as f64;

        while t < t1 {
            let min_step = 10.0 * f64::EPSILON * t.abs().max(f64::MIN_POSITIVE);
            let mut rejected = false;

            let (t_new, h, y_new, z, err_norm, newton) = loop {
                if h_abs < min_step {
                    return Err(SolverError::StepSizeTooSmall { t, h: h_abs });
                }
                let t_new = if h_abs >= t1 - t { t1 } else { t + h_abs };
                let h = t_new - t;

                let lu = match factors.take() {
                    Some(lu) if lu.h == h => lu,
                    _ => {
                        stats.lu_decompositions += 2;
                        Factors::new(&jac, h, t)?
                    }
                };

                let z0 = match &previous {
                    Some(p) => {
                        let mut z0 = DVector::zeros(3 * n);
                        for (s, c) in NODES.iter().enumerate() {
                            p.eval_into(t + c * h, &mut scratch);
                            for i in 0..n {
                                z0[s * n + i] = scratch[i] - y[i];
                            }
                        }
                        z0
                    }
                    None => DVector::zeros(3 * n),
                };

                let scale = self.scale_of(&y);
                let newton = self.solve_collocation(&ev, t, &y, h, z0, &scale, &lu);
                if !newton.converged {
                    if jac_current {
                        log::trace!("Newton failed at t={t:.6e}, halving h={h:.3e}");
                        h_abs *= 0.5;
                        stats.rejected_steps += 1;
                    } else {
                        jac = ev.jacobian(t, &y);
                        jac_current = true;
                    }
                    continue;
                }

                let z = newton.z;
                let y_new = &y + z.rows(2 * n, n);
                let mut ze = DVector::zeros(n);
                for (s, e) in E.iter().enumerate() {
                    ze += z.rows(s * n, n) * (e / h);
                }

                let Some(mut err) = lu.error.solve(&(&f + &ze)) else {
                    return Err(SolverError::SingularMatrix { t });
                };
                let scale = y.zip_map(&y_new, |a, b| {
                    self.settings.atol + a.abs().max(b.abs()) * self.settings.rtol
                });
                let mut err_norm = rms_norm(&err, &scale);

                if rejected && err_norm > 1.0 {
                    let probe = ev.rhs(t, &(&y + &err));
                    if let Some(e) = lu.error.solve(&(probe + &ze)) {
                        err = e;
                        err_norm = rms_norm(&err, &scale);
                    }
                }

                let safety = 0.9 * (2.0 * max_iter + 1.0) / (2.0 * max_iter + newton.iterations as f64);
                if err_norm > 1.0 || !err_norm.is_finite() {
                    let factor = if err_norm.is_finite() {
                        predict_factor(h, h_abs_old, err_norm, err_old)
                    } else {
                        MIN_FACTOR
                    };
                    log::trace!("step rejected at t={t:.6e}: err={err_norm:.3e}, h={h:.3e}");
                    h_abs = h * (safety * factor).max(MIN_FACTOR);
                    rejected = true;
                    stats.rejected_steps += 1;
                    continue;
                }

                factors = Some(lu);
                break (
                    t_new,
                    h,
                    y_new,
                    z,
                    err_norm,
                    (newton.iterations, newton.rate, safety),
                );
            };

            if y_new.iter().any(|v| !v.is_finite()) {
                return Err(SolverError::NonFinite { t: t_new });
            }

            let (iterations, rate, safety) = newton;
            let recompute_jac = iterations > 2 && rate.is_some_and(|r| r > 1e-3);
            let mut factor = (safety * predict_factor(h, h_abs_old, err_norm, err_old)).min(MAX_FACTOR);
            if !recompute_jac && factor < 1.2 {
                factor = 1.0;
            } else {
                factors = None;
            }

            let poly = CollocationPolynomial::new(t, h, y.clone(), z);
            while next < t_eval.len() && t_eval[next] <= t_new {
                let te = t_eval[next];
                if te < t_new {
                    poly.eval_into(te, &mut scratch);
                    out.push(te, &scratch);
                } else {
                    out.push(te, y_new.as_slice());
                }
                next += 1;
            }

            t = t_new;
            y = y_new;
            f = ev.rhs(t, &y);
            if recompute_jac {
                jac = ev.jacobian(t, &y);
                jac_current = true;
            } else {
                jac_current = false;
            }

            h_abs_old = Some(h);
            err_old = Some(err_norm);
            h_abs = h * factor;
            previous = Some(poly);
            stats.steps += 1;
        }

        stats.rhs_evals = ev.rhs_evals.get();
        stats.jacobian_evals = ev.jacobian_evals.get();
        log::debug!(
            "Radau IIA reached t={t1}: {} steps, {} rejected, {} rhs, {} jac, {} LU",
            stats.steps,
            stats.rejected_steps,
            stats.rhs_evals,
            stats.jacobian_evals,
            stats.lu_decompositions
        );
        out.stats = stats;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay(f64);

    impl OdeSystem for Decay {
        fn dim(&self) -> usize {
            1
        }
        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
            dydt[0] = -self.0 * y[0];
        }
    }

    struct Oscillator;

    impl OdeSystem for Oscillator {
        fn dim(&self) -> usize {
            2
        }
        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
            dydt[0] = y[1];
            dydt[1] = -y[0];
        }
        fn jacobian(&self, _t: f64, _y: &[f64], jac: &mut DMatrix<f64>) {
            jac.fill(0.0);
            jac[(0, 1)] = 1.0;
            jac[(1, 0)] = -1.0;
        }
    }

    fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| if i + 1 == n { b } else { a + (b - a) * i as f64 / (n - 1) as f64 })
            .collect()
    }

    #[test]
    fn test_tableau_row_sums_equal_nodes() {
        for (row, c) in A.iter().zip(NODES) {
            let sum: f64 = row.iter().sum();
            assert!((sum - c).abs() < 1e-14, "row sum {sum} != c {c}");
        }
    }

    #[test]
    fn test_mu_real_is_eigenvalue_of_inverse() {
        let a = DMatrix::from_fn(3, 3, |i, j| A[i][j]);
        let shifted = DMatrix::identity(3, 3) - a * MU_REAL;
        assert!(shifted.determinant().abs() < 1e-12, "det={}", shifted.determinant());
    }

    #[test]
    fn test_exponential_decay() {
        let times = linspace(0.0, 2.0, 21);
        let sol = RadauIIA::default()
            .integrate(&Decay(1.0), (0.0, 2.0), &[1.0], &times)
            .unwrap();
        assert_eq!(sol.len(), 21);
        for (t, y) in sol.t.iter().zip(&sol.y[0]) {
            let exact = (-t).exp();
            assert!((y - exact).abs() < 1e-7, "t={t}: {y} vs {exact}");
        }
    }

    #[test]
    fn test_start_sample_is_exact_copy() {
        let y0 = 0.123_456_789_012_345_67;
        let sol = RadauIIA::default()
            .integrate(&Decay(3.0), (0.0, 1.0), &[y0], &[0.0, 0.5, 1.0])
            .unwrap();
        assert_eq!(sol.y[0][0], y0);
    }

    #[test]
    fn test_harmonic_oscillator_full_period() {
        let tau = std::f64::consts::TAU;
        let times = linspace(0.0, tau, 101);
        let sol = RadauIIA::default()
            .integrate(&Oscillator, (0.0, tau), &[1.0, 0.0], &times)
            .unwrap();
        for (i, &t) in sol.t.iter().enumerate() {
            assert!((sol.y[0][i] - t.cos()).abs() < 1e-6, "cos at t={t}: {}", sol.y[0][i]);
            assert!((sol.y[1][i] + t.sin()).abs() < 1e-6, "sin at t={t}: {}", sol.y[1][i]);
        }
        let last = sol.last_state().unwrap();
        assert!((last[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stiff_decay_takes_few_steps() {
        // λ = 1e6 would force an explicit method into ~1e6 steps.
        let sol = RadauIIA::default()
            .integrate(&Decay(1e6), (0.0, 1.0), &[1.0], &[1.0])
            .unwrap();
        assert!(sol.y[0][0].abs() < 1e-8, "y(1)={}", sol.y[0][0]);
        assert!(sol.stats.steps < 500, "took {} steps", sol.stats.steps);
    }

    #[test]
    fn test_invalid_span_rejected() {
        let err = RadauIIA::default()
            .integrate(&Decay(1.0), (1.0, 1.0), &[1.0], &[])
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidSpan { .. }));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = RadauIIA::default()
            .integrate(&Oscillator, (0.0, 1.0), &[1.0], &[])
            .unwrap_err();
        assert_eq!(err, SolverError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn test_eval_times_outside_span_rejected() {
        let err = RadauIIA::default()
            .integrate(&Decay(1.0), (0.0, 1.0), &[1.0], &[0.0, 1.5])
            .unwrap_err();
        assert!(matches!(err, SolverError::EvalTimesOutOfSpan { .. }));
    }

    #[test]
    fn test_predict_factor_first_step() {
        let f = predict_factor(0.1, None, 16.0, None);
        assert!((f - 0.5).abs() < 1e-12, "factor={f}");
        assert!(predict_factor(0.1, None, 0.0, None).is_infinite());
    }
}
