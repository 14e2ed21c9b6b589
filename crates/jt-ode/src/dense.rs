// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Continuous Output
// ─────────────────────────────────────────────────────────────────────
//! The Radau IIA stage values define a cubic through the step start and
//! the three collocation nodes. Evaluating that cubic gives the solution
//! anywhere inside the step at the method's dense-output order, without
//! extra RHS calls.

use nalgebra::DVector;

use crate::radau::NODES;

/// Collocation cubic over one accepted step `[t_old, t_old + h]`.
#[derive(Debug, Clone)]
pub struct CollocationPolynomial {
    t_old: f64,
    h: f64,
    y_old: DVector<f64>,
    /// Stage increments Z_k = Y_k − y_old, stacked (3·dim).
    z: DVector<f64>,
}

impl CollocationPolynomial {
    pub(crate) fn new(t_old: f64, h: f64, y_old: DVector<f64>, z: DVector<f64>) -> Self {
        Self { t_old, h, y_old, z }
    }

    pub fn t_old(&self) -> f64 {
        self.t_old
    }

    pub fn t_new(&self) -> f64 {
        self.t_old + self.h
    }

    pub fn dim(&self) -> usize {
        self.y_old.len()
    }

    /// Lagrange weights of the three stage nodes at normalised time x.
    /// The node at x = 0 carries Z = 0 and drops out.
    #[inline]
    fn weights(x: f64) -> [f64; 3] {
        let [c1, c2, c3] = NODES;
        [
            x * (x - c2) * (x - c3) / (c1 * (c1 - c2) * (c1 - c3)),
            x * (x - c1) * (x - c3) / (c2 * (c2 - c1) * (c2 - c3)),
            x * (x - c1) * (x - c2) / (c3 * (c3 - c1) * (c3 - c2)),
        ]
    }

    /// Evaluate at `t` into `out`. Valid inside the step; outside it is a
    /// polynomial extrapolation, which the integrator only uses to seed
    /// Newton iterations.
    pub fn eval_into(&self, t: f64, out: &mut [f64]) {
        let n = self.dim();
        let [w1, w2, w3] = Self::weights((t - self.t_old) / self.h);
        for (i, o) in out.iter_mut().enumerate().take(n) {
            *o = self.y_old[i] + w1 * self.z[i] + w2 * self.z[n + i] + w3 * self.z[2 * n + i];
        }
    }

    pub fn eval(&self, t: f64) -> DVector<f64> {
        let mut out = DVector::zeros(self.dim());
        self.eval_into(t, out.as_mut_slice());
        out
    }
}
