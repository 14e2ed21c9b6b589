// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Natural Cubic Spline Source
// ─────────────────────────────────────────────────────────────────────
//! Continuous source term from the sampled initial Schwarzian.
//!
//! Knot second derivatives M_i solve the tridiagonal system
//!
//!   h_{i−1} M_{i−1} + 2(h_{i−1} + h_i) M_i + h_i M_{i+1}
//!     = 6 [(y_{i+1} − y_i)/h_i − (y_i − y_{i−1})/h_{i−1}]
//!
//! with M_0 = M_{n−1} = 0 (natural ends), in O(n) by forward elimination
//! and back substitution.

use jt_types::{JtError, JtResult};

/// Immutable natural cubic interpolant.
///
/// Defined on `[x_0, x_{n−1}]`. Queries outside that interval evaluate
/// the nearest end segment's cubic; callers keep queries inside.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl NaturalCubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> JtResult<Self> {
        if x.len() != y.len() {
            return Err(JtError::Config(format!(
                "spline needs aligned samples, got {} knots and {} values",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(JtError::Config(format!(
                "spline needs at least 2 knots, got {}",
                x.len()
            )));
        }
        if !x.windows(2).all(|w| w[0] < w[1]) {
            return Err(JtError::Config(
                "spline knots must be strictly increasing".to_string(),
            ));
        }

        let n = x.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the interior unknowns M_1..M_{n-2}.
            let mut c_prime = vec![0.0; n];
            let mut d_prime = vec![0.0; n];
            for i in 1..n - 1 {
                let h_left = x[i] - x[i - 1];
                let h_right = x[i + 1] - x[i];
                let diag = 2.0 * (h_left + h_right);
                let rhs = 6.0 * ((y[i + 1] - y[i]) / h_right - (y[i] - y[i - 1]) / h_left);
                let (sub_c, sub_d) = if i > 1 {
                    (h_left * c_prime[i - 1], h_left * d_prime[i - 1])
                } else {
                    (0.0, 0.0)
                };
                let denom = diag - sub_c;
                c_prime[i] = h_right / denom;
                d_prime[i] = (rhs - sub_d) / denom;
            }
            for i in (1..n - 1).rev() {
                m[i] = d_prime[i] - c_prime[i] * m[i + 1];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.x
    }

    /// Knot second derivatives; zero at both ends.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.m
    }

    /// Index i of the segment `[x_i, x_{i+1}]` holding `t`.
    #[inline]
    fn locate(&self, t: f64) -> usize {
        let last_segment = self.x.len() - 2;
        self.x
            .partition_point(|&xi| xi <= t)
            .saturating_sub(1)
            .min(last_segment)
    }

    #[inline]
    fn segment_value(&self, i: usize, t: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// Evaluate at an arbitrary time.
    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        self.segment_value(self.locate(t), t)
    }

    /// Evaluate at non-decreasing times in one forward sweep. Gives the
    /// same value as [`eval`](Self::eval) at each point.
    pub fn eval_sorted(&self, ts: &[f64]) -> Vec<f64> {
        let last_segment = self.x.len() - 2;
        let mut i = ts.first().map_or(0, |&t| self.locate(t));
        ts.iter()
            .map(|&t| {
                while i < last_segment && self.x[i + 1] <= t {
                    i += 1;
                }
                self.segment_value(i, t)
            })
            .collect()
    }
}
