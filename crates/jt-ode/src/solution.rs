// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Integrator Output
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Work counters for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    pub steps: u64,
    pub rejected_steps: u64,
    /// Right-hand-side calls made by the integrator itself. Calls made
    /// inside a finite-difference Jacobian are not included.
    pub rhs_evals: u64,
    pub jacobian_evals: u64,
    pub lu_decompositions: u64,
}

/// Trajectory sampled at the requested output times.
///
/// Stored component-major: `y[k]` is the whole history of component `k`,
/// one contiguous buffer aligned with `t`.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
    pub stats: SolverStats,
}

impl Solution {
    pub(crate) fn with_capacity(dim: usize, samples: usize) -> Self {
        Self {
            t: Vec::with_capacity(samples),
            y: (0..dim).map(|_| Vec::with_capacity(samples)).collect(),
            stats: SolverStats::default(),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: &[f64]) {
        self.t.push(t);
        for (column, &v) in self.y.iter_mut().zip(state) {
            column.push(v);
        }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.y.len()
    }

    /// Full state at output index `i`.
    pub fn state(&self, i: usize) -> Vec<f64> {
        self.y.iter().map(|column| column[i]).collect()
    }

    /// Final sampled state, if any sample was requested.
    pub fn last_state(&self) -> Option<Vec<f64>> {
        self.len().checked_sub(1).map(|i| self.state(i))
    }
}
