// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Integrator Errors
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Reasons a solve stops before reaching the end of its span.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid time span [{t0}, {t1}]")]
    InvalidSpan { t0: f64, t1: f64 },

    #[error("initial state has {got} components, system expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("output times must be non-decreasing and inside [{t0}, {t1}]")]
    EvalTimesOutOfSpan { t0: f64, t1: f64 },

    /// Step control drove h below the floating-point spacing at t.
    #[error("required step size {h:e} is less than spacing between numbers at t={t}")]
    StepSizeTooSmall { t: f64, h: f64 },

    #[error("Newton iteration matrix is singular at t={t}")]
    SingularMatrix { t: f64 },

    #[error("state became non-finite at t={t}")]
    NonFinite { t: f64 },
}
