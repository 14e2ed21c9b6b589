// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all pipeline failures.
///
/// Only two categories exist: bad parameters, caught before any array
/// is allocated, and a solver that could not reach `t_end`. Neither is
/// recoverable within a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JtError {
    /// Invalid time bounds, grid size, epsilon or tolerances.
    #[error("config error: {0}")]
    Config(String),

    /// The stiff integrator failed to produce a complete trajectory.
    #[error("integration failed: {0}")]
    Integration(String),
}

impl JtError {
    /// Wrap a solver diagnostic in the standard integration-failure message.
    pub fn integration(diagnostic: impl std::fmt::Display) -> Self {
        JtError::Integration(format!(
            "Solver failed: {diagnostic}. Consider adjusting solver parameters \
             or reviewing initial conditions."
        ))
    }
}

pub type JtResult<T> = Result<T, JtError>;
