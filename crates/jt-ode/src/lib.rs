// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Stiff ODE Integrator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Implicit integration for stiff initial-value problems.
//!
//! Architecture:
//!   - OdeSystem: right-hand side plus Jacobian (finite differences unless
//!     the system supplies an analytic one)
//!   - RadauIIA: three-stage, fifth-order collocation method with
//!     simplified Newton iterations and an embedded error estimate
//!   - CollocationPolynomial: continuous output over one accepted step,
//!     used to resample the trajectory onto caller-supplied times
//!   - Solution / SolverStats: component-major output buffers and counters

pub mod dense;
pub mod error;
pub mod radau;
pub mod solution;
pub mod system;

pub use dense::CollocationPolynomial;
pub use error::SolverError;
pub use radau::{RadauIIA, RadauSettings};
pub use solution::{Solution, SolverStats};
pub use system::OdeSystem;
