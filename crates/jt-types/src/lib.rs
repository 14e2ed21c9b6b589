// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, output series and error hierarchy for the JT
//! boundary kernel: Schwarzian evolution of near-AdS2 gravity under
//! thermal driving.

pub mod config;
pub mod error;
pub mod series;

pub use config::JtConfig;
pub use error::{JtError, JtResult};
pub use series::{SimulationSeries, SolverReport};
