// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Schwarzian Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Boundary dynamics of JT gravity: closed-form initial fields, the
//! guarded Schwarzian, spline source, thermal driving, the coupled
//! equations of motion and reconstruction of the evolved profile.

pub mod eom;
pub mod grid;
pub mod perturbation;
pub mod pipeline;
pub mod reconstruct;
pub mod schwarzian;
pub mod spline;
pub mod temperature;

pub use eom::{integrate_equations_of_motion, BoundaryDynamics, OdeState, SourceTerm};
pub use grid::TimeGrid;
pub use perturbation::{derive_initial_fields, FieldSample, Harmonic, InitialFields};
pub use pipeline::{simulate, Simulation};
pub use reconstruct::EvolvedProfile;
pub use schwarzian::{safe_derivative, schwarzian, schwarzian_profile, InitialProfile};
pub use spline::NaturalCubicSpline;
pub use temperature::TemperatureModel;
