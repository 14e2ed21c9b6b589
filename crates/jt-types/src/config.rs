// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Simulation Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{JtError, JtResult};

/// Parameters for one run of the Schwarzian evolution pipeline.
///
/// Set once, validated, then passed by reference through every stage.
/// Nothing in the pipeline mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JtConfig {
    /// Coupling C between reparametrization and dilaton.
    /// Default: 1.0.
    pub coupling: f64,

    /// Amplitude δ of the initial perturbation and dilaton profile.
    /// Default: 0.01.
    pub delta: f64,

    /// Start of the simulated interval.
    /// Default: 0.0.
    pub t_start: f64,

    /// End of the simulated interval. Must exceed `t_start`.
    /// Default: 3.0.
    pub t_end: f64,

    /// Number of samples N on the time grid, endpoints included.
    /// Default: 1_000_000.
    pub grid_size: usize,

    /// Lower bound on |f'| used by the safe-division guard.
    /// Default: machine epsilon for f64.
    pub epsilon: f64,

    /// Amplitude δ_T of the temperature modulation.
    /// Default: 0.01.
    pub delta_temp: f64,

    /// Angular frequency ω_T of the temperature modulation.
    /// Default: 0.5.
    pub omega_temp: f64,

    /// Relative tolerance of the stiff integrator.
    /// Default: 1e-8.
    pub rtol: f64,

    /// Absolute tolerance of the stiff integrator.
    /// Default: 1e-8.
    pub atol: f64,
}

impl Default for JtConfig {
    fn default() -> Self {
        Self {
            coupling: 1.0,
            delta: 0.01,
            t_start: 0.0,
            t_end: 3.0,
            grid_size: 1_000_000,
            epsilon: f64::EPSILON,
            delta_temp: 0.01,
            omega_temp: 0.5,
            rtol: 1e-8,
            atol: 1e-8,
        }
    }
}

impl JtConfig {
    /// Defaults with a smaller grid; everything else unchanged.
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Length of the simulated interval.
    #[inline]
    pub fn span(&self) -> f64 {
        self.t_end - self.t_start
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> JtResult<()> {
        let finite = [
            ("coupling", self.coupling),
            ("delta", self.delta),
            ("t_start", self.t_start),
            ("t_end", self.t_end),
            ("epsilon", self.epsilon),
            ("delta_temp", self.delta_temp),
            ("omega_temp", self.omega_temp),
            ("rtol", self.rtol),
            ("atol", self.atol),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(JtError::Config(format!("{name} must be finite, got {value}")));
            }
        }
        if self.t_end <= self.t_start {
            return Err(JtError::Config(format!(
                "t_end must be greater than t_start, got [{}, {}]",
                self.t_start, self.t_end
            )));
        }
        if self.grid_size < 2 {
            return Err(JtError::Config(format!(
                "grid_size must be >= 2, got {}",
                self.grid_size
            )));
        }
        if self.epsilon <= 0.0 {
            return Err(JtError::Config(format!(
                "epsilon must be > 0, got {}",
                self.epsilon
            )));
        }
        if self.rtol <= 0.0 || self.atol <= 0.0 {
            return Err(JtError::Config(format!(
                "tolerances must be > 0, got rtol={} atol={}",
                self.rtol, self.atol
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> JtResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| JtError::Config(format!("JSON parse error: {e}")))
    }
}
