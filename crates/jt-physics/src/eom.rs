// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Equations of Motion
// ─────────────────────────────────────────────────────────────────────
//! Boundary reparametrization coupled to the dilaton:
//!
//!   f'''  = f'_s (S_eff(t) + 3/2 (f''/f'_s)²) + C φ'
//!   φ''   = −C f'
//!
//! with f'_s the guarded derivative and S_eff(t) = S₀(t)·T(t). Written as
//! a first-order system in y = (f, f', f'', φ, φ') and integrated with
//! Radau IIA at tight tolerances: near f' → 0 the (f'')²/f' term makes
//! the system stiff.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use jt_ode::{OdeSystem, RadauIIA, RadauSettings, Solution};
use jt_types::{JtConfig, JtError, JtResult};

use crate::grid::TimeGrid;
use crate::perturbation::InitialFields;
use crate::schwarzian::{safe_derivative, InitialProfile};
use crate::spline::NaturalCubicSpline;
use crate::temperature::TemperatureModel;

pub const STATE_DIM: usize = 5;

/// Instantaneous state (f, f', f'', φ, φ').
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdeState {
    pub f: f64,
    pub f_prime: f64,
    pub f_double_prime: f64,
    pub dilaton: f64,
    pub dilaton_prime: f64,
}

impl OdeState {
    /// Seed from the first grid sample of the initial fields.
    pub fn initial(profile: &InitialProfile, fields: &InitialFields) -> Self {
        Self {
            f: profile.f[0],
            f_prime: profile.f_prime[0],
            f_double_prime: profile.f_double_prime[0],
            dilaton: fields.dilaton[0],
            dilaton_prime: fields.dilaton_prime[0],
        }
    }

    pub fn to_array(&self) -> [f64; STATE_DIM] {
        [
            self.f,
            self.f_prime,
            self.f_double_prime,
            self.dilaton,
            self.dilaton_prime,
        ]
    }

    pub fn from_slice(y: &[f64]) -> Self {
        Self {
            f: y[0],
            f_prime: y[1],
            f_double_prime: y[2],
            dilaton: y[3],
            dilaton_prime: y[4],
        }
    }
}

/// Interpolated initial Schwarzian under thermal driving.
#[derive(Debug, Clone)]
pub struct SourceTerm {
    spline: NaturalCubicSpline,
    temperature: TemperatureModel,
}

impl SourceTerm {
    pub fn new(spline: NaturalCubicSpline, temperature: TemperatureModel) -> Self {
        Self { spline, temperature }
    }

    pub fn spline(&self) -> &NaturalCubicSpline {
        &self.spline
    }

    pub fn temperature(&self) -> &TemperatureModel {
        &self.temperature
    }

    /// S_eff(t) = S₀(t)·T(t).
    #[inline]
    pub fn effective(&self, t: f64) -> f64 {
        self.spline.eval(t) * self.temperature.at(t)
    }

    /// [`effective`](Self::effective) over sorted times.
    pub fn effective_sorted(&self, ts: &[f64]) -> Vec<f64> {
        self.spline
            .eval_sorted(ts)
            .into_iter()
            .zip(ts)
            .map(|(s, &t)| s * self.temperature.at(t))
            .collect()
    }
}

/// The five-dimensional boundary system.
#[derive(Debug, Clone)]
pub struct BoundaryDynamics {
    source: SourceTerm,
    coupling: f64,
    epsilon: f64,
}

impl BoundaryDynamics {
    pub fn new(source: SourceTerm, coupling: f64, epsilon: f64) -> Self {
        Self { source, coupling, epsilon }
    }

    pub fn source(&self) -> &SourceTerm {
        &self.source
    }

    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// f''' given the effective source at the same time. Shared by the
    /// right-hand side and the reconstruction.
    #[inline]
    pub fn third_derivative(
        &self,
        source: f64,
        f_prime: f64,
        f_double_prime: f64,
        dilaton_prime: f64,
    ) -> f64 {
        let fp = safe_derivative(f_prime, self.epsilon);
        let ratio = f_double_prime / fp;
        fp * (source + 1.5 * ratio * ratio) + self.coupling * dilaton_prime
    }
}

impl OdeSystem for BoundaryDynamics {
    fn dim(&self) -> usize {
        STATE_DIM
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        let s = self.source.effective(t);
        dydt[0] = y[1];
        dydt[1] = y[2];
        dydt[2] = self.third_derivative(s, y[1], y[2], y[4]);
        dydt[3] = y[4];
        dydt[4] = -self.coupling * y[1];
    }

    fn jacobian(&self, t: f64, y: &[f64], jac: &mut DMatrix<f64>) {
        let s = self.source.effective(t);
        let fp = safe_derivative(y[1], self.epsilon);
        let ratio = y[2] / fp;
        // Inside the guard band f'_s is constant, so ∂f'''/∂f' vanishes.
        let d_fp = if y[1].abs() < self.epsilon {
            0.0
        } else {
            s - 1.5 * ratio * ratio
        };

        jac.fill(0.0);
        jac[(0, 1)] = 1.0;
        jac[(1, 2)] = 1.0;
        jac[(2, 1)] = d_fp;
        jac[(2, 2)] = 3.0 * ratio;
        jac[(2, 4)] = self.coupling;
        jac[(3, 4)] = 1.0;
        jac[(4, 1)] = -self.coupling;
    }
}

/// Integrate over the full grid span and sample at every grid point.
///
/// Any solver failure is fatal and comes back as
/// [`JtError::Integration`] with the solver's diagnostic.
pub fn integrate_equations_of_motion(
    grid: &TimeGrid,
    initial: &OdeState,
    dynamics: &BoundaryDynamics,
    config: &JtConfig,
) -> JtResult<Solution> {
    let solver = RadauIIA::new(RadauSettings::with_tolerances(config.rtol, config.atol));
    let solution = solver
        .integrate(
            dynamics,
            (grid.start(), grid.end()),
            &initial.to_array(),
            grid.as_slice(),
        )
        .map_err(|e| {
            log::error!("Equation-of-motion solve aborted: {e}");
            JtError::integration(e)
        })?;

    if solution.len() != grid.len() {
        return Err(JtError::integration(format!(
            "trajectory has {} samples, grid has {}",
            solution.len(),
            grid.len()
        )));
    }
    Ok(solution)
}
