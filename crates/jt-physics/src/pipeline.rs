// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Simulation Pipeline
// ─────────────────────────────────────────────────────────────────────
//! One linear pass per run:
//!   1. Build the time grid
//!   2. Closed-form perturbation φ and dilaton χ with exact derivatives
//!   3. f = t + φ and its Schwarzian S₀
//!   4. Natural cubic spline through S₀
//!   5. Temperature modulation T(t)
//!   6. Stiff integration of (f, f', f'', φ, φ')
//!   7. Reconstruct f''' and S_evolved on the grid
//!   8. Assemble the output series
//!
//! A failure at any stage ends the run; no partial series is returned.

use jt_ode::SolverStats;
use jt_types::{JtConfig, JtResult, SimulationSeries, SolverReport};

use crate::eom::{integrate_equations_of_motion, BoundaryDynamics, OdeState, SourceTerm};
use crate::grid::TimeGrid;
use crate::perturbation::derive_initial_fields;
use crate::reconstruct::EvolvedProfile;
use crate::schwarzian::InitialProfile;
use crate::spline::NaturalCubicSpline;
use crate::temperature::TemperatureModel;

fn solver_report(s: &SolverStats) -> SolverReport {
    SolverReport {
        steps: s.steps,
        rejected_steps: s.rejected_steps,
        rhs_evals: s.rhs_evals,
        jacobian_evals: s.jacobian_evals,
        lu_decompositions: s.lu_decompositions,
    }
}

/// Validated run, ready to execute.
#[derive(Debug, Clone)]
pub struct Simulation {
    cfg: JtConfig,
}

impl Simulation {
    pub fn new(cfg: &JtConfig) -> JtResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg: cfg.clone() })
    }

    pub fn config(&self) -> &JtConfig {
        &self.cfg
    }

    pub fn run(&self) -> JtResult<SimulationSeries> {
        let cfg = &self.cfg;
        log::info!(
            "JT run: C={}, δ={}, t∈[{}, {}], N={}, δ_T={}, ω_T={}",
            cfg.coupling,
            cfg.delta,
            cfg.t_start,
            cfg.t_end,
            cfg.grid_size,
            cfg.delta_temp,
            cfg.omega_temp
        );

        let grid = TimeGrid::from_config(cfg)?;
        let fields = derive_initial_fields(&grid, cfg.delta);
        let initial = InitialProfile::from_perturbation(&grid, &fields.perturbation, cfg.epsilon);
        log::debug!("Initial profile built on {} grid points", grid.len());

        let spline = NaturalCubicSpline::new(grid.as_slice(), &initial.schwarzian)?;
        let temperature = TemperatureModel::from_config(cfg);
        let dynamics =
            BoundaryDynamics::new(SourceTerm::new(spline, temperature), cfg.coupling, cfg.epsilon);

        let y0 = OdeState::initial(&initial, &fields);
        let solution = integrate_equations_of_motion(&grid, &y0, &dynamics, cfg)?;
        let report = solver_report(&solution.stats);
        log::info!(
            "Integration finished: {} steps ({} rejected), {} RHS evals",
            report.steps,
            report.rejected_steps,
            report.rhs_evals
        );

        let evolved = EvolvedProfile::reconstruct(solution, grid.as_slice(), &dynamics)?;
        let f_difference = evolved.difference_from(&initial.f);

        let series = SimulationSeries {
            temperature: temperature.series(grid.as_slice()),
            phi_initial: fields.perturbation.value,
            phi_evolved: evolved.phi_from_f,
            s_initial: initial.schwarzian,
            s_evolved: evolved.schwarzian,
            f_initial: initial.f,
            f_evolved: evolved.f,
            f_prime_evolved: evolved.f_prime,
            f_double_prime_evolved: evolved.f_double_prime,
            f_triple_prime_evolved: evolved.f_triple_prime,
            dilaton_evolved: evolved.dilaton,
            dilaton_prime_evolved: evolved.dilaton_prime,
            f_difference,
            solver: report,
            t: grid.into_vec(),
        };

        if let Some(name) = series.first_non_finite() {
            log::warn!("Series '{name}' holds non-finite values");
        }
        log::debug!("max |(f − t) − φ| = {:.3e}", series.max_consistency_gap());
        Ok(series)
    }
}

/// Validate `cfg` and run the whole pipeline.
pub fn simulate(cfg: &JtConfig) -> JtResult<SimulationSeries> {
    Simulation::new(cfg)?.run()
}
