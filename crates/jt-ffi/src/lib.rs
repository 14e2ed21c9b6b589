// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the JT boundary kernel.
//!
//! Exposes `JtConfig`, `simulate` and the guarded `schwarzian` helper.
//! The returned series dict is what the plotting side consumes; it does
//! no further numerical work.
//!
//! - Config is validated before storage (`JtConfig::validate()`).
//! - Config errors raise `ValueError`, solver failures raise `RuntimeError`.
//! - The GIL is released for the duration of the solve.
//!
//! Install: `pip install -e crates/jt-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from jt_boundary import JtConfig, simulate
//!
//! out = simulate(JtConfig(grid_size=10_000, coupling=1.0))
//! print(out["s_evolved"][:5], out["solver"]["steps"])
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use jt_types::{JtConfig, JtError};

fn to_py_err(e: JtError) -> PyErr {
    match e {
        JtError::Config(_) => PyValueError::new_err(e.to_string()),
        JtError::Integration(msg) => PyRuntimeError::new_err(msg),
    }
}

// ─── PyJtConfig ─────────────────────────────────────────────────────

/// Python-visible simulation parameters.
#[pyclass(name = "JtConfig")]
#[derive(Clone)]
struct PyJtConfig {
    inner: JtConfig,
}

#[pymethods]
impl PyJtConfig {
    #[new]
    #[pyo3(signature = (
        coupling = 1.0,
        delta = 0.01,
        t_start = 0.0,
        t_end = 3.0,
        grid_size = 1_000_000,
        epsilon = f64::EPSILON,
        delta_temp = 0.01,
        omega_temp = 0.5,
        rtol = 1e-8,
        atol = 1e-8,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        coupling: f64,
        delta: f64,
        t_start: f64,
        t_end: f64,
        grid_size: usize,
        epsilon: f64,
        delta_temp: f64,
        omega_temp: f64,
        rtol: f64,
        atol: f64,
    ) -> PyResult<Self> {
        let config = JtConfig {
            coupling,
            delta,
            t_start,
            t_end,
            grid_size,
            epsilon,
            delta_temp,
            omega_temp,
            rtol,
            atol,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string; missing keys take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = JtConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn coupling(&self) -> f64 {
        self.inner.coupling
    }

    #[getter]
    fn delta(&self) -> f64 {
        self.inner.delta
    }

    #[getter]
    fn t_start(&self) -> f64 {
        self.inner.t_start
    }

    #[getter]
    fn t_end(&self) -> f64 {
        self.inner.t_end
    }

    #[getter]
    fn grid_size(&self) -> usize {
        self.inner.grid_size
    }

    #[getter]
    fn epsilon(&self) -> f64 {
        self.inner.epsilon
    }

    #[getter]
    fn delta_temp(&self) -> f64 {
        self.inner.delta_temp
    }

    #[getter]
    fn omega_temp(&self) -> f64 {
        self.inner.omega_temp
    }

    fn __repr__(&self) -> String {
        format!(
            "JtConfig(coupling={}, delta={}, t=[{}, {}], grid_size={})",
            self.inner.coupling,
            self.inner.delta,
            self.inner.t_start,
            self.inner.t_end,
            self.inner.grid_size
        )
    }
}

// ─── simulate ───────────────────────────────────────────────────────

/// Run the full pipeline. Returns a dict of float lists keyed by series
/// name plus a `solver` dict of integrator counters.
#[pyfunction]
fn simulate(py: Python<'_>, config: &PyJtConfig) -> PyResult<PyObject> {
    let cfg = config.inner.clone();
    let series = py
        .allow_threads(move || jt_physics::simulate(&cfg))
        .map_err(to_py_err)?;

    let dict = PyDict::new(py);
    for (name, values) in series.named() {
        dict.set_item(name, values.to_vec())?;
    }

    let solver = PyDict::new(py);
    solver.set_item("steps", series.solver.steps)?;
    solver.set_item("rejected_steps", series.solver.rejected_steps)?;
    solver.set_item("rhs_evals", series.solver.rhs_evals)?;
    solver.set_item("jacobian_evals", series.solver.jacobian_evals)?;
    solver.set_item("lu_decompositions", series.solver.lu_decompositions)?;
    dict.set_item("solver", solver)?;
    dict.set_item("max_consistency_gap", series.max_consistency_gap())?;
    Ok(dict.into())
}

// ─── schwarzian ─────────────────────────────────────────────────────

/// Guarded Schwarzian S = f'''/f' − 3/2 (f''/f')² at one point.
#[pyfunction]
#[pyo3(signature = (f_prime, f_double_prime, f_triple_prime, epsilon = f64::EPSILON))]
fn schwarzian(f_prime: f64, f_double_prime: f64, f_triple_prime: f64, epsilon: f64) -> f64 {
    jt_physics::schwarzian(f_prime, f_double_prime, f_triple_prime, epsilon)
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn jt_boundary(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyJtConfig>()?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(schwarzian, m)?)?;
    Ok(())
}
