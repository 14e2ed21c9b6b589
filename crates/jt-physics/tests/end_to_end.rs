use std::f64::consts::TAU;

use jt_physics::{safe_derivative, simulate, NaturalCubicSpline, Simulation, TimeGrid};
use jt_types::{JtConfig, JtError, SimulationSeries};

fn run(cfg: &JtConfig) -> SimulationSeries {
    simulate(cfg).unwrap_or_else(|e| panic!("pipeline failed: {e}"))
}

#[test]
fn default_parameters_on_reduced_grid() {
    let cfg = JtConfig::with_grid_size(1000);
    let series = run(&cfg);

    assert_eq!(series.len(), 1000);
    for (name, values) in series.named() {
        assert_eq!(values.len(), 1000, "{name} misaligned");
    }
    assert_eq!(series.t[0], 0.0);
    assert_eq!(series.t[999], 3.0);

    assert_eq!(series.f_evolved[0], series.f_initial[0]);
    assert_eq!(series.f_difference[0], 0.0);
    assert_eq!(series.first_non_finite(), None);

    // Leading order S₀(0) ≈ φ'''(0) = −δω³.
    let omega = TAU / 3.0;
    assert!((series.s_initial[0] + 0.01 * omega.powi(3)).abs() < 3e-3);

    let report = series.solver;
    assert!(report.steps > 0);
    assert!(report.rhs_evals >= report.steps);
    assert!(report.lu_decompositions > 0);
}

#[test]
fn guarded_slope_never_below_epsilon() {
    let cfg = JtConfig::with_grid_size(1000);
    let series = run(&cfg);
    for &fp in &series.f_prime_evolved {
        assert!(safe_derivative(fp, cfg.epsilon).abs() >= cfg.epsilon);
    }
}

#[test]
fn consistency_gap_is_reported() {
    let series = run(&JtConfig::with_grid_size(1000));
    let gap = series.max_consistency_gap();
    // (f − t) and φ are separate degrees of freedom once C ≠ 0, so the
    // gap is an O(1) diagnostic rather than a tolerance.
    assert!(gap.is_finite(), "gap={gap}");
    assert!(gap < 5.0, "gap={gap}");
}

#[test]
fn no_thermal_driving_keeps_unit_temperature() {
    let cfg = JtConfig {
        delta_temp: 0.0,
        ..JtConfig::with_grid_size(200)
    };
    let series = run(&cfg);
    assert!(series.temperature.iter().all(|&v| v == 1.0));

    // The source then reduces to the interpolated initial Schwarzian.
    let spline = NaturalCubicSpline::new(&series.t, &series.s_initial).unwrap();
    for (t, s) in series.t.iter().zip(&series.s_initial) {
        assert!((spline.eval(*t) - s).abs() < 1e-9);
    }
}

#[test]
fn decoupled_dilaton_is_linear() {
    let cfg = JtConfig {
        coupling: 0.0,
        ..JtConfig::with_grid_size(500)
    };
    let series = run(&cfg);
    // χ(0) = δ, χ'(0) = 0 and φ'' = 0.
    for (phi, dphi) in series.dilaton_evolved.iter().zip(&series.dilaton_prime_evolved) {
        assert!((phi - 0.01).abs() < 1e-9, "φ={phi}");
        assert!(dphi.abs() < 1e-9, "φ'={dphi}");
    }
}

#[test]
fn shifted_window_starts_from_initial_state() {
    let cfg = JtConfig {
        t_start: 1.0,
        t_end: 2.5,
        ..JtConfig::with_grid_size(300)
    };
    let series = run(&cfg);
    let grid = TimeGrid::from_config(&cfg).unwrap();
    assert_eq!(series.t, grid.as_slice());
    assert_eq!(series.f_evolved[0], series.f_initial[0]);
    assert_eq!(series.first_non_finite(), None);
}

#[test]
fn config_errors_surface_before_integration() {
    let bad = [
        JtConfig { grid_size: 1, ..JtConfig::default() },
        JtConfig { epsilon: 0.0, ..JtConfig::default() },
        JtConfig { t_end: 0.0, ..JtConfig::default() },
        JtConfig { rtol: f64::NAN, ..JtConfig::default() },
    ];
    for cfg in &bad {
        assert!(
            matches!(Simulation::new(cfg), Err(JtError::Config(_))),
            "accepted {cfg:?}"
        );
    }
}

#[test]
fn json_config_drives_a_run() {
    let cfg = JtConfig::from_json(r#"{"grid_size": 128, "coupling": 0.5}"#).unwrap();
    let series = run(&cfg);
    assert_eq!(series.len(), 128);
    let json = serde_json::to_string(&series).unwrap();
    assert!(json.contains("\"s_evolved\""));
}
