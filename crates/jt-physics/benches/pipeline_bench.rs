// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Pipeline Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the per-grid-point stages and the full run.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jt_physics::{
    derive_initial_fields, simulate, InitialProfile, NaturalCubicSpline, TimeGrid,
};
use jt_types::JtConfig;

// ── Initial profile ─────────────────────────────────────────────────

fn bench_initial_profile_100k(c: &mut Criterion) {
    let grid = TimeGrid::new(0.0, 3.0, 100_000).unwrap();
    c.bench_function("initial_profile_100k", |b| {
        b.iter(|| {
            let fields = derive_initial_fields(black_box(&grid), 0.01);
            InitialProfile::from_perturbation(&grid, &fields.perturbation, f64::EPSILON)
        })
    });
}

// ── NaturalCubicSpline ──────────────────────────────────────────────

fn bench_spline_build_100k(c: &mut Criterion) {
    let grid = TimeGrid::new(0.0, 3.0, 100_000).unwrap();
    let y: Vec<f64> = grid.as_slice().iter().map(|t| (2.0 * t).sin()).collect();
    c.bench_function("spline_build_100k", |b| {
        b.iter(|| NaturalCubicSpline::new(black_box(grid.as_slice()), black_box(&y)))
    });
}

fn bench_spline_eval_sorted_100k(c: &mut Criterion) {
    let grid = TimeGrid::new(0.0, 3.0, 100_000).unwrap();
    let y: Vec<f64> = grid.as_slice().iter().map(|t| (2.0 * t).sin()).collect();
    let spline = NaturalCubicSpline::new(grid.as_slice(), &y).unwrap();
    c.bench_function("spline_eval_sorted_100k", |b| {
        b.iter(|| spline.eval_sorted(black_box(grid.as_slice())))
    });
}

// ── Full pipeline ───────────────────────────────────────────────────

fn bench_simulate_1k(c: &mut Criterion) {
    let cfg = JtConfig::with_grid_size(1_000);
    c.bench_function("simulate_1k", |b| b.iter(|| simulate(black_box(&cfg))));
}

fn bench_simulate_100k(c: &mut Criterion) {
    let cfg = JtConfig::with_grid_size(100_000);
    let mut group = c.benchmark_group("simulate_large");
    group.sample_size(10);
    group.bench_function("simulate_100k", |b| b.iter(|| simulate(black_box(&cfg))));
    group.finish();
}

criterion_group!(
    benches,
    bench_initial_profile_100k,
    bench_spline_build_100k,
    bench_spline_eval_sorted_100k,
    bench_simulate_1k,
    bench_simulate_100k,
);
criterion_main!(benches);
