use criterion::{Criterion, criterion_group, criterion_main};
use matan::numerical::differentiation::multi_estimator::MultiEstimatorRunner;
use matan::numerical::evaluable::SymbolicFunction;
use matan::numerical::optimization::minimizer::MinimizerKind;
use std::hint::black_box;

const FUNC: &str = "exp(x)*sin(3*x) + x^2";

fn bench_all_differences(c: &mut Criterion) {
    let runner = MultiEstimatorRunner::default();
    c.bench_function("all differences, h = 1e-3", |b| {
        b.iter(|| runner.run_all_differences(black_box(FUNC), -2.0, 2.0, 1e-3))
    });
}

fn bench_rmse_sweep(c: &mut Criterion) {
    let runner = MultiEstimatorRunner::default();
    let mut group = c.benchmark_group("RMSE sweep, 8 levels");
    group.bench_function("sequential", |b| {
        b.iter(|| runner.run_rmse_sweep(black_box(FUNC), -2.0, 2.0, 0.01, 8))
    });
    group.bench_function("rayon", |b| {
        b.iter(|| runner.run_rmse_sweep_parallel(black_box(FUNC), -2.0, 2.0, 0.01, 8))
    });
    group.finish();
}

fn bench_minimizers(c: &mut Criterion) {
    let f = SymbolicFunction::from_string(FUNC).unwrap();
    let mut group = c.benchmark_group("minimizers, eps = 1e-10");
    for kind in [MinimizerKind::Golden, MinimizerKind::Dichotomy] {
        let minimizer = kind.minimizer(0.0);
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| minimizer.minimize(&f, black_box(-1.0), 0.5, 1e-10))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_all_differences, bench_rmse_sweep, bench_minimizers);
criterion_main!(benches);
