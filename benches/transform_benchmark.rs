#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for the statistical transform engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gramviz::data::DataFrame;
use gramviz::transform::compute;
use gramviz::view::View;

fn transform_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for size in [100, 1_000, 10_000, 100_000] {
        // Deterministic bell-curve-like data
        let xs: Vec<f32> = (0..size)
            .map(|i| {
                let t = i as f32 / size as f32;
                (t * std::f32::consts::TAU).sin() * 50.0 + 50.0 + (i % 17) as f32
            })
            .collect();
        let ys: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).cos() * 10.0).collect();
        let data = DataFrame::from_xy(&xs, &ys);

        group.bench_with_input(BenchmarkId::new("identity", size), &size, |b, _| {
            let view = View::new(data.clone()).x("x").y("y");
            b.iter(|| compute(black_box(&view)));
        });

        group.bench_with_input(BenchmarkId::new("bin", size), &size, |b, _| {
            let view = View::new(data.clone()).x("x").bin();
            b.iter(|| compute(black_box(&view)));
        });

        group.bench_with_input(BenchmarkId::new("regress", size), &size, |b, _| {
            let view = View::new(data.clone()).x("x").y("y").regress();
            b.iter(|| compute(black_box(&view)));
        });
    }

    group.finish();
}

criterion_group!(benches, transform_benchmark);
criterion_main!(benches);
