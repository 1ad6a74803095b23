//! Criterion benchmarks for the constrained samplers.
//!
//! Measures the common path of each sampler and the cost of its fallback,
//! across batch sizes, walk lengths and ratio-range widths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use synth_core::types::{Range, RatioConstraint, SeriesRequest, TriangularSpec};
use synth_sampling::ratio::{sample_dependent, RatioRequest};
use synth_sampling::rng::SynthRng;
use synth_sampling::series::{sample_mean_targeted, MeanTarget};
use synth_sampling::walk::generate_walk;

/// Benchmark mean-targeted batches, accepted and forced-fallback.
fn bench_mean_targeted(c: &mut Criterion) {
    let mut group = c.benchmark_group("mean_targeted");
    let spec = TriangularSpec::new(0.10, 0.19, 0.13).unwrap();

    for count in [3, 5, 10] {
        let target = MeanTarget::new(count, spec, 0.135, 0.003);
        group.bench_with_input(BenchmarkId::new("accepted", count), &target, |b, target| {
            let mut rng = SynthRng::from_seed(1);
            b.iter(|| sample_mean_targeted(black_box(target), &mut rng).unwrap());
        });

        // Unreachable target: always exhausts the default 500-attempt budget
        let unreachable = MeanTarget::new(count, spec, 0.25, 0.0);
        group.bench_with_input(
            BenchmarkId::new("fallback", count),
            &unreachable,
            |b, target| {
                let mut rng = SynthRng::from_seed(1);
                b.iter(|| sample_mean_targeted(black_box(target), &mut rng).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark bounded walks of increasing length.
fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_walk");
    let range = Range::new(5000.0, 7000.0).unwrap();

    for count in [10, 100, 1000] {
        let request = SeriesRequest::new(count, range, 200.0)
            .with_quantum(10.0)
            .with_anchor(Some(6000.0), 100.0);
        group.bench_with_input(BenchmarkId::new("steps", count), &request, |b, request| {
            let mut rng = SynthRng::from_seed(2);
            b.iter(|| generate_walk(black_box(request), &mut rng).unwrap());
        });
    }

    group.finish();
}

/// Benchmark ratio-constrained draws, with and without spacing.
fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio_dependent");
    let band = RatioConstraint::new(0.0488, 0.0555).unwrap();

    for x in [600.0, 6000.0, 60_000.0] {
        let midpoint = RatioRequest::new(x, band).with_fractional_noise(true);
        group.bench_with_input(BenchmarkId::new("midpoint", x), &midpoint, |b, request| {
            let mut rng = SynthRng::from_seed(3);
            b.iter(|| sample_dependent(black_box(request), &mut rng).unwrap());
        });

        // Spacing larger than the band: every call enumerates then falls back
        let unsatisfiable = RatioRequest::new(x, band).with_previous(Some(0.05), 1.0);
        group.bench_with_input(
            BenchmarkId::new("boundary_fallback", x),
            &unsatisfiable,
            |b, request| {
                let mut rng = SynthRng::from_seed(3);
                b.iter(|| sample_dependent(black_box(request), &mut rng).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mean_targeted, bench_walk, bench_ratio);
criterion_main!(benches);
