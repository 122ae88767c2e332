//! Greedy Selection Benchmark
//!
//! Compares a fully dense run against the default warm-start split and a
//! fully lazy run, for both objectives, on synthetic data.
//!
//!   cargo bench --bench greedy

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::prelude::*;

use rapid_subset::greedy::NoopObserver;
use rapid_subset::{
    ConcaveTransform, DenseMatrix, FacilityLocation, FeatureBased, GreedySelector,
    SimilarityKernel,
};

const N: usize = 2000;
const DIM: usize = 32;
const K: usize = 100;

/// Non-negative random features, a few dominant columns per row
fn generate_features(n: usize, dim: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..n * dim)
        .map(|_| {
            let x: f64 = rng.random_range(0.0..1.0);
            x * x * x
        })
        .collect();
    DenseMatrix::new(n, dim, data).expect("generated shape")
}

fn bench_facility_location(c: &mut Criterion) {
    let features = generate_features(N, DIM, 42);
    let objective =
        FacilityLocation::from_features(&features, &SimilarityKernel::Cosine).expect("kernel");

    let mut group = c.benchmark_group("facility_location");
    group.sample_size(10);
    for warm in [K, 25, 0] {
        group.bench_with_input(BenchmarkId::new("greedy_samples", warm), &warm, |b, &warm| {
            let selector = GreedySelector::new(K).with_greedy_samples(warm);
            b.iter(|| black_box(selector.run(&objective, &mut NoopObserver).expect("select")));
        });
    }
    group.finish();
}

fn bench_feature_based(c: &mut Criterion) {
    let features = generate_features(N * 5, DIM, 7);
    let objective = FeatureBased::new(features, ConcaveTransform::Sqrt).expect("features");

    let mut group = c.benchmark_group("feature_based");
    group.sample_size(10);
    for warm in [K, 3, 0] {
        group.bench_with_input(BenchmarkId::new("greedy_samples", warm), &warm, |b, &warm| {
            let selector = GreedySelector::new(K).with_greedy_samples(warm);
            b.iter(|| black_box(selector.run(&objective, &mut NoopObserver).expect("select")));
        });
    }
    group.finish();
}

fn bench_similarity_kernels(c: &mut Criterion) {
    let features = generate_features(N, DIM, 3);

    let mut group = c.benchmark_group("similarity_kernel");
    group.sample_size(10);
    for kernel in [
        SimilarityKernel::Correlation,
        SimilarityKernel::Cosine,
        SimilarityKernel::NegativeSquaredEuclidean,
    ] {
        group.bench_function(kernel.as_str(), |b| {
            b.iter(|| black_box(kernel.build(&features).expect("kernel")));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_facility_location,
    bench_feature_based,
    bench_similarity_kernels,
);

criterion_main!(benches);
