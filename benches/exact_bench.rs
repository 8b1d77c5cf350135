//! Performance benchmarks for the exact allele-frequency model

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exact_af::*;

/// Deterministic likelihood rows spread over `[-band, 0]`.
fn rows(num_alt: usize, num_samples: usize, band: f64) -> Vec<Vec<f64>> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..num_samples)
        .map(|_| {
            (0..num_genotypes(num_alt + 1))
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    -band * ((state >> 11) as f64 / (1u64 << 53) as f64)
                })
                .collect()
        })
        .collect()
}

fn benchmark_alt_alleles(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_reference_by_alt_alleles");
    let calculator = ReferenceDiploidExact::new(ExactModelConfig::default());

    for num_alt in 1..=3 {
        let gls = GenotypeLikelihoodMatrix::new(num_alt, rows(num_alt, 50, 30.0)).unwrap();
        let priors = AfPriors::flat(2 * gls.num_samples()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(num_alt), &gls, |b, gls| {
            b.iter(|| black_box(calculator.calculate(gls, &priors).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_reference_by_samples");
    let calculator = ReferenceDiploidExact::new(ExactModelConfig::default());

    for num_samples in [10, 100, 1_000] {
        let gls = GenotypeLikelihoodMatrix::new(2, rows(2, num_samples, 30.0)).unwrap();
        let priors = AfPriors::flat(2 * num_samples).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(num_samples), &gls, |b, gls| {
            b.iter(|| black_box(calculator.calculate(gls, &priors).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_log_sum_exp(c: &mut Criterion) {
    c.bench_function("approx_log_sum_exp", |b| {
        b.iter(|| {
            let mut acc = f64::NEG_INFINITY;
            for i in 0..1_000 {
                acc = math::approx_log_sum_exp(acc, black_box(-(i as f64) * 0.01));
            }
            acc
        });
    });
}

criterion_group!(benches, benchmark_alt_alleles, benchmark_samples, benchmark_log_sum_exp);
criterion_main!(benches);
