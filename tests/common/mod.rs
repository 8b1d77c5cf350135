//! Shared helpers for integration tests.

#![allow(dead_code)]

use exact_af::genotype::{num_genotypes, pl_index};
use exact_af::{AfPriors, ExactModelConfig, GenotypeLikelihoodMatrix};

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Row favouring genotype `index` by `strength` nats over every other genotype.
pub fn favouring(num_alt: usize, index: usize, strength: f64) -> Vec<f64> {
    let mut row = vec![-strength; num_genotypes(num_alt + 1)];
    row[index] = 0.0;
    row
}

/// Validated likelihood matrix; panics on malformed test input.
pub fn site(num_alt: usize, rows: Vec<Vec<f64>>) -> GenotypeLikelihoodMatrix {
    GenotypeLikelihoodMatrix::new(num_alt, rows).expect("valid test likelihoods")
}

/// Flat priors covering `num_samples` diploid samples.
pub fn flat_priors(num_samples: usize) -> AfPriors {
    AfPriors::flat(2 * num_samples).expect("flat priors")
}

/// Default configuration that keeps every sample.
pub fn keep_all_samples() -> ExactModelConfig {
    ExactModelConfig::default().with_uninformative_threshold(None)
}

/// Reorder the alternate alleles of one row: new allele `i` is old allele
/// `order[i - 1]` (both 1-based, reference stays 0).
pub fn permute_row(row: &[f64], order: &[usize]) -> Vec<f64> {
    let map = |allele: usize| if allele == 0 { 0 } else { order[allele - 1] };
    let num_alleles = order.len() + 1;
    let mut out = vec![0.0; num_genotypes(num_alleles)];
    for second in 0..num_alleles {
        for first in 0..=second {
            out[pl_index(first, second)] = row[pl_index(map(first), map(second))];
        }
    }
    out
}

/// Deterministic likelihood rows spread over `[-band, 0]`.
pub fn scattered_rows(num_alt: usize, num_samples: usize, band: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..num_samples)
        .map(|_| {
            (0..num_genotypes(num_alt + 1))
                .map(|_| -band * next())
                .collect()
        })
        .collect()
}
