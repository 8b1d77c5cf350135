//! # Exact multi-allelic allele-frequency calculation
//!
//! Computes, for one variant site with several alternate alleles and many
//! diploid samples, the posterior over allele-count (AC) vectors from
//! per-sample genotype likelihoods.
//!
//! ## Core Algorithm
//!
//! 1. **Worklist over conformations**: AC vectors are visited in order of
//!    increasing total count, starting from the all-reference vector
//! 2. **Prefix recurrence**: each conformation holds `ln L` for every sample
//!    prefix, fed by pushes from its predecessors
//! 3. **Eager eviction**: a conformation leaves the cache once processed, so
//!    only the live frontier stays resident
//! 4. **Pruning**: a conformation stops generating successors once an upper
//!    bound on anything it can still pass on falls far below the MLE
//!
//! ## Usage Example
//!
//! ```
//! use exact_af::{
//!     AfCalculator, AfPriors, ExactModelConfig, GenotypeLikelihoodMatrix,
//!     ReferenceDiploidExact,
//! };
//!
//! // Two samples, one alternate allele, both confidently hom-alt.
//! let gls = GenotypeLikelihoodMatrix::new(1, vec![
//!     vec![-100.0, -50.0, 0.0],
//!     vec![-100.0, -50.0, 0.0],
//! ]).unwrap();
//! let priors = AfPriors::flat(2 * gls.num_samples()).unwrap();
//! let calculator = ReferenceDiploidExact::new(ExactModelConfig::default());
//! let result = calculator.calculate(&gls, &priors).unwrap();
//! assert_eq!(result.mle_counts(), &[4]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod math;       // Log-space numerics
pub mod genotype;   // PL ordering and likelihood input
pub mod priors;     // Allele-frequency priors
pub mod exact;      // Exact diploid DP and brute-force oracle
pub mod calculator; // Strategy trait, configuration and results

// Re-exports for convenience
pub use calculator::{
    AfCalculationResult, AfCalculator, CalculatorRegistry, ExactModelConfig,
};
pub use exact::{
    AlleleCounts, BruteForceDiploid, FrontierProfile, ReferenceDiploidExact, StateTracker,
};
pub use genotype::{GenotypeLikelihoodMatrix, pl_index, allele_pair, num_genotypes};
pub use priors::{AfPriorProvider, AfPriors};

use thiserror::Error;

/// Ploidy supported by the exact model.
pub const DIPLOID: usize = 2;

/// Errors that can occur while computing allele-frequency posteriors.
///
/// Every variant is a fatal data error for the site; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AfCalcError {
    /// Sample likelihood vector has the wrong number of genotypes.
    #[error("sample {sample}: expected {expected} genotype likelihoods, got {actual}")]
    LikelihoodLength {
        /// Sample index in the input matrix.
        sample: usize,
        /// Genotype count implied by ploidy and allele count.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Likelihood value is NaN or +inf.
    #[error("sample {sample}: non-finite likelihood at genotype {index}")]
    NonFiniteLikelihood {
        /// Sample index in the input matrix.
        sample: usize,
        /// PL index of the offending value.
        index: usize,
    },

    /// Only diploid samples are supported.
    #[error("unsupported ploidy {0}; only diploid samples are supported")]
    UnsupportedPloidy(usize),

    /// Priors vector absent or shorter than `2 * samples + 1`.
    #[error("priors vector too short: need {required} values, got {actual}")]
    PriorsTooShort {
        /// Required number of prior values.
        required: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Prior value is NaN or +inf.
    #[error("non-finite prior {value} at allele count {index}")]
    NonFinitePrior {
        /// Allele count of the offending prior.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A computed probability vector is malformed.
    #[error("non-finite or unnormalised probability: {0}")]
    NonFiniteProbability(String),

    /// State tracker cannot hold the site's alternate alleles.
    #[error("state tracker holds {capacity} alternate alleles, site needs {requested}")]
    TrackerCapacity {
        /// Alternate alleles at the site.
        requested: usize,
        /// Tracker capacity.
        capacity: usize,
    },

    /// Configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Exhaustive enumeration would visit too many genotype assignments.
    #[error("state space of {configurations} genotype assignments exceeds limit {limit}")]
    StateSpaceTooLarge {
        /// Assignments required.
        configurations: u128,
        /// Configured limit.
        limit: u128,
    },

    /// Registry has no calculator under this name.
    #[error("unknown calculator '{0}'")]
    UnknownCalculator(String),
}
