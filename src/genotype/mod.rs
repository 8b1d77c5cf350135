//! Genotype-likelihood input for the allele-frequency calculators.
//!
//! Covers the PL ordering of diploid genotypes, the validated likelihood
//! matrix, and reduction of sites with too many alternate alleles.

mod matrix;
mod pl;
mod reduce;

pub use matrix::GenotypeLikelihoodMatrix;
pub use pl::{allele_pair, num_genotypes, pl_index, AllelePair, HOM_REF_INDEX};
pub use reduce::{most_likely_alt_alleles, reduce_scope};
