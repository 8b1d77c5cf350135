//! Upper bound on the likelihood a conformation can still hand to successors.
//!
//! Mass leaves a processed conformation only through a push at some sample
//! `i` (0-based) with a non-reference genotype, reading prefix cell `i`. Every
//! later sample then takes some genotype, and every hypergeometric factor of
//! the recurrence is a probability. So the mass any single successor receives
//! from the conformation is at most
//!
//! `log Σ_i (cell[i] + best_non_ref[i] + Σ_{s > i} best[s])`
//!
//! where `best` is a sample's largest likelihood over all genotypes.

use crate::exact::conformation::Conformation;
use crate::genotype::{GenotypeLikelihoodMatrix, HOM_REF_INDEX};
use crate::math::approx_log_sum_exp;

/// Per-sample tails of the extension bound for one site.
#[derive(Debug)]
pub(crate) struct ExtensionBound {
    /// `tails[i] = best_non_ref[i] + Σ_{s > i} best[s]`.
    tails: Box<[f64]>,
}

impl ExtensionBound {
    pub(crate) fn new(gls: &GenotypeLikelihoodMatrix) -> Self {
        let mut tails = vec![f64::NEG_INFINITY; gls.num_samples()];
        let mut rest = 0.0;
        for sample in (0..gls.num_samples()).rev() {
            let row = gls.sample(sample);
            let best_non_ref = row
                .iter()
                .enumerate()
                .filter(|&(genotype, _)| genotype != HOM_REF_INDEX)
                .map(|(_, &value)| value)
                .fold(f64::NEG_INFINITY, f64::max);
            tails[sample] = best_non_ref + rest;
            rest += row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }
        Self {
            tails: tails.into_boxed_slice(),
        }
    }

    /// Bound for a processed conformation; `-inf` when no successor can
    /// receive anything from it.
    pub(crate) fn of(&self, conformation: &Conformation) -> f64 {
        conformation
            .log_likelihoods()
            .iter()
            .zip(self.tails.iter())
            .filter(|(&cell, _)| cell > f64::NEG_INFINITY)
            .map(|(&cell, &tail)| cell + tail)
            .fold(f64::NEG_INFINITY, approx_log_sum_exp)
    }
}
