use crate::exact::successors::Feed;
use crate::exact::AlleleCounts;
use crate::genotype::{GenotypeLikelihoodMatrix, HOM_REF_INDEX};
use crate::math::{approx_log_sum_exp, LogCache};

/// Lifecycle of a cached conformation. Transitions only move forward; an
/// evicted slot may be recycled for a new conformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Created on first reference, no contributions yet.
    Created,
    /// Receiving pushes from predecessors while queued.
    Accumulating,
    /// Own recurrence evaluated.
    Processed,
    /// Removed from the cache.
    Evicted,
}

/// One allele-count vector under evaluation.
///
/// `log_likelihoods[j]` is `ln L` of the first `j` samples given the vector.
/// Cells start at `-inf` and are filled by predecessor pushes before the
/// conformation's own turn.
#[derive(Debug)]
pub(crate) struct Conformation {
    counts: AlleleCounts,
    log_likelihoods: Box<[f64]>,
    phase: Phase,
}

impl Conformation {
    pub(crate) fn new(counts: AlleleCounts, num_samples: usize) -> Self {
        Self {
            counts,
            log_likelihoods: vec![f64::NEG_INFINITY; num_samples + 1].into_boxed_slice(),
            phase: Phase::Created,
        }
    }

    /// Rebind an evicted slot to new counts, keeping the allocation.
    pub(crate) fn recycle(&mut self, counts: AlleleCounts) {
        debug_assert_eq!(self.phase, Phase::Evicted);
        self.counts = counts;
        self.log_likelihoods.fill(f64::NEG_INFINITY);
        self.phase = Phase::Created;
    }

    pub(crate) fn counts(&self) -> &AlleleCounts {
        &self.counts
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn mark_evicted(&mut self) {
        debug_assert_eq!(self.phase, Phase::Processed);
        self.phase = Phase::Evicted;
    }

    /// `ln L` over all samples; meaningful once processed.
    pub(crate) fn log_likelihood(&self) -> f64 {
        self.log_likelihoods[self.log_likelihoods.len() - 1]
    }

    /// Prefix cells `0..=N`.
    pub(crate) fn log_likelihoods(&self) -> &[f64] {
        &self.log_likelihoods
    }

    /// AF = 0 path: running sum of hom-ref likelihoods.
    pub(crate) fn compute_reference_only(&mut self, gls: &GenotypeLikelihoodMatrix) -> f64 {
        debug_assert_eq!(self.counts.total(), 0);
        self.begin_processing();
        for j in 1..self.log_likelihoods.len() {
            self.log_likelihoods[j] =
                self.log_likelihoods[j - 1] + gls.sample(j - 1)[HOM_REF_INDEX];
        }
        self.log_likelihood()
    }

    /// General recurrence: fold in the hom-ref case for sample `j` where
    /// there is room, then divide by the `2j · (2j − 1)` ordered draws.
    pub(crate) fn compute_general(&mut self, gls: &GenotypeLikelihoodMatrix, logs: &LogCache) -> f64 {
        self.begin_processing();
        let total = self.counts.total();
        for j in 1..self.log_likelihoods.len() {
            let two_j = 2 * j;
            if total + 1 < two_j {
                let hom_ref = logs.get(two_j - total)
                    + logs.get(two_j - total - 1)
                    + self.log_likelihoods[j - 1]
                    + gls.sample(j - 1)[HOM_REF_INDEX];
                self.log_likelihoods[j] = approx_log_sum_exp(self.log_likelihoods[j], hom_ref);
            }
            self.log_likelihoods[j] -= logs.get(two_j) + logs.get(two_j - 1);
        }
        self.log_likelihood()
    }

    /// Push the contribution of a processed `generator` through `feed`.
    pub(crate) fn accumulate(
        &mut self,
        generator: &Conformation,
        feed: Feed,
        gls: &GenotypeLikelihoodMatrix,
        logs: &LogCache,
    ) {
        debug_assert_eq!(generator.phase, Phase::Processed);
        debug_assert!(matches!(self.phase, Phase::Created | Phase::Accumulating));
        self.phase = Phase::Accumulating;

        let total = self.counts.total();
        let pl = feed.pl_index();
        for j in 1..self.log_likelihoods.len() {
            if total > 2 * j {
                continue;
            }
            let value = feed.log_coefficient(j, &self.counts, logs)
                + generator.log_likelihoods[j - 1]
                + gls.sample(j - 1)[pl];
            self.log_likelihoods[j] = approx_log_sum_exp(self.log_likelihoods[j], value);
        }
    }

    /// The empty prefix carries no alleles, so only the zero vector has mass
    /// at cell 0.
    fn begin_processing(&mut self) {
        debug_assert!(matches!(self.phase, Phase::Created | Phase::Accumulating));
        self.log_likelihoods[0] = if self.counts.total() == 0 {
            0.0
        } else {
            f64::NEG_INFINITY
        };
        self.phase = Phase::Processed;
    }
}
