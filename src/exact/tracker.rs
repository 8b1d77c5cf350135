use crate::math::log_sum_exp;
use crate::AfCalcError;

/// Non-zero likelihoods are buffered and condensed in batches of this size.
const LIKELIHOODS_BUFFER_SIZE: usize = 5_000;

/// Best-so-far bookkeeping for one site computation.
///
/// Holds the AF = 0 likelihood and posterior, the MLE and MAP allele-count
/// vectors, the running log-sum of every non-zero conformation's likelihood,
/// and the pruning predicate. A tracker can be reused across sites via
/// [`StateTracker::reset`].
#[derive(Debug, Clone)]
pub struct StateTracker {
    max_alt_alleles: usize,
    abort_log_margin: f64,
    num_alt_alleles: usize,
    log_mle: f64,
    log_map: f64,
    mle_counts: Vec<usize>,
    map_counts: Vec<usize>,
    log_likelihood_af_zero: f64,
    log_posterior_af_zero: f64,
    non_zero_likelihoods: Vec<f64>,
}

impl StateTracker {
    /// Tracker for sites with up to `max_alt_alleles` alternate alleles.
    pub fn new(max_alt_alleles: usize, abort_log_margin: f64) -> Self {
        Self {
            max_alt_alleles,
            abort_log_margin,
            num_alt_alleles: 0,
            log_mle: f64::NEG_INFINITY,
            log_map: f64::NEG_INFINITY,
            mle_counts: Vec::with_capacity(max_alt_alleles),
            map_counts: Vec::with_capacity(max_alt_alleles),
            log_likelihood_af_zero: f64::NEG_INFINITY,
            log_posterior_af_zero: f64::NEG_INFINITY,
            non_zero_likelihoods: Vec::new(),
        }
    }

    /// Clear all state for a site with `num_alt_alleles` alternate alleles.
    pub fn reset(&mut self, num_alt_alleles: usize) -> Result<(), AfCalcError> {
        if num_alt_alleles > self.max_alt_alleles {
            return Err(AfCalcError::TrackerCapacity {
                requested: num_alt_alleles,
                capacity: self.max_alt_alleles,
            });
        }
        self.num_alt_alleles = num_alt_alleles;
        self.log_mle = f64::NEG_INFINITY;
        self.log_map = f64::NEG_INFINITY;
        self.mle_counts.clear();
        self.mle_counts.resize(num_alt_alleles, 0);
        self.map_counts.clear();
        self.map_counts.resize(num_alt_alleles, 0);
        self.log_likelihood_af_zero = f64::NEG_INFINITY;
        self.log_posterior_af_zero = f64::NEG_INFINITY;
        self.non_zero_likelihoods.clear();
        Ok(())
    }

    /// Fail unless the tracker was reset for `num_alt_alleles` alleles.
    pub(crate) fn ensure_sized(&self, num_alt_alleles: usize) -> Result<(), AfCalcError> {
        if num_alt_alleles > self.max_alt_alleles {
            return Err(AfCalcError::TrackerCapacity {
                requested: num_alt_alleles,
                capacity: self.max_alt_alleles,
            });
        }
        if self.mle_counts.len() != num_alt_alleles {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "state tracker reset for {} alternate alleles, site has {}",
                self.mle_counts.len(),
                num_alt_alleles
            )));
        }
        Ok(())
    }

    /// Record the AF = 0 likelihood and its prior.
    pub fn set_af_zero(&mut self, log_likelihood: f64, log_prior: f64) {
        self.log_likelihood_af_zero = log_likelihood;
        self.log_posterior_af_zero = log_likelihood + log_prior;
    }

    /// Fold in a non-zero conformation's likelihood; keep it if it is the best.
    pub fn update_mle_if_needed(&mut self, log_likelihood: f64, counts: &[usize]) {
        self.push_non_zero_likelihood(log_likelihood);
        if log_likelihood > self.log_mle {
            self.log_mle = log_likelihood;
            self.mle_counts.copy_from_slice(counts);
        }
    }

    /// Keep a non-zero conformation's posterior if it is the best.
    pub fn update_map_if_needed(&mut self, log_posterior: f64, counts: &[usize]) {
        if log_posterior > self.log_map {
            self.log_map = log_posterior;
            self.map_counts.copy_from_slice(counts);
        }
    }

    /// Whether extending a conformation is pointless: `extension_bound`, an
    /// upper bound on what any successor can receive from it, is more than
    /// the abort margin below the MLE.
    pub fn abort(&self, extension_bound: f64) -> bool {
        extension_bound < self.log_mle - self.abort_log_margin
    }

    fn push_non_zero_likelihood(&mut self, log_likelihood: f64) {
        self.non_zero_likelihoods.push(log_likelihood);
        if self.non_zero_likelihoods.len() == LIKELIHOODS_BUFFER_SIZE {
            let condensed = log_sum_exp(&self.non_zero_likelihoods);
            self.non_zero_likelihoods.clear();
            self.non_zero_likelihoods.push(condensed);
        }
    }

    /// Alternate alleles of the current site.
    pub fn num_alt_alleles(&self) -> usize {
        self.num_alt_alleles
    }

    /// `ln L(AF = 0)`.
    pub fn log_likelihood_af_zero(&self) -> f64 {
        self.log_likelihood_af_zero
    }

    /// `ln L(AF = 0) + ln P(AC = 0)`.
    pub fn log_posterior_af_zero(&self) -> f64 {
        self.log_posterior_af_zero
    }

    /// Log-sum of the likelihoods of all evaluated non-zero conformations.
    pub fn log_likelihood_af_not_zero(&self) -> f64 {
        log_sum_exp(&self.non_zero_likelihoods)
    }

    /// Best likelihood over non-zero conformations.
    pub fn log_mle(&self) -> f64 {
        self.log_mle
    }

    /// Best posterior over non-zero conformations.
    pub fn log_map(&self) -> f64 {
        self.log_map
    }

    /// Allele counts at the MLE.
    pub fn mle_counts(&self) -> &[usize] {
        &self.mle_counts
    }

    /// Allele counts at the MAP.
    pub fn map_counts(&self) -> &[usize] {
        &self.map_counts
    }
}
