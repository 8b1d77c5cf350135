use std::f64::consts::LN_10;

use crate::exact::StateTracker;
use crate::math::{is_good_log_prob_vector, normalize_log};
use crate::priors::AfPriors;
use crate::AfCalcError;

/// `ln P(AF = 0)` reported for an allele present in the MAP vector.
pub const CALLED_ALLELE_LOG_P_REF: f64 = -10_000.0 * LN_10;

/// Outcome of an allele-frequency calculation at one site.
///
/// Two-element vectors are indexed `[AF = 0, AF > 0]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AfCalculationResult {
    alleles_used: Vec<usize>,
    mle_counts: Vec<usize>,
    map_counts: Vec<usize>,
    log_mle: f64,
    log_map: f64,
    log_likelihood_af_zero: f64,
    log_posterior_af_zero: f64,
    log_likelihoods: [f64; 2],
    log_priors: [f64; 2],
    log_posteriors: [f64; 2],
    log_p_ref_by_allele: Vec<f64>,
}

impl AfCalculationResult {
    /// Build the result from a finished tracker.
    ///
    /// `alleles_used` are the original 1-based indices of the alternate
    /// alleles the tracker's vectors refer to.
    pub fn from_tracker(
        tracker: &StateTracker,
        alleles_used: Vec<usize>,
        priors: &AfPriors,
    ) -> Result<Self, AfCalcError> {
        if alleles_used.len() != tracker.mle_counts().len() {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "{} alleles used but tracker holds {}",
                alleles_used.len(),
                tracker.mle_counts().len()
            )));
        }

        let log_likelihoods = to_pair(normalize_log(&[
            tracker.log_likelihood_af_zero(),
            tracker.log_likelihood_af_not_zero(),
        ]));
        let log_priors = to_pair(normalize_log(&priors.split_at_zero()));
        let log_posteriors = to_pair(normalize_log(&[
            log_likelihoods[0] + log_priors[0],
            log_likelihoods[1] + log_priors[1],
        ]));

        check("likelihoods", &log_likelihoods)?;
        check("priors", &log_priors)?;
        check("posteriors", &log_posteriors)?;

        let log_p_ref_by_allele = tracker
            .map_counts()
            .iter()
            .map(|&count| if count > 0 { CALLED_ALLELE_LOG_P_REF } else { 0.0 })
            .collect();

        Ok(Self {
            alleles_used,
            mle_counts: tracker.mle_counts().to_vec(),
            map_counts: tracker.map_counts().to_vec(),
            log_mle: tracker.log_mle(),
            log_map: tracker.log_map(),
            log_likelihood_af_zero: tracker.log_likelihood_af_zero(),
            log_posterior_af_zero: tracker.log_posterior_af_zero(),
            log_likelihoods,
            log_priors,
            log_posteriors,
            log_p_ref_by_allele,
        })
    }

    /// Original 1-based indices of the alternate alleles that were genotyped.
    pub fn alleles_used(&self) -> &[usize] {
        &self.alleles_used
    }

    /// Allele counts at the MLE, aligned with [`Self::alleles_used`].
    pub fn mle_counts(&self) -> &[usize] {
        &self.mle_counts
    }

    /// Allele counts at the MAP, aligned with [`Self::alleles_used`].
    pub fn map_counts(&self) -> &[usize] {
        &self.map_counts
    }

    /// Raw `ln L` of the MLE vector.
    pub fn log_mle(&self) -> f64 {
        self.log_mle
    }

    /// Raw log posterior of the MAP vector.
    pub fn log_map(&self) -> f64 {
        self.log_map
    }

    /// Raw `ln L(AF = 0)`.
    pub fn log_likelihood_of_af_zero(&self) -> f64 {
        self.log_likelihood_af_zero
    }

    /// Raw `ln L(AF = 0) + ln P(AC = 0)`.
    pub fn log_posterior_of_af_zero(&self) -> f64 {
        self.log_posterior_af_zero
    }

    /// Normalised `[ln L(AF = 0), ln L(AF > 0)]`.
    pub fn log_likelihoods(&self) -> [f64; 2] {
        self.log_likelihoods
    }

    /// Normalised `[ln P(AF = 0), ln P(AF > 0)]`.
    pub fn log_priors(&self) -> [f64; 2] {
        self.log_priors
    }

    /// Normalised posterior of AF = 0.
    pub fn log_posterior_of_af_eq_zero(&self) -> f64 {
        self.log_posteriors[0]
    }

    /// Normalised posterior of AF > 0.
    pub fn log_posterior_of_af_gt_zero(&self) -> f64 {
        self.log_posteriors[1]
    }

    /// Count of `allele` (original 1-based index) at the MLE.
    pub fn allele_count_at_mle(&self, allele: usize) -> Option<usize> {
        self.position(allele).map(|i| self.mle_counts[i])
    }

    /// `ln P(AF = 0)` for one alternate allele (original 1-based index).
    pub fn log_posterior_of_af_eq_zero_for_allele(&self, allele: usize) -> Option<f64> {
        self.position(allele).map(|i| self.log_p_ref_by_allele[i])
    }

    /// Whether `allele` is confidently non-reference: its `ln P(AF = 0)` lies
    /// below `min_log_p_non_ref`. Unknown alleles are never polymorphic.
    pub fn is_polymorphic(&self, allele: usize, min_log_p_non_ref: f64) -> bool {
        self.log_posterior_of_af_eq_zero_for_allele(allele)
            .map_or(false, |log_p_ref| log_p_ref < min_log_p_non_ref)
    }

    /// [`Self::is_polymorphic`] with a Phred-scaled confidence threshold.
    pub fn is_polymorphic_phred_scaled_qual(
        &self,
        allele: usize,
        min_phred_qual: f64,
    ) -> Result<bool, AfCalcError> {
        if !(min_phred_qual >= 0.0) {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "phred-scaled threshold must be >= 0, got {}",
                min_phred_qual
            )));
        }
        Ok(self.is_polymorphic(allele, -min_phred_qual / 10.0 * LN_10))
    }

    /// Whether any genotyped allele passes the Phred-scaled threshold.
    pub fn passes_threshold(&self, min_phred_qual: f64) -> Result<bool, AfCalcError> {
        for &allele in &self.alleles_used {
            if self.is_polymorphic_phred_scaled_qual(allele, min_phred_qual)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn position(&self, allele: usize) -> Option<usize> {
        self.alleles_used.iter().position(|&a| a == allele)
    }
}

fn to_pair(values: Vec<f64>) -> [f64; 2] {
    [values[0], values[1]]
}

fn check(label: &str, values: &[f64; 2]) -> Result<(), AfCalcError> {
    if is_good_log_prob_vector(values, 2) {
        Ok(())
    } else {
        Err(AfCalcError::NonFiniteProbability(format!(
            "{} [{}, {}]",
            label, values[0], values[1]
        )))
    }
}
