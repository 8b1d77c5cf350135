//! Allele-frequency calculators as interchangeable strategies.
//!
//! Every model shares one contract: genotype likelihoods and priors in, an
//! [`AfCalculationResult`] out. Site preparation (dropping uninformative
//! samples, capping the alternate alleles, sizing the tracker) is done once
//! in the provided [`AfCalculator::calculate_with_tracker`].

mod config;
mod registry;
mod result;

pub use config::{
    ExactModelConfig, DEFAULT_ABORT_LOG_MARGIN, DEFAULT_BRUTE_FORCE_LIMIT,
    DEFAULT_MAX_ALT_ALLELES, DEFAULT_UNINFORMATIVE_THRESHOLD,
};
pub use registry::{CalculatorInfo, CalculatorRegistry};
pub use result::{AfCalculationResult, CALLED_ALLELE_LOG_P_REF};

use crate::exact::StateTracker;
use crate::genotype::{reduce_scope, GenotypeLikelihoodMatrix};
use crate::priors::AfPriors;
use crate::{AfCalcError, DIPLOID};

/// Trait implemented by every allele-frequency model.
pub trait AfCalculator: std::fmt::Debug + Send + Sync {
    /// Unique calculator name.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Model configuration.
    fn config(&self) -> &ExactModelConfig;

    /// Ploidy the model handles.
    fn ploidy(&self) -> usize {
        DIPLOID
    }

    /// Run the model on a prepared site, recording into a tracker already
    /// reset for `gls.num_alt_alleles()` alleles.
    fn compute_with_tracker(
        &self,
        gls: &GenotypeLikelihoodMatrix,
        priors: &AfPriors,
        tracker: &mut StateTracker,
    ) -> Result<(), AfCalcError>;

    /// Prepare the site, run the model with a caller-owned tracker, and
    /// summarise.
    fn calculate_with_tracker(
        &self,
        gls: &GenotypeLikelihoodMatrix,
        priors: &AfPriors,
        tracker: &mut StateTracker,
    ) -> Result<AfCalculationResult, AfCalcError> {
        let config = self.config();
        config.validate()?;
        if self.ploidy() != DIPLOID {
            return Err(AfCalcError::UnsupportedPloidy(self.ploidy()));
        }

        let informative = match config.uninformative_threshold {
            Some(threshold) => gls.informative(threshold),
            None => gls.clone(),
        };
        let (site, alleles_used) = reduce_scope(&informative, config.max_alt_alleles);
        priors.require_samples(site.num_samples())?;
        tracker.reset(site.num_alt_alleles())?;

        self.compute_with_tracker(&site, priors, tracker)?;
        AfCalculationResult::from_tracker(tracker, alleles_used, priors)
    }

    /// [`Self::calculate_with_tracker`] with a fresh tracker.
    fn calculate(
        &self,
        gls: &GenotypeLikelihoodMatrix,
        priors: &AfPriors,
    ) -> Result<AfCalculationResult, AfCalcError> {
        let config = self.config();
        let mut tracker = StateTracker::new(config.max_alt_alleles, config.abort_log_margin);
        self.calculate_with_tracker(gls, priors, &mut tracker)
    }
}
