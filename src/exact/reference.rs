use crate::calculator::{AfCalculator, ExactModelConfig};
use crate::exact::bound::ExtensionBound;
use crate::exact::cache::{ConformationCache, FrontierProfile};
use crate::exact::successors::successors;
use crate::exact::{AlleleCounts, StateTracker};
use crate::genotype::GenotypeLikelihoodMatrix;
use crate::math::LogCache;
use crate::priors::AfPriors;
use crate::{AfCalcError, DIPLOID};

/// Exact multi-allelic diploid model.
///
/// Walks allele-count conformations breadth-first by total count. Each
/// popped conformation finishes its prefix recurrence, updates the tracker,
/// and (unless pruned) pushes contributions into its successors before it is
/// evicted. A conformation is pruned when even its best possible extension
/// falls more than the abort margin below the MLE. Cost grows
/// combinatorially with the number of alternate alleles.
#[derive(Debug, Clone)]
pub struct ReferenceDiploidExact {
    config: ExactModelConfig,
}

/// Read-only inputs shared by every conformation of a site.
struct Site<'a> {
    gls: &'a GenotypeLikelihoodMatrix,
    priors: &'a AfPriors,
    logs: LogCache,
    bound: ExtensionBound,
    num_chr: usize,
}

impl<'a> Site<'a> {
    fn new(gls: &'a GenotypeLikelihoodMatrix, priors: &'a AfPriors) -> Self {
        let num_chr = DIPLOID * gls.num_samples();
        Self {
            gls,
            priors,
            logs: LogCache::new(num_chr),
            bound: ExtensionBound::new(gls),
            num_chr,
        }
    }
}

impl ReferenceDiploidExact {
    /// Create the calculator.
    pub fn new(config: ExactModelConfig) -> Self {
        Self { config }
    }

    /// Run the DP on a prepared site and report frontier statistics.
    pub fn run(
        &self,
        gls: &GenotypeLikelihoodMatrix,
        priors: &AfPriors,
        tracker: &mut StateTracker,
    ) -> Result<FrontierProfile, AfCalcError> {
        priors.require_samples(gls.num_samples())?;
        tracker.ensure_sized(gls.num_alt_alleles())?;

        let span = tracing::debug_span!(
            "exact_reference",
            samples = gls.num_samples(),
            alt_alleles = gls.num_alt_alleles()
        );
        let _enter = span.enter();

        let site = Site::new(gls, priors);
        let mut cache = ConformationCache::new(gls.num_samples());
        self.explore(&site, &mut cache, tracker)?;

        let profile = cache.profile().clone();
        tracing::debug!(
            created = profile.created,
            processed = profile.processed,
            pruned = profile.pruned,
            peak_live = profile.peak_live,
            log_mle = tracker.log_mle(),
            "exact model finished"
        );
        Ok(profile)
    }

    fn explore(
        &self,
        site: &Site<'_>,
        cache: &mut ConformationCache,
        tracker: &mut StateTracker,
    ) -> Result<(), AfCalcError> {
        cache.get_or_create(AlleleCounts::zero(site.gls.num_alt_alleles()));
        while let Some(slot) = cache.pop() {
            self.process(slot, site, cache, tracker)?;
            cache.evict(slot);
        }
        Ok(())
    }

    fn process(
        &self,
        slot: usize,
        site: &Site<'_>,
        cache: &mut ConformationCache,
        tracker: &mut StateTracker,
    ) -> Result<(), AfCalcError> {
        let counts = cache.get(slot).counts().clone();

        let log_likelihood = if counts.total() == 0 {
            cache.get_mut(slot).compute_reference_only(site.gls)
        } else {
            cache.get_mut(slot).compute_general(site.gls, &site.logs)
        };
        if log_likelihood.is_nan() || log_likelihood == f64::INFINITY {
            return Err(AfCalcError::NonFiniteProbability(format!(
                "log-likelihood {} for allele counts {}",
                log_likelihood, counts
            )));
        }

        if counts.total() == 0 {
            tracker.set_af_zero(log_likelihood, site.priors.get(0));
        } else {
            tracker.update_mle_if_needed(log_likelihood, counts.counts());
            let log_posterior = log_likelihood
                + counts
                    .counts()
                    .iter()
                    .filter(|&&count| count > 0)
                    .map(|&count| site.priors.get(count))
                    .sum::<f64>();
            tracker.update_map_if_needed(log_posterior, counts.counts());
        }

        tracing::trace!(
            counts = %counts,
            log_likelihood,
            live = cache.live(),
            "processed conformation"
        );

        let room = site.num_chr - counts.total();
        if room == 0 {
            return Ok(());
        }

        let extension_bound = site.bound.of(cache.get(slot));
        if extension_bound == f64::NEG_INFINITY {
            // Every push would carry zero mass.
            return Ok(());
        }
        if tracker.abort(extension_bound) {
            cache.record_pruned();
            return Ok(());
        }

        for successor in successors(&counts, room) {
            let target = cache.get_or_create(successor.counts);
            let (generator, target) = cache.pair_mut(slot, target);
            target.accumulate(generator, successor.feed, site.gls, &site.logs);
        }
        Ok(())
    }
}

impl AfCalculator for ReferenceDiploidExact {
    fn name(&self) -> &'static str {
        "exact_reference"
    }

    fn description(&self) -> &'static str {
        "Exact multi-allelic diploid model over allele-count conformations."
    }

    fn config(&self) -> &ExactModelConfig {
        &self.config
    }

    fn compute_with_tracker(
        &self,
        gls: &GenotypeLikelihoodMatrix,
        priors: &AfPriors,
        tracker: &mut StateTracker,
    ) -> Result<(), AfCalcError> {
        self.run(gls, priors, tracker).map(|_| ())
    }
}
