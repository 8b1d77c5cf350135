use std::collections::BTreeMap;
use std::f64::consts::LN_2;

use crate::calculator::{AfCalculator, ExactModelConfig};
use crate::exact::StateTracker;
use crate::genotype::{allele_pair, AllelePair, GenotypeLikelihoodMatrix};
use crate::math::log_sum_exp;
use crate::priors::AfPriors;
use crate::{AfCalcError, DIPLOID};

/// Exhaustive enumeration of genotype assignments.
///
/// For each allele-count vector `K`, sums over every assignment `g` of
/// genotypes to samples consistent with `K`:
///
/// `P(g | K) = Π_s m_s · K_ref! · Π_a K_a! / (2N)!`
///
/// where `m_s` is 2 for heterozygous samples and 1 otherwise (hypergeometric
/// draw of `2N` chromosomes). Exponential in the number of samples; intended
/// as an oracle for small sites.
#[derive(Debug, Clone)]
pub struct BruteForceDiploid {
    config: ExactModelConfig,
}

impl BruteForceDiploid {
    /// Create the calculator.
    pub fn new(config: ExactModelConfig) -> Self {
        Self { config }
    }

    /// `ln P(D | K)` for every allele-count vector `K` with at least one
    /// consistent assignment, including the zero vector.
    pub fn log_likelihood_table(
        &self,
        gls: &GenotypeLikelihoodMatrix,
    ) -> Result<BTreeMap<Vec<usize>, f64>, AfCalcError> {
        self.check_limit(gls)?;
        Ok(Self::log_likelihoods_by_counts(gls)
            .into_iter()
            .map(|((_, counts), value)| (counts, value))
            .collect())
    }

    fn configurations(num_genotypes: usize, num_samples: usize) -> u128 {
        u32::try_from(num_samples)
            .ok()
            .and_then(|exp| (num_genotypes as u128).checked_pow(exp))
            .unwrap_or(u128::MAX)
    }

    fn check_limit(&self, gls: &GenotypeLikelihoodMatrix) -> Result<(), AfCalcError> {
        let configurations = Self::configurations(gls.num_genotypes(), gls.num_samples());
        if configurations > self.config.brute_force_limit {
            return Err(AfCalcError::StateSpaceTooLarge {
                configurations,
                limit: self.config.brute_force_limit,
            });
        }
        tracing::debug!(configurations = %configurations, "enumerating genotype assignments");
        Ok(())
    }

    /// `ln P(D | K)` for every reachable allele-count vector, keyed by
    /// `(total, counts)`.
    fn log_likelihoods_by_counts(gls: &GenotypeLikelihoodMatrix) -> BTreeMap<(usize, Vec<usize>), f64> {
        let num_samples = gls.num_samples();
        let num_alt = gls.num_alt_alleles();
        let pairs: Vec<AllelePair> = (0..gls.num_genotypes()).map(allele_pair).collect();

        let mut sums: BTreeMap<(usize, Vec<usize>), f64> = BTreeMap::new();
        let mut assignment = vec![0usize; num_samples];
        loop {
            let mut counts = vec![0usize; num_alt];
            let mut log_weight = 0.0;
            for (sample, &genotype) in assignment.iter().enumerate() {
                let pair = pairs[genotype];
                for allele in [pair.first, pair.second] {
                    if allele > 0 {
                        counts[allele - 1] += 1;
                    }
                }
                if !pair.is_homozygous() {
                    log_weight += LN_2;
                }
                log_weight += gls.sample(sample)[genotype];
            }
            let total: usize = counts.iter().sum();
            sums.entry((total, counts))
                .and_modify(|acc| *acc = log_sum_exp(&[*acc, log_weight]))
                .or_insert(log_weight);

            if !advance(&mut assignment, pairs.len()) {
                break;
            }
        }

        let num_chr = DIPLOID * num_samples;
        let ln_factorial = ln_factorials(num_chr);
        for ((total, counts), value) in sums.iter_mut() {
            let numerator: f64 = counts.iter().map(|&k| ln_factorial[k]).sum::<f64>()
                + ln_factorial[num_chr - *total];
            *value += numerator - ln_factorial[num_chr];
        }
        sums
    }
}

/// Odometer step over genotype indices; false once every assignment is seen.
fn advance(assignment: &mut [usize], num_genotypes: usize) -> bool {
    for digit in assignment.iter_mut() {
        *digit += 1;
        if *digit < num_genotypes {
            return true;
        }
        *digit = 0;
    }
    false
}

fn ln_factorials(max: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(max + 1);
    table.push(0.0);
    for n in 1..=max {
        table.push(table[n - 1] + (n as f64).ln());
    }
    table
}

impl AfCalculator for BruteForceDiploid {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn description(&self) -> &'static str {
        "Exhaustive enumeration of genotype assignments (small sites only)."
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
        priors.require_samples(gls.num_samples())?;
        tracker.ensure_sized(gls.num_alt_alleles())?;
        self.check_limit(gls)?;

        for ((total, counts), log_likelihood) in Self::log_likelihoods_by_counts(gls) {
            if log_likelihood.is_nan() {
                return Err(AfCalcError::NonFiniteProbability(format!(
                    "log-likelihood NaN for allele counts {:?}",
                    counts
                )));
            }
            if total == 0 {
                tracker.set_af_zero(log_likelihood, priors.get(0));
                continue;
            }
            tracker.update_mle_if_needed(log_likelihood, &counts);
            let log_prior: f64 = counts
                .iter()
                .filter(|&&count| count > 0)
                .map(|&count| priors.get(count))
                .sum();
            tracker.update_map_if_needed(log_likelihood + log_prior, &counts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_biallelic_matches_hand_computation() {
        // One sample, K = 1: only ref/alt, weight 2 · 1! · 1! / 2! = 1.
        // K = 2: only alt/alt, weight 1 · 2! / 2! = 1.
        let gls = GenotypeLikelihoodMatrix::new(1, vec![vec![-3.0, -1.0, -7.0]]).unwrap();
        let sums = BruteForceDiploid::log_likelihoods_by_counts(&gls);
        assert!((sums[&(0, vec![0])] - (-3.0)).abs() < 1e-12);
        assert!((sums[&(1, vec![1])] - (-1.0)).abs() < 1e-12);
        assert!((sums[&(2, vec![2])] - (-7.0)).abs() < 1e-12);
    }

    #[test]
    fn two_samples_mix_assignments() {
        // K = 1 over two samples: (het, homref) or (homref, het), each weight
        // 2 · 3! · 1! / 4! = 1/2.
        let gls = GenotypeLikelihoodMatrix::new(
            1,
            vec![vec![-1.0, -2.0, -5.0], vec![-0.5, -3.0, -6.0]],
        )
        .unwrap();
        let sums = BruteForceDiploid::log_likelihoods_by_counts(&gls);
        let expected = (0.5 * ((-2.0f64 - 0.5).exp() + (-1.0f64 - 3.0).exp())).ln();
        assert!((sums[&(1, vec![1])] - expected).abs() < 1e-12);
    }

    #[test]
    fn refuses_large_state_spaces() {
        let gls = GenotypeLikelihoodMatrix::new(2, vec![vec![0.0; 6]; 10]).unwrap();
        let priors = AfPriors::flat(20).unwrap();
        let mut tracker = StateTracker::new(2, 10.0);
        tracker.reset(2).unwrap();
        let calculator = BruteForceDiploid::new(ExactModelConfig::default());
        assert!(matches!(
            calculator.compute_with_tracker(&gls, &priors, &mut tracker),
            Err(AfCalcError::StateSpaceTooLarge { .. })
        ));
        assert!(matches!(
            calculator.log_likelihood_table(&gls),
            Err(AfCalcError::StateSpaceTooLarge { .. })
        ));
    }

    #[test]
    fn table_is_keyed_by_counts() {
        let gls = GenotypeLikelihoodMatrix::new(1, vec![vec![-3.0, -1.0, -7.0]]).unwrap();
        let table = BruteForceDiploid::new(ExactModelConfig::default())
            .log_likelihood_table(&gls)
            .unwrap();
        assert_eq!(table.len(), 3);
        assert!((table[&vec![1]] - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn no_samples_is_a_single_empty_assignment() {
        let gls = GenotypeLikelihoodMatrix::new(1, Vec::new()).unwrap();
        let sums = BruteForceDiploid::log_likelihoods_by_counts(&gls);
        assert_eq!(sums.len(), 1);
        assert_eq!(sums[&(0, vec![0])], 0.0);
    }
}
