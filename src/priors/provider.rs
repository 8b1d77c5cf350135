use crate::priors::AfPriors;
use crate::AfCalcError;

/// Source of allele-frequency priors for a given total ploidy (`2N`).
pub trait AfPriorProvider: std::fmt::Debug + Send + Sync {
    /// Log priors for allele counts `0..=total_ploidy`.
    fn priors(&self, total_ploidy: usize) -> Result<AfPriors, AfCalcError>;
}

/// Uninformative priors: every allele count has log prior zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPriors;

impl AfPriorProvider for FlatPriors {
    fn priors(&self, total_ploidy: usize) -> Result<AfPriors, AfCalcError> {
        AfPriors::flat(total_ploidy)
    }
}

/// Neutral infinite-sites prior: `P(AC = k) = θ / k` for `k > 0`.
#[derive(Debug, Clone, Copy)]
pub struct HeterozygosityPriors {
    heterozygosity: f64,
}

impl HeterozygosityPriors {
    /// Create a provider; `heterozygosity` must lie in `(0, 1)`.
    pub fn new(heterozygosity: f64) -> Result<Self, AfCalcError> {
        if !(heterozygosity > 0.0 && heterozygosity < 1.0) {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "heterozygosity must be in (0, 1), got {}",
                heterozygosity
            )));
        }
        Ok(Self { heterozygosity })
    }
}

impl AfPriorProvider for HeterozygosityPriors {
    fn priors(&self, total_ploidy: usize) -> Result<AfPriors, AfCalcError> {
        let harmonic: f64 = (1..=total_ploidy).map(|k| 1.0 / k as f64).sum();
        let non_ref = self.heterozygosity * harmonic;
        if non_ref >= 1.0 {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "heterozygosity {} too large for total ploidy {}",
                self.heterozygosity, total_ploidy
            )));
        }
        let mut values = Vec::with_capacity(total_ploidy + 1);
        values.push((1.0 - non_ref).ln());
        values.extend((1..=total_ploidy).map(|k| (self.heterozygosity / k as f64).ln()));
        AfPriors::new(values)
    }
}

/// User-supplied probabilities for allele counts `1..`; the remainder goes to
/// `AC = 0`. Counts past the supplied list get zero probability.
#[derive(Debug, Clone)]
pub struct CustomPriors {
    non_ref: Vec<f64>,
}

impl CustomPriors {
    /// Create a provider from per-count probabilities (not logs).
    pub fn new(non_ref: Vec<f64>) -> Result<Self, AfCalcError> {
        if non_ref.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(AfCalcError::InvalidConfiguration(
                "custom priors must be probabilities in [0, 1]".to_string(),
            ));
        }
        let total: f64 = non_ref.iter().sum();
        if total >= 1.0 {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "custom priors sum to {}, leaving nothing for AC = 0",
                total
            )));
        }
        Ok(Self { non_ref })
    }
}

impl AfPriorProvider for CustomPriors {
    fn priors(&self, total_ploidy: usize) -> Result<AfPriors, AfCalcError> {
        let supplied = &self.non_ref[..self.non_ref.len().min(total_ploidy)];
        let mut values = Vec::with_capacity(total_ploidy + 1);
        values.push((1.0 - supplied.iter().sum::<f64>()).ln());
        values.extend(supplied.iter().map(|p| p.ln()));
        values.resize(total_ploidy + 1, f64::NEG_INFINITY);
        AfPriors::new(values)
    }
}
