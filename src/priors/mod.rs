//! Allele-frequency priors.
//!
//! A prior vector holds `ln P(AC = k)` for `k = 0..=2N`. Calculators read it
//! without modification; providers build it for a given total ploidy.

mod provider;

pub use provider::{AfPriorProvider, CustomPriors, FlatPriors, HeterozygosityPriors};

use crate::{math::log_sum_exp, AfCalcError, DIPLOID};

/// Validated log prior probabilities indexed by total allele count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AfPriors {
    values: Vec<f64>,
}

impl AfPriors {
    /// Wrap log priors; NaN and `+inf` are rejected.
    pub fn new(values: Vec<f64>) -> Result<Self, AfCalcError> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| v.is_nan() || **v == f64::INFINITY)
        {
            return Err(AfCalcError::NonFinitePrior { index, value });
        }
        Ok(Self { values })
    }

    /// Flat (all zero) log priors for allele counts `0..=max_count`.
    pub fn flat(max_count: usize) -> Result<Self, AfCalcError> {
        Self::new(vec![0.0; max_count + 1])
    }

    /// Log prior at allele count `count`.
    #[inline]
    pub fn get(&self, count: usize) -> f64 {
        self.values[count]
    }

    /// Number of allele counts covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty (an absent prior).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw log values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fail unless priors cover every allele count of `num_samples` diploids.
    pub fn require_samples(&self, num_samples: usize) -> Result<(), AfCalcError> {
        let required = DIPLOID * num_samples + 1;
        if self.values.len() < required {
            return Err(AfCalcError::PriorsTooShort {
                required,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    /// `ln P(AC = 0)` and `ln P(AC > 0)`.
    pub fn split_at_zero(&self) -> [f64; 2] {
        match self.values.split_first() {
            Some((&zero, rest)) => [zero, log_sum_exp(rest)],
            None => [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan() {
        let err = AfPriors::new(vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, AfCalcError::NonFinitePrior { index: 1, .. }));
    }

    #[test]
    fn requires_enough_counts() {
        let priors = AfPriors::flat(4).unwrap();
        assert!(priors.require_samples(2).is_ok());
        assert_eq!(
            priors.require_samples(3),
            Err(AfCalcError::PriorsTooShort {
                required: 7,
                actual: 5
            })
        );
        let empty = AfPriors::new(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.require_samples(0).is_err());
    }

    #[test]
    fn split_at_zero_sums_the_tail() {
        let priors = AfPriors::new(vec![0.5f64.ln(), 0.25f64.ln(), 0.25f64.ln()]).unwrap();
        let [zero, rest] = priors.split_at_zero();
        assert!((zero - 0.5f64.ln()).abs() < 1e-12);
        assert!((rest - 0.5f64.ln()).abs() < 1e-12);
    }
}
