use std::f64::consts::LN_10;

use crate::AfCalcError;

/// Default cap on alternate alleles entering the exact model.
pub const DEFAULT_MAX_ALT_ALLELES: usize = 6;

/// Default pruning margin: six orders of magnitude.
pub const DEFAULT_ABORT_LOG_MARGIN: f64 = 6.0 * LN_10;

/// Samples whose likelihoods sum to at least this are dropped by default.
pub const DEFAULT_UNINFORMATIVE_THRESHOLD: f64 = -0.1 * LN_10;

/// Default ceiling on genotype assignments visited by exhaustive enumeration.
pub const DEFAULT_BRUTE_FORCE_LIMIT: u128 = 1_000_000;

/// Configuration parameters for the exact allele-frequency model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExactModelConfig {
    /// Sites with more alternate alleles are reduced to the most likely ones.
    pub max_alt_alleles: usize,

    /// Natural-log margin below the MLE at which branches may be pruned.
    pub abort_log_margin: f64,

    /// Threshold for dropping uninformative samples (`None` keeps all).
    pub uninformative_threshold: Option<f64>,

    /// Maximum assignments enumerated by the brute-force calculator.
    pub brute_force_limit: u128,
}

impl Default for ExactModelConfig {
    fn default() -> Self {
        Self {
            max_alt_alleles: DEFAULT_MAX_ALT_ALLELES,
            abort_log_margin: DEFAULT_ABORT_LOG_MARGIN,
            uninformative_threshold: Some(DEFAULT_UNINFORMATIVE_THRESHOLD),
            brute_force_limit: DEFAULT_BRUTE_FORCE_LIMIT,
        }
    }
}

impl ExactModelConfig {
    /// Construct configuration with an explicit allele cap and pruning margin.
    pub fn new(max_alt_alleles: usize, abort_log_margin: f64) -> Result<Self, AfCalcError> {
        let config = Self {
            max_alt_alleles,
            abort_log_margin,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the uninformative-sample threshold.
    pub fn with_uninformative_threshold(mut self, threshold: Option<f64>) -> Self {
        self.uninformative_threshold = threshold;
        self
    }

    /// Set the brute-force enumeration ceiling.
    pub fn with_brute_force_limit(mut self, limit: u128) -> Self {
        self.brute_force_limit = limit;
        self
    }

    /// Check invariants; public fields may have been edited after construction.
    pub fn validate(&self) -> Result<(), AfCalcError> {
        if self.max_alt_alleles == 0 {
            return Err(AfCalcError::InvalidConfiguration(
                "max_alt_alleles must be > 0".to_string(),
            ));
        }
        if !(self.abort_log_margin.is_finite() && self.abort_log_margin > 0.0) {
            return Err(AfCalcError::InvalidConfiguration(format!(
                "abort_log_margin must be finite and > 0, got {}",
                self.abort_log_margin
            )));
        }
        if let Some(threshold) = self.uninformative_threshold {
            if threshold.is_nan() {
                return Err(AfCalcError::InvalidConfiguration(
                    "uninformative_threshold is NaN".to_string(),
                ));
            }
        }
        Ok(())
    }
}
