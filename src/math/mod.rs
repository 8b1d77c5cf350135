//! Log-space numerics shared by every calculator.
//!
//! Genotype likelihoods span hundreds of orders of magnitude, so all
//! probabilities are carried as natural logs and combined with log-sum-exp.

mod jacobian;

pub use jacobian::MAX_TOLERANCE;

/// Upper bound on `|approx_log_sum_exp(a, b) - ln(exp(a) + exp(b))|` for
/// finite inputs.
pub const MAX_APPROXIMATION_ERROR: f64 = 1e-7;

/// Tolerance used when checking that a normalised log vector sums to one.
const NORMALIZATION_TOLERANCE: f64 = 1e-4;

/// Approximate `ln(exp(a) + exp(b))` via the interpolated Jacobian table.
///
/// Commutative and non-decreasing in both arguments. `-inf` is the identity;
/// NaN propagates. The absolute error is bounded by [`MAX_APPROXIMATION_ERROR`].
#[inline]
pub fn approx_log_sum_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if lo == f64::NEG_INFINITY || hi == f64::INFINITY {
        return hi;
    }
    hi + jacobian::correction(hi - lo)
}

/// Exact `ln(sum(exp(values)))`; `-inf` for an empty slice.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || max == f64::INFINITY {
        return max;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Rescale log values so that their exponentials sum to one.
pub fn normalize_log(values: &[f64]) -> Vec<f64> {
    let total = log_sum_exp(values);
    values.iter().map(|&v| v - total).collect()
}

/// Whether `values` is a normalised log probability vector of length
/// `expected_len`: no NaN, no positive values, exponentials summing to one.
pub fn is_good_log_prob_vector(values: &[f64], expected_len: usize) -> bool {
    if values.len() != expected_len {
        return false;
    }
    if values.iter().any(|v| v.is_nan() || *v > 0.0) {
        return false;
    }
    let total: f64 = values.iter().map(|v| v.exp()).sum();
    (total - 1.0).abs() <= NORMALIZATION_TOLERANCE
}

/// Precomputed `ln(n)` for small non-negative integers.
///
/// `ln(0)` is `-inf`, which is how impossible genotype configurations drop out
/// of the recurrence.
#[derive(Debug, Clone)]
pub struct LogCache {
    values: Vec<f64>,
}

impl LogCache {
    /// Cache `ln(n)` for `n` in `0..=max`.
    pub fn new(max: usize) -> Self {
        Self {
            values: (0..=max).map(|n| (n as f64).ln()).collect(),
        }
    }

    /// `ln(n)`, falling back to direct evaluation past the cached range.
    #[inline]
    pub fn get(&self, n: usize) -> f64 {
        match self.values.get(n) {
            Some(&value) => value,
            None => (n as f64).ln(),
        }
    }
}
