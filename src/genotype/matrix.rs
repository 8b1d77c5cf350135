use crate::genotype::{num_genotypes, pl_index};
use crate::AfCalcError;

/// Per-sample genotype log-likelihoods for one variant site.
///
/// Row `s` holds `ln P(data_s | genotype)` for every diploid genotype in PL
/// order. `-inf` entries (impossible genotypes) are accepted; NaN and `+inf`
/// are not.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeLikelihoodMatrix {
    num_alt_alleles: usize,
    samples: Vec<Box<[f64]>>,
}

impl GenotypeLikelihoodMatrix {
    /// Build a validated matrix for a site with `num_alt_alleles` alternate
    /// alleles.
    pub fn new(num_alt_alleles: usize, samples: Vec<Vec<f64>>) -> Result<Self, AfCalcError> {
        let expected = num_genotypes(num_alt_alleles + 1);
        let mut rows = Vec::with_capacity(samples.len());
        for (sample, row) in samples.into_iter().enumerate() {
            if row.len() != expected {
                return Err(AfCalcError::LikelihoodLength {
                    sample,
                    expected,
                    actual: row.len(),
                });
            }
            if let Some(index) = row.iter().position(|v| v.is_nan() || *v == f64::INFINITY) {
                return Err(AfCalcError::NonFiniteLikelihood { sample, index });
            }
            rows.push(row.into_boxed_slice());
        }
        Ok(Self {
            num_alt_alleles,
            samples: rows,
        })
    }

    /// Build a matrix from Phred-scaled PL values (`-10 log10 L`).
    pub fn from_phred_pls(num_alt_alleles: usize, pls: &[Vec<u32>]) -> Result<Self, AfCalcError> {
        let scale = -std::f64::consts::LN_10 / 10.0;
        let rows = pls
            .iter()
            .map(|row| row.iter().map(|&pl| f64::from(pl) * scale).collect())
            .collect();
        Self::new(num_alt_alleles, rows)
    }

    /// Number of samples (rows).
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of alternate alleles.
    pub fn num_alt_alleles(&self) -> usize {
        self.num_alt_alleles
    }

    /// Number of alleles including the reference.
    pub fn num_alleles(&self) -> usize {
        self.num_alt_alleles + 1
    }

    /// Genotypes per sample.
    pub fn num_genotypes(&self) -> usize {
        num_genotypes(self.num_alleles())
    }

    /// Likelihood row of one sample.
    pub fn sample(&self, index: usize) -> &[f64] {
        &self.samples[index]
    }

    /// Iterate over sample rows.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.samples.iter().map(|row| &row[..])
    }

    /// Drop samples whose likelihoods sum to at least `threshold`.
    ///
    /// A row of (near) zeros says every genotype is equally likely and carries
    /// no information about allele frequency.
    pub fn informative(&self, threshold: f64) -> Self {
        let samples = self
            .samples
            .iter()
            .filter(|row| row.iter().sum::<f64>() < threshold)
            .cloned()
            .collect();
        Self {
            num_alt_alleles: self.num_alt_alleles,
            samples,
        }
    }

    /// Restrict every row to the genotypes over `alleles` (allele indices,
    /// reference first) and rescale each row so its maximum is zero.
    pub(crate) fn subset_alleles(&self, alleles: &[usize]) -> Self {
        debug_assert_eq!(alleles.first(), Some(&0), "reference must be kept");
        let new_genotypes = num_genotypes(alleles.len());
        let samples = self
            .samples
            .iter()
            .map(|row| {
                let mut subset = vec![f64::NEG_INFINITY; new_genotypes];
                for (second, &old_second) in alleles.iter().enumerate() {
                    for (first, &old_first) in alleles[..=second].iter().enumerate() {
                        subset[pl_index(first, second)] = row[pl_index(old_first, old_second)];
                    }
                }
                let max = subset.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if max.is_finite() {
                    subset.iter_mut().for_each(|v| *v -= max);
                }
                subset.into_boxed_slice()
            })
            .collect();
        Self {
            num_alt_alleles: alleles.len() - 1,
            samples,
        }
    }
}
