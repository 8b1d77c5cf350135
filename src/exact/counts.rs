use std::fmt;

/// Allele-count vector: copies of each alternate allele across all samples.
///
/// Immutable value type; equality and hashing are structural so it can key the
/// conformation cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlleleCounts {
    counts: Box<[usize]>,
    total: usize,
}

impl AlleleCounts {
    /// All-reference vector over `num_alt_alleles` alleles.
    pub fn zero(num_alt_alleles: usize) -> Self {
        Self {
            counts: vec![0; num_alt_alleles].into_boxed_slice(),
            total: 0,
        }
    }

    /// Wrap explicit per-allele counts.
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let total = counts.iter().sum();
        Self {
            counts: counts.into_boxed_slice(),
            total,
        }
    }

    /// Per-allele counts.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Count of alternate allele `allele` (0-based over alternates).
    #[inline]
    pub fn get(&self, allele: usize) -> usize {
        self.counts[allele]
    }

    /// Sum over all alternate alleles.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of alternate alleles.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the site has no alternate alleles.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copy with one more copy of `allele`.
    pub fn incremented(&self, allele: usize) -> Self {
        let mut counts = self.counts.clone();
        counts[allele] += 1;
        Self {
            counts,
            total: self.total + 1,
        }
    }

    /// Copy with one more copy of each of `a` and `b` (two of `a` when equal).
    pub fn incremented_pair(&self, a: usize, b: usize) -> Self {
        let mut counts = self.counts.clone();
        counts[a] += 1;
        counts[b] += 1;
        Self {
            counts,
            total: self.total + 2,
        }
    }
}

impl fmt::Display for AlleleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, count) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", count)?;
        }
        write!(f, "]")
    }
}
