//! Canonical PL ordering of unordered diploid genotypes.
//!
//! Genotype `(i, j)` with `i <= j` lives at `j * (j + 1) / 2 + i`, so for
//! alleles `[ref, A, B]` the order is `ref/ref, ref/A, A/A, ref/B, A/B, B/B`.

/// Index of the homozygous-reference genotype.
pub const HOM_REF_INDEX: usize = 0;

/// Unordered allele pair of a diploid genotype, `first <= second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllelePair {
    /// Smaller allele index (0 = reference).
    pub first: usize,
    /// Larger allele index.
    pub second: usize,
}

impl AllelePair {
    /// Whether both chromosomes carry the same allele.
    pub fn is_homozygous(&self) -> bool {
        self.first == self.second
    }
}

/// PL index of the genotype made of alleles `i` and `j` (in any order).
#[inline]
pub fn pl_index(i: usize, j: usize) -> usize {
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    hi * (hi + 1) / 2 + lo
}

/// Number of unordered diploid genotypes over `num_alleles` alleles.
#[inline]
pub fn num_genotypes(num_alleles: usize) -> usize {
    num_alleles * (num_alleles + 1) / 2
}

/// Inverse of [`pl_index`].
pub fn allele_pair(index: usize) -> AllelePair {
    let mut second = 0;
    while num_genotypes(second + 1) <= index {
        second += 1;
    }
    AllelePair {
        first: index - num_genotypes(second),
        second,
    }
}
