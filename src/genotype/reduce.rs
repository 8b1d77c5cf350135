use crate::genotype::{allele_pair, GenotypeLikelihoodMatrix, HOM_REF_INDEX};

/// Pick the `max_alt_alleles` alternate alleles carrying the most evidence.
///
/// Each sample whose best genotype is not hom-ref credits the log-likelihood
/// gain of that genotype over hom-ref to each distinct alternate allele in it.
/// Returns 1-based allele indices in their original order.
pub fn most_likely_alt_alleles(gls: &GenotypeLikelihoodMatrix, max_alt_alleles: usize) -> Vec<usize> {
    let num_alt = gls.num_alt_alleles();
    let mut sums = vec![0.0f64; num_alt];

    for row in gls.iter() {
        let best = best_genotype(row);
        if best == HOM_REF_INDEX {
            continue;
        }
        let gain = row[best] - row[HOM_REF_INDEX];
        let pair = allele_pair(best);
        if pair.first != 0 {
            sums[pair.first - 1] += gain;
        }
        if pair.second != 0 && pair.second != pair.first {
            sums[pair.second - 1] += gain;
        }
    }

    let mut ranked: Vec<usize> = (0..num_alt).collect();
    // Stable sort keeps original order among equal sums.
    ranked.sort_by(|&a, &b| sums[b].total_cmp(&sums[a]));
    ranked.truncate(max_alt_alleles);
    ranked.sort_unstable();
    ranked.into_iter().map(|alt| alt + 1).collect()
}

/// Reduce a site to at most `max_alt_alleles` alternate alleles.
///
/// Returns the (possibly subset) matrix and the original 1-based indices of
/// the alternate alleles it covers.
pub fn reduce_scope(
    gls: &GenotypeLikelihoodMatrix,
    max_alt_alleles: usize,
) -> (GenotypeLikelihoodMatrix, Vec<usize>) {
    if gls.num_alt_alleles() <= max_alt_alleles {
        return (gls.clone(), (1..=gls.num_alt_alleles()).collect());
    }
    let kept = most_likely_alt_alleles(gls, max_alt_alleles);
    tracing::debug!(
        original = gls.num_alt_alleles(),
        kept = ?kept,
        "reducing alternate alleles"
    );
    let mut alleles = Vec::with_capacity(kept.len() + 1);
    alleles.push(0);
    alleles.extend_from_slice(&kept);
    (gls.subset_alleles(&alleles), kept)
}

/// First index of the maximal likelihood.
fn best_genotype(row: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = index;
        }
    }
    best
}
