//! Successor conformations and their combinatorial coefficients.
//!
//! From a conformation with total count `K`, sample `j` may add one
//! alternate copy (ref/a heterozygote) or two (a/b or a/a). With `K'` the
//! successor's total and `k_x` its counts, the log coefficients are:
//!
//! | genotype | coefficient              |
//! |----------|--------------------------|
//! | ref/a    | `2·k_a · (2j − K')`      |
//! | a/a      | `k_a · (k_a − 1)`        |
//! | a/b      | `2 · k_a · k_b`          |

use std::f64::consts::LN_2;

use crate::exact::AlleleCounts;
use crate::genotype::pl_index;
use crate::math::LogCache;

/// Genotype through which a generator feeds a successor (0-based alternates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feed {
    RefAlt(usize),
    HomAlt(usize),
    AltAlt(usize, usize),
}

impl Feed {
    /// PL index of the feeding genotype (reference is allele 0).
    pub(crate) fn pl_index(self) -> usize {
        match self {
            Feed::RefAlt(a) => pl_index(0, a + 1),
            Feed::HomAlt(a) => pl_index(a + 1, a + 1),
            Feed::AltAlt(a, b) => pl_index(a + 1, b + 1),
        }
    }

    /// Log coefficient at sample prefix `j`, counts taken from the successor.
    #[inline]
    pub(crate) fn log_coefficient(self, j: usize, successor: &AlleleCounts, logs: &LogCache) -> f64 {
        match self {
            Feed::RefAlt(a) => {
                logs.get(2 * successor.get(a)) + logs.get(2 * j - successor.total())
            }
            Feed::HomAlt(a) => {
                let k = successor.get(a);
                logs.get(k) + logs.get(k.saturating_sub(1))
            }
            Feed::AltAlt(a, b) => LN_2 + logs.get(successor.get(a)) + logs.get(successor.get(b)),
        }
    }
}

/// Successor conformation together with the genotype that feeds it.
#[derive(Debug, Clone)]
pub(crate) struct Successor {
    pub(crate) counts: AlleleCounts,
    pub(crate) feed: Feed,
}

/// Successors of `counts` given `room` free chromosomes (`room > 0`).
///
/// Order: all `+1` successors, then `+2` successors over distinct alleles,
/// then `+2` successors over a single allele.
pub(crate) fn successors(counts: &AlleleCounts, room: usize) -> Vec<Successor> {
    let num_alt = counts.len();
    let mut out = Vec::with_capacity(num_alt * (num_alt + 3) / 2);

    out.extend((0..num_alt).map(|a| Successor {
        counts: counts.incremented(a),
        feed: Feed::RefAlt(a),
    }));

    if room > 1 {
        for a in 0..num_alt {
            for b in a + 1..num_alt {
                out.push(Successor {
                    counts: counts.incremented_pair(a, b),
                    feed: Feed::AltAlt(a, b),
                });
            }
        }
        out.extend((0..num_alt).map(|a| Successor {
            counts: counts.incremented_pair(a, a),
            feed: Feed::HomAlt(a),
        }));
    }
    out
}
