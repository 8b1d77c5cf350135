//! Conformation cache and worklist.
//!
//! Conformations live in an arena of slots addressed by index; a map from
//! structural [`AlleleCounts`] keys finds the slot of a queued vector. Slots
//! are recycled after eviction, so live memory follows the frontier.
//!
//! The worklist holds one FIFO bucket per total allele count and drains the
//! lowest total first. Successors always have a larger total than their
//! generator, so every conformation has received all of its pushes when it
//! is popped, and no push can target an already evicted vector.

use std::collections::{HashMap, VecDeque};

use crate::exact::conformation::{Conformation, Phase};
use crate::exact::AlleleCounts;

/// Counters describing one run over the conformation space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierProfile {
    /// Conformations created (distinct vectors referenced).
    pub created: usize,
    /// Conformations popped and evaluated.
    pub processed: usize,
    /// Processed conformations whose successors were skipped.
    pub pruned: usize,
    /// Largest number of simultaneously live conformations.
    pub peak_live: usize,
    /// Arena slots allocated (at least `peak_live`).
    pub slots_allocated: usize,
}

/// Arena of conformations keyed by allele counts, with a worklist bucketed
/// by total count.
#[derive(Debug)]
pub(crate) struct ConformationCache {
    slots: Vec<Conformation>,
    free: Vec<usize>,
    index: HashMap<AlleleCounts, usize>,
    buckets: Vec<VecDeque<usize>>,
    /// Total count currently being drained.
    cursor: usize,
    num_samples: usize,
    profile: FrontierProfile,
    #[cfg(test)]
    evicted: Vec<AlleleCounts>,
}

impl ConformationCache {
    pub(crate) fn new(num_samples: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            buckets: Vec::new(),
            cursor: 0,
            num_samples,
            profile: FrontierProfile::default(),
            #[cfg(test)]
            evicted: Vec::new(),
        }
    }

    /// Slot of `counts`, creating and enqueuing it on first reference.
    pub(crate) fn get_or_create(&mut self, counts: AlleleCounts) -> usize {
        if let Some(&slot) = self.index.get(&counts) {
            return slot;
        }
        let total = counts.total();
        debug_assert!(
            total >= self.cursor,
            "{} created after totals up to {} were drained",
            counts,
            self.cursor
        );
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot].recycle(counts.clone());
                slot
            }
            None => {
                self.slots.push(Conformation::new(counts.clone(), self.num_samples));
                self.profile.slots_allocated += 1;
                self.slots.len() - 1
            }
        };
        self.index.insert(counts, slot);
        if self.buckets.len() <= total {
            self.buckets.resize_with(total + 1, VecDeque::new);
        }
        self.buckets[total].push_back(slot);
        self.profile.created += 1;
        self.profile.peak_live = self.profile.peak_live.max(self.index.len());
        slot
    }

    /// Next conformation: lowest total first, creation order within a total.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        while let Some(bucket) = self.buckets.get_mut(self.cursor) {
            if let Some(slot) = bucket.pop_front() {
                return Some(slot);
            }
            self.cursor += 1;
        }
        None
    }

    pub(crate) fn get(&self, slot: usize) -> &Conformation {
        &self.slots[slot]
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> &mut Conformation {
        &mut self.slots[slot]
    }

    /// Shared access to `source` alongside mutable access to `target`.
    pub(crate) fn pair_mut(&mut self, source: usize, target: usize) -> (&Conformation, &mut Conformation) {
        assert_ne!(source, target, "conformation cannot feed itself");
        if source < target {
            let (lo, hi) = self.slots.split_at_mut(target);
            (&lo[source], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(source);
            (&hi[0], &mut lo[target])
        }
    }

    /// Remove a processed conformation and free its slot.
    pub(crate) fn evict(&mut self, slot: usize) {
        #[cfg(test)]
        self.evicted.push(self.slots[slot].counts().clone());
        let state = &mut self.slots[slot];
        debug_assert_eq!(state.phase(), Phase::Processed);
        self.index.remove(state.counts());
        state.mark_evicted();
        self.free.push(slot);
        self.profile.processed += 1;
    }

    pub(crate) fn record_pruned(&mut self) {
        self.profile.pruned += 1;
    }

    /// Number of conformations currently resident.
    pub(crate) fn live(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn profile(&self) -> &FrontierProfile {
        &self.profile
    }

    /// Every evicted vector, in eviction order.
    #[cfg(test)]
    pub(crate) fn evicted(&self) -> &[AlleleCounts] {
        &self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::GenotypeLikelihoodMatrix;

    #[test]
    fn get_or_create_is_idempotent_and_fifo() {
        let mut cache = ConformationCache::new(2);
        let a = cache.get_or_create(AlleleCounts::from_counts(vec![1, 0]));
        let b = cache.get_or_create(AlleleCounts::from_counts(vec![0, 1]));
        let again = cache.get_or_create(AlleleCounts::from_counts(vec![1, 0]));
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(cache.live(), 2);
        assert_eq!(cache.pop(), Some(a));
        assert_eq!(cache.pop(), Some(b));
        assert_eq!(cache.pop(), None);
        assert_eq!(cache.profile().created, 2);
    }

    #[test]
    fn lower_totals_pop_first() {
        let mut cache = ConformationCache::new(2);
        let three = cache.get_or_create(AlleleCounts::from_counts(vec![2, 1]));
        let two = cache.get_or_create(AlleleCounts::from_counts(vec![1, 1]));
        let also_three = cache.get_or_create(AlleleCounts::from_counts(vec![0, 3]));
        assert_eq!(cache.pop(), Some(two));
        assert_eq!(cache.pop(), Some(three));
        assert_eq!(cache.pop(), Some(also_three));
        assert_eq!(cache.pop(), None);
    }

    #[test]
    fn eviction_recycles_slots() {
        let gls = GenotypeLikelihoodMatrix::new(1, vec![vec![0.0, -1.0, -2.0]]).unwrap();
        let mut cache = ConformationCache::new(1);
        let zero = cache.get_or_create(AlleleCounts::zero(1));
        assert_eq!(cache.pop(), Some(zero));
        cache.get_mut(zero).compute_reference_only(&gls);
        cache.evict(zero);
        assert_eq!(cache.live(), 0);

        let next = cache.get_or_create(AlleleCounts::from_counts(vec![1]));
        assert_eq!(next, zero);
        assert_eq!(cache.get(next).phase(), Phase::Created);
        assert_eq!(cache.profile().slots_allocated, 1);
        assert_eq!(cache.profile().processed, 1);
    }

    #[test]
    fn pair_mut_in_both_orders() {
        let mut cache = ConformationCache::new(1);
        let a = cache.get_or_create(AlleleCounts::from_counts(vec![1]));
        let b = cache.get_or_create(AlleleCounts::from_counts(vec![2]));
        {
            let (src, dst) = cache.pair_mut(a, b);
            assert_eq!(src.counts().total(), 1);
            assert_eq!(dst.counts().total(), 2);
        }
        let (src, dst) = cache.pair_mut(b, a);
        assert_eq!(src.counts().total(), 2);
        assert_eq!(dst.counts().total(), 1);
    }
}
