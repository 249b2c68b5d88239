//! Fixed-capacity set retaining the k best hybrid matches.

use crate::result::{DocId, HybridResult};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered by `(distance, doc_id)`, so the max-heap root is the worst match.
#[derive(Debug)]
struct Ranked(HybridResult);

impl Ranked {
    fn key(&self) -> (OrderedFloat<f32>, DocId) {
        (OrderedFloat(self.0.distance()), self.0.doc_id())
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Bounded max-heap of [`HybridResult`]s keyed by distance.
///
/// Holds at most `capacity` entries. Once full, a candidate is admitted only if
/// its distance is strictly below the current worst, which is evicted to make room.
#[derive(Debug)]
pub struct TopKSet {
    heap: BinaryHeap<Ranked>,
    capacity: usize,
}

impl TopKSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Distance of the worst retained entry.
    pub fn worst_distance(&self) -> Option<f32> {
        self.heap.peek().map(|r| r.0.distance())
    }

    /// Pruning threshold: the worst retained distance once full, `+inf` before.
    pub fn upper_bound(&self) -> f32 {
        if self.is_full() {
            self.worst_distance().unwrap_or(f32::INFINITY)
        } else {
            f32::INFINITY
        }
    }

    /// Whether a match at `distance` would be admitted. NaN is never admitted.
    #[inline]
    pub fn would_accept(&self, distance: f32) -> bool {
        self.capacity > 0
            && !distance.is_nan()
            && (!self.is_full() || distance < self.upper_bound())
    }

    /// Inserts `result` if it improves the set. Returns the evicted entry, or
    /// `result` itself when it was rejected.
    pub fn insert(&mut self, result: HybridResult) -> Option<HybridResult> {
        if !self.would_accept(result.distance()) {
            return Some(result);
        }
        let evicted = if self.is_full() {
            self.heap.pop().map(|r| r.0)
        } else {
            None
        };
        self.heap.push(Ranked(result));
        evicted
    }

    /// Removes and returns the worst retained entry.
    pub fn pop(&mut self) -> Option<HybridResult> {
        self.heap.pop().map(|r| r.0)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Drains the set into a vector ordered by ascending distance.
    pub fn into_sorted_vec(self) -> Vec<HybridResult> {
        self.heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
    }
}
