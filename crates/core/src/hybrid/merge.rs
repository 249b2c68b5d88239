//! Sorted-merge intersection of a candidate batch with a filter iterator.
//!
//! Both streams advance in ascending docId. The filter side skips with
//! [`IndexIterator::skip_to`]; the batch side only moves forward one entry at a time.

use crate::error::IteratorError;
use crate::hybrid::topk::TopKSet;
use crate::iterator::IndexIterator;
use crate::result::{DistanceResult, DocId, HybridResult, IndexResult};
use crate::vector::QueryResult;
use std::cmp::Ordering;
use std::sync::Arc;

/// Sequential cursor over one docId-ordered batch of vector candidates.
#[derive(Debug)]
pub struct BatchCursor {
    results: std::vec::IntoIter<QueryResult>,
}

impl BatchCursor {
    pub fn new(batch: Vec<QueryResult>) -> Self {
        debug_assert!(batch.windows(2).all(|w| w[0].id <= w[1].id));
        Self {
            results: batch.into_iter(),
        }
    }

    pub fn read(&mut self) -> Option<QueryResult> {
        self.results.next()
    }

    /// Reads forward to the first candidate with `id >= target`.
    pub fn skip_to(&mut self, target: DocId) -> Option<QueryResult> {
        self.results.find(|r| r.id >= target)
    }

    /// Candidates not yet read.
    pub fn remaining(&self) -> usize {
        self.results.len()
    }
}

/// Counters for one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Documents present in both streams.
    pub matches: usize,
    /// Matches admitted into the top-k set.
    pub accepted: usize,
}

/// Intersects `batch` with `filter`, offering every common document to `top`.
///
/// `filter` is read from its current position; callers rewind it between batches.
/// The pass ends as soon as either stream is exhausted.
pub fn merge_intersect(
    filter: &mut dyn IndexIterator,
    batch: &mut BatchCursor,
    top: &mut TopKSet,
    score_field: &Option<Arc<str>>,
) -> Result<MergeStats, IteratorError> {
    let mut stats = MergeStats::default();
    let mut filter_id = filter.read()?.map(IndexResult::doc_id);
    let mut candidate = batch.read();

    while let (Some(fid), Some(cand)) = (filter_id, candidate) {
        match fid.cmp(&cand.id) {
            Ordering::Equal => {
                stats.matches += 1;
                if top.would_accept(cand.score) {
                    // The filter owns its current result; copy it only once it is kept.
                    if let Some(filter_result) = filter.current().cloned() {
                        let vector = DistanceResult {
                            doc_id: cand.id,
                            distance: cand.score,
                            score_field: score_field.clone(),
                        };
                        top.insert(HybridResult::new(vector, filter_result));
                        stats.accepted += 1;
                    }
                }
                filter_id = filter.read()?.map(IndexResult::doc_id);
                candidate = batch.read();
            }
            Ordering::Less => {
                // Found or not, the landed position is the next comparison baseline.
                filter_id = filter.skip_to(cand.id)?.map(|o| o.result().doc_id());
            }
            Ordering::Greater => {
                candidate = batch.skip_to(fid);
            }
        }
    }
    Ok(stats)
}
