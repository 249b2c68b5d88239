//! Incremental batch iteration over an HNSW index.
//!
//! Each batch re-runs the layer-0 search with an `ef` large enough to surface
//! unseen candidates, growing `ef` geometrically until the batch fills or the
//! search already covers the whole graph. The widest `ef` reached is kept for
//! later batches, so growth rounds are not repeated.
//!
//! Every batch searches at least `returned + batch_size` candidates, so draining
//! an index of `n` nodes costs roughly `n² / batch_size` distance evaluations.
//! Filters that accept only a handful of documents are cheaper in ad-hoc mode
//! (`HybridPolicy::ForceAdhocBf` or `SearchPolicy::adaptive()`), which scores
//! just the filter's matches.

use crate::config;
use crate::query::QueryResultOrder;
use crate::vector::hnsw::graph::HnswIndex;
use crate::vector::hnsw::search::knn_search;
use crate::vector::{sort_results, BatchIterator, QueryResult};
use std::collections::HashSet;

pub(crate) struct HnswBatchIterator<'a> {
    index: &'a HnswIndex,
    query: Vec<f32>,
    base_ef: usize,
    /// Widest `ef` any batch has needed so far.
    ef: usize,
    /// Nodes already handed out.
    returned: HashSet<u32>,
    exhausted: bool,
}

impl<'a> HnswBatchIterator<'a> {
    pub(crate) fn new(index: &'a HnswIndex, query: &[f32], base_ef: usize) -> Self {
        let base_ef = base_ef.max(1);
        Self {
            index,
            query: query.to_vec(),
            base_ef,
            ef: base_ef,
            returned: HashSet::new(),
            exhausted: index.is_empty(),
        }
    }
}

impl BatchIterator for HnswBatchIterator<'_> {
    fn has_next(&self) -> bool {
        !self.exhausted && self.returned.len() < self.index.len()
    }

    fn next_batch(&mut self, batch_size: usize, order: QueryResultOrder) -> Vec<QueryResult> {
        if !self.has_next() || batch_size == 0 {
            return Vec::new();
        }
        let total = self.index.len();
        let want = (self.returned.len() + batch_size).min(total);
        let mut ef = self.ef.max(want).min(total);

        let fresh: Vec<(f32, u32)> = loop {
            let fresh: Vec<(f32, u32)> = knn_search(self.index, &self.query, ef, ef)
                .into_iter()
                .filter(|(_, node)| !self.returned.contains(node))
                .take(batch_size)
                .collect();
            if fresh.len() >= batch_size || ef >= total {
                break fresh;
            }
            ef = (ef * config::HNSW_BATCH_EF_GROWTH).min(total);
        };
        self.ef = ef;

        if fresh.is_empty() {
            // A full-width search found nothing new: the rest of the graph is unreachable.
            self.exhausted = true;
            return Vec::new();
        }

        let mut batch: Vec<QueryResult> = fresh
            .into_iter()
            .map(|(dist, node)| {
                self.returned.insert(node);
                QueryResult::new(self.index.label(node), dist)
            })
            .collect();
        sort_results(&mut batch, order);
        batch
    }

    fn reset(&mut self) {
        self.returned.clear();
        self.ef = self.base_ef;
        self.exhausted = self.index.is_empty();
    }
}
