#![allow(dead_code)]

use hybridknn_core::error::IteratorError;
use hybridknn_core::query::{QueryParams, QueryResultOrder};
use hybridknn_core::vector::{sort_results, BatchIterator, QueryResult, VectorIndex};
use hybridknn_core::{DocId, IndexIterator, IndexResult, IteratorKind, SkipToOutcome};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A one-dimensional index whose distances are fixed per document, whatever the query.
pub struct ScriptedIndex {
    distances: BTreeMap<DocId, f32>,
}

impl ScriptedIndex {
    pub fn new(distances: &[(DocId, f32)]) -> Self {
        Self {
            distances: distances.iter().copied().collect(),
        }
    }

    /// All documents ranked by ascending distance, ties by id.
    fn ranked(&self) -> Vec<QueryResult> {
        let mut all: Vec<QueryResult> = self
            .distances
            .iter()
            .map(|(&id, &d)| QueryResult::new(id, d))
            .collect();
        sort_results(&mut all, QueryResultOrder::ByScore);
        all
    }
}

impl VectorIndex for ScriptedIndex {
    fn dimension(&self) -> usize {
        1
    }

    fn index_size(&self) -> usize {
        self.distances.len()
    }

    fn top_k_query(
        &self,
        _query: &[f32],
        k: usize,
        _params: &QueryParams,
        order: QueryResultOrder,
    ) -> Vec<QueryResult> {
        let mut results = self.ranked();
        results.truncate(k);
        sort_results(&mut results, order);
        results
    }

    fn batch_iterator<'a>(
        &'a self,
        _query: &[f32],
        _params: &QueryParams,
    ) -> Box<dyn BatchIterator + 'a> {
        Box::new(ScriptedBatches {
            ranked: self.ranked(),
            offset: 0,
        })
    }

    fn distance_to(&self, id: DocId, _query: &[f32]) -> Option<f32> {
        self.distances.get(&id).copied()
    }
}

struct ScriptedBatches {
    ranked: Vec<QueryResult>,
    offset: usize,
}

impl BatchIterator for ScriptedBatches {
    fn has_next(&self) -> bool {
        self.offset < self.ranked.len()
    }

    fn next_batch(&mut self, batch_size: usize, order: QueryResultOrder) -> Vec<QueryResult> {
        let end = (self.offset + batch_size).min(self.ranked.len());
        let mut batch = self.ranked[self.offset..end].to_vec();
        self.offset = end;
        sort_results(&mut batch, order);
        batch
    }

    fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Wraps a filter iterator and counts how often it is dropped and rewound.
pub struct Tracked<I> {
    inner: I,
    drops: Arc<AtomicUsize>,
    rewinds: Arc<AtomicUsize>,
}

#[derive(Clone, Default)]
pub struct Counters {
    pub drops: Arc<AtomicUsize>,
    pub rewinds: Arc<AtomicUsize>,
}

impl Counters {
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn rewinds(&self) -> usize {
        self.rewinds.load(Ordering::SeqCst)
    }
}

impl<I: IndexIterator> Tracked<I> {
    pub fn new(inner: I) -> (Self, Counters) {
        let counters = Counters::default();
        let tracked = Self {
            inner,
            drops: Arc::clone(&counters.drops),
            rewinds: Arc::clone(&counters.rewinds),
        };
        (tracked, counters)
    }
}

impl<I> Drop for Tracked<I> {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl<I: IndexIterator> IndexIterator for Tracked<I> {
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError> {
        self.inner.read()
    }

    fn skip_to(&mut self, target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError> {
        self.inner.skip_to(target)
    }

    fn current(&self) -> Option<&IndexResult> {
        self.inner.current()
    }

    fn rewind(&mut self) {
        self.rewinds.fetch_add(1, Ordering::SeqCst);
        self.inner.rewind()
    }

    fn abort(&mut self) {
        self.inner.abort()
    }

    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn num_estimated(&self) -> usize {
        self.inner.num_estimated()
    }

    fn last_doc_id(&self) -> DocId {
        self.inner.last_doc_id()
    }

    fn kind(&self) -> IteratorKind {
        self.inner.kind()
    }
}

/// Reads `it` to end of stream, returning `(doc_id, distance)` pairs in read order.
pub fn drain(it: &mut dyn IndexIterator) -> Vec<(DocId, f32)> {
    let mut out = Vec::new();
    while let Some(r) = it.read().expect("read failed") {
        out.push((r.doc_id(), r.distance().unwrap_or(f32::NAN)));
    }
    out
}

/// Same pairs sorted by id, for order-insensitive comparison.
pub fn drain_sorted(it: &mut dyn IndexIterator) -> Vec<(DocId, f32)> {
    let mut out = drain(it);
    out.sort_by_key(|&(id, _)| id);
    out
}
