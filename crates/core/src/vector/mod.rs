//! Vector index contract consumed by the hybrid iterator, plus two implementations.
//!
//! [`VectorIndex`] exposes a one-shot top-k query and an incremental
//! [`BatchIterator`]. [`FlatIndex`] answers exactly by exhaustive scan;
//! [`HnswIndex`] answers approximately through an HNSW graph.

/// Distance metrics: cosine, euclidean, and dot product.
pub mod distance;
/// Exhaustive (brute-force) vector index.
pub mod flat;
/// HNSW approximate nearest neighbor index with incremental batch iteration.
pub mod hnsw;

pub use distance::DistanceMetric;
pub use flat::FlatIndex;
pub use hnsw::{HnswConfig, HnswIndex};

use crate::query::{QueryParams, QueryResultOrder};
use crate::result::DocId;
use std::cmp::Ordering;

/// A candidate produced by a vector index: document id and distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryResult {
    pub id: DocId,
    /// Distance to the query. Lower = more similar.
    pub score: f32,
}

impl QueryResult {
    pub fn new(id: DocId, score: f32) -> Self {
        Self { id, score }
    }
}

/// Read-only vector index capabilities used by hybrid search.
///
/// Implementations must tolerate concurrent readers; the hybrid iterator only
/// ever takes shared references.
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    /// Number of indexed vectors.
    fn index_size(&self) -> usize;

    /// At most `k` nearest results, ordered per `order`.
    fn top_k_query(
        &self,
        query: &[f32],
        k: usize,
        params: &QueryParams,
        order: QueryResultOrder,
    ) -> Vec<QueryResult>;

    /// Starts an incremental search that hands out successive nearest candidates.
    fn batch_iterator<'a>(
        &'a self,
        query: &[f32],
        params: &QueryParams,
    ) -> Box<dyn BatchIterator + 'a>;

    /// Exact distance between `query` and the stored vector of `id`, if indexed.
    fn distance_to(&self, id: DocId, query: &[f32]) -> Option<f32>;
}

/// Incremental nearest-neighbor search.
///
/// Each batch holds the next-best unseen candidates by distance; no id is
/// returned twice between resets.
pub trait BatchIterator {
    fn has_next(&self) -> bool;

    /// Up to `batch_size` further candidates, ordered per `order`.
    fn next_batch(&mut self, batch_size: usize, order: QueryResultOrder) -> Vec<QueryResult>;

    /// Restarts the search from the best candidate.
    fn reset(&mut self);
}

/// By ascending distance, ties broken by ascending id.
pub fn cmp_by_score(a: &QueryResult, b: &QueryResult) -> Ordering {
    a.score.total_cmp(&b.score).then_with(|| a.id.cmp(&b.id))
}

pub fn cmp_by_id(a: &QueryResult, b: &QueryResult) -> Ordering {
    a.id.cmp(&b.id)
}

/// Sorts a result list in place per `order`.
pub fn sort_results(results: &mut [QueryResult], order: QueryResultOrder) {
    match order {
        QueryResultOrder::ByScore => results.sort_unstable_by(cmp_by_score),
        QueryResultOrder::ById => results.sort_unstable_by(cmp_by_id),
    }
}
