//! Hierarchical Navigable Small World (HNSW) approximate nearest neighbor index.
//!
//! Vectors are stored as raw f32 in a contiguous arena and addressed by dense
//! internal node ids; external [`DocId`] labels are mapped on the way in and out.
//! Besides one-shot KNN, the index supports incremental batch iteration, which
//! the hybrid iterator uses to pull candidates until enough pass the filter.

/// Incremental batch iteration with growing `ef`.
mod batch;
/// HNSW graph structure, configuration, and data storage.
pub mod graph;
/// HNSW insertion algorithm with bidirectional connections and heuristic pruning.
pub mod insert;
/// HNSW search: single-layer search and multi-layer KNN.
pub mod search;
/// Epoch-stamped visited set for graph traversal.
pub mod visited;

pub use graph::{HnswConfig, HnswIndex};
pub use search::knn_search;

use crate::query::{QueryParams, QueryResultOrder};
use crate::result::DocId;
use crate::vector::{sort_results, BatchIterator, QueryResult, VectorIndex};
use batch::HnswBatchIterator;

impl HnswIndex {
    fn ef_for(&self, params: &QueryParams) -> usize {
        params.ef_runtime.unwrap_or(self.config.ef_search)
    }
}

impl VectorIndex for HnswIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn index_size(&self) -> usize {
        self.len()
    }

    fn top_k_query(
        &self,
        query: &[f32],
        k: usize,
        params: &QueryParams,
        order: QueryResultOrder,
    ) -> Vec<QueryResult> {
        let mut results: Vec<QueryResult> = knn_search(self, query, k, self.ef_for(params))
            .into_iter()
            .map(|(dist, node)| QueryResult::new(self.label(node), dist))
            .collect();
        sort_results(&mut results, order);
        results
    }

    fn batch_iterator<'a>(
        &'a self,
        query: &[f32],
        params: &QueryParams,
    ) -> Box<dyn BatchIterator + 'a> {
        Box::new(HnswBatchIterator::new(self, query, self.ef_for(params)))
    }

    fn distance_to(&self, id: DocId, query: &[f32]) -> Option<f32> {
        let &node = self.label_to_node.get(&id)?;
        Some(self.distance_to_node(query, node))
    }
}
