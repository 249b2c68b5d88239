//! Query descriptors and runtime parameters.
//!
//! All types deserialize from JSON so a planner can forward per-query settings
//! without translating them.

use serde::{Deserialize, Serialize};

/// Ordering of a vector query's result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResultOrder {
    /// Ascending distance (closest first).
    #[default]
    ByScore,
    /// Ascending document id.
    ById,
}

/// Strategy override for filtered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridPolicy {
    /// Let the [`SearchPolicy`](crate::hybrid::SearchPolicy) heuristic decide.
    #[default]
    Auto,
    /// Always scan the filter exhaustively and score each match.
    ForceAdhocBf,
    /// Always pull candidate batches from the vector index.
    ForceBatches,
}

/// Per-query runtime parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// HNSW candidate list size for this query. `None` uses the index's `ef_search`.
    #[serde(default)]
    pub ef_runtime: Option<usize>,
    /// Strategy override applied when a filter iterator is present.
    #[serde(default)]
    pub hybrid_policy: HybridPolicy,
    /// Fixed batch size for the batched strategy. `None` defers to the batch-size heuristic.
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// A top-k vector query: the query vector, the number of results, and their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKQuery {
    pub vector: Vec<f32>,
    pub k: usize,
    #[serde(default)]
    pub order: QueryResultOrder,
}

impl TopKQuery {
    /// Creates a query ordered by ascending distance.
    pub fn new(vector: Vec<f32>, k: usize) -> Self {
        Self {
            vector,
            k,
            order: QueryResultOrder::ByScore,
        }
    }

    /// Returns the same query with a different result order.
    pub fn with_order(mut self, order: QueryResultOrder) -> Self {
        self.order = order;
        self
    }
}
