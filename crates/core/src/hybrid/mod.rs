//! Hybrid vector + filter top-k search.
//!
//! [`HybridIterator`] is the entry point. [`TopKSet`] holds the bounded result
//! set, [`merge_intersect`] joins candidate batches with a filter stream, and
//! [`SearchPolicy`] carries the strategy heuristics.

/// The hybrid top-k iterator.
pub mod iterator;
/// Sorted-merge intersection of candidate batches and filter streams.
pub mod merge;
/// Search mode selection and pluggable policies.
pub mod mode;
/// Bounded k-best result set.
pub mod topk;

pub use iterator::{HybridIterator, PrepareStats};
pub use merge::{merge_intersect, BatchCursor, MergeStats};
pub use mode::{
    batch_size_k, never_adhoc, proportional_batch_size, select_mode, selectivity_ratio,
    BatchSizeInput, SearchMode, SearchPolicy, SelectivityEstimate,
};
pub use topk::TopKSet;
