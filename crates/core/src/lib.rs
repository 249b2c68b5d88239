//! # hybridknn-core
//!
//! Filtered top-k vector search: an iterator that combines an approximate
//! nearest neighbor query with a docId-ordered filter stream and yields the k
//! closest documents the filter accepts.
//!
//! The crate also ships the collaborators the iterator runs against: a flat and
//! an HNSW vector index with incremental batch search, and id-list and metadata
//! filter iterators.

/// Global configuration constants: limits, defaults, and tuning thresholds.
pub mod config;
/// Error types for construction, iteration, and indexing.
pub mod error;
/// Filter iterators: explicit id lists and metadata predicates.
pub mod filter;
/// Hybrid top-k search: bounded result set, merge-intersect, mode selection, and the iterator.
pub mod hybrid;
/// The `IndexIterator` capability trait shared by every query-plan node.
pub mod iterator;
/// Query descriptors and per-query runtime parameters.
pub mod query;
/// Result types: distance, hybrid, and docId-only results.
pub mod result;
/// Vector index contract, distance metrics, and the flat and HNSW indexes.
pub mod vector;

pub use error::{HybridError, IndexError, IteratorError};
pub use hybrid::{HybridIterator, SearchMode, SearchPolicy};
pub use iterator::{IndexIterator, IteratorKind, SkipToOutcome};
pub use query::{HybridPolicy, QueryParams, QueryResultOrder, TopKQuery};
pub use result::{DistanceResult, DocId, HybridResult, IndexResult};
pub use vector::{BatchIterator, DistanceMetric, FlatIndex, HnswIndex, QueryResult, VectorIndex};
