//! Global configuration constants for hybridknn.
//!
//! Query limits, HNSW defaults, and the tuning thresholds used by the hybrid
//! search policies. These are compile-time constants; per-query overrides are
//! carried by [`QueryParams`](crate::query::QueryParams).

/// Maximum number of results (`k`) per top-k query.
pub const MAX_K: usize = 10_000;

/// Maximum allowed embedding dimension.
pub const MAX_DIMENSION: usize = 4096;

/// Default number of bidirectional links per HNSW node.
///
/// Higher values improve recall but increase memory and build time.
/// Typical range: 8–64. Default: 16.
pub const HNSW_DEFAULT_M: usize = 16;

/// Default ef parameter during HNSW index construction.
pub const HNSW_DEFAULT_EF_CONSTRUCTION: usize = 200;

/// Default ef parameter during HNSW search.
///
/// Controls the size of the dynamic candidate list during query.
/// Overridden per query by `QueryParams::ef_runtime`.
pub const HNSW_DEFAULT_EF_SEARCH: usize = 50;

/// Maximum number of layers in the HNSW graph.
pub const HNSW_DEFAULT_MAX_LAYERS: usize = 16;

/// Filter selectivity below which [`selectivity_ratio`](crate::hybrid::selectivity_ratio)
/// prefers the ad-hoc brute-force strategy.
///
/// Expressed as a fraction of the vector index size: a filter estimated to
/// accept fewer than `5%` of the indexed documents is scanned exhaustively.
pub const ADHOC_SELECTIVITY_RATIO: f64 = 0.05;

/// Upper bound on the batch size produced by
/// [`proportional_batch_size`](crate::hybrid::proportional_batch_size), as a multiple of `k`.
pub const MAX_BATCH_SIZE_FACTOR: usize = 64;

/// Growth factor applied to `ef` by the HNSW batch iterator when a search
/// round yields too few unseen candidates.
pub const HNSW_BATCH_EF_GROWTH: usize = 2;
