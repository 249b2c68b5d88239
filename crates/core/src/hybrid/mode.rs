//! Strategy selection for hybrid queries.
//!
//! The mode is fixed at construction: no filter means a plain KNN stream; with a
//! filter, a [`SearchPolicy`] decides between an exhaustive scan of the filter
//! and batched merging against the vector index. [`HybridPolicy`] on the query
//! parameters can override the policy.

use crate::config;
use crate::iterator::IndexIterator;
use crate::query::{HybridPolicy, QueryParams};
use serde::Serialize;
use tracing::debug;

/// Execution strategy of a [`HybridIterator`](crate::hybrid::HybridIterator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// No filter: stream the index's top-k directly.
    StandardKnn,
    /// Score every document the filter yields and keep the k best.
    HybridAdhocBf,
    /// Pull id-ordered candidate batches and merge each against the filter.
    HybridBatches,
}

impl SearchMode {
    pub fn is_hybrid(self) -> bool {
        !matches!(self, SearchMode::StandardKnn)
    }
}

/// Inputs to the ad-hoc vs. batches decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectivityEstimate {
    /// The filter iterator's own cardinality estimate.
    pub filter_estimate: usize,
    pub index_size: usize,
    pub k: usize,
}

/// Inputs to the batch-size heuristic, refreshed before every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSizeInput {
    pub k: usize,
    pub index_size: usize,
    pub filter_estimate: usize,
    /// Entries currently held by the top-k set.
    pub accepted: usize,
    pub batches_issued: usize,
}

/// Pluggable heuristics consulted by the hybrid iterator.
#[derive(Debug, Clone, Copy)]
pub struct SearchPolicy {
    /// Returns `true` to scan the filter exhaustively instead of merging batches.
    pub prefer_adhoc: fn(&SelectivityEstimate) -> bool,
    /// Number of candidates to request in the next batch.
    pub batch_size: fn(&BatchSizeInput) -> usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            prefer_adhoc: never_adhoc,
            batch_size: batch_size_k,
        }
    }
}

impl SearchPolicy {
    /// Selectivity-driven mode choice with k-scaled batches.
    pub fn adaptive() -> Self {
        Self {
            prefer_adhoc: selectivity_ratio,
            batch_size: proportional_batch_size,
        }
    }
}

/// Always merge batches.
pub fn never_adhoc(_: &SelectivityEstimate) -> bool {
    false
}

/// Prefers the ad-hoc scan when the filter is estimated to accept fewer than
/// [`config::ADHOC_SELECTIVITY_RATIO`] of the index.
pub fn selectivity_ratio(estimate: &SelectivityEstimate) -> bool {
    (estimate.filter_estimate as f64) < config::ADHOC_SELECTIVITY_RATIO * estimate.index_size as f64
}

/// Every batch holds `k` candidates.
pub fn batch_size_k(input: &BatchSizeInput) -> usize {
    input.k
}

/// Scales `k` by the inverse filter selectivity, so a filter passing one
/// document in ten asks for `10 * k` candidates.
///
/// Clamped to `[k, index_size]` and to [`config::MAX_BATCH_SIZE_FACTOR`]` * k`.
pub fn proportional_batch_size(input: &BatchSizeInput) -> usize {
    let k = input.k.max(1);
    if input.filter_estimate == 0 || input.index_size <= k {
        return k;
    }
    let scaled = (k as u128 * input.index_size as u128 / input.filter_estimate as u128) as usize;
    let ceiling = input.index_size.min(k.saturating_mul(config::MAX_BATCH_SIZE_FACTOR));
    scaled.clamp(k, ceiling.max(k))
}

/// Chooses the execution mode for a query.
pub fn select_mode(
    child: Option<&dyn IndexIterator>,
    index_size: usize,
    k: usize,
    params: &QueryParams,
    policy: &SearchPolicy,
) -> SearchMode {
    let Some(child) = child else {
        return SearchMode::StandardKnn;
    };
    let estimate = SelectivityEstimate {
        filter_estimate: child.num_estimated(),
        index_size,
        k,
    };
    let mode = match params.hybrid_policy {
        HybridPolicy::ForceAdhocBf => SearchMode::HybridAdhocBf,
        HybridPolicy::ForceBatches => SearchMode::HybridBatches,
        HybridPolicy::Auto if (policy.prefer_adhoc)(&estimate) => SearchMode::HybridAdhocBf,
        HybridPolicy::Auto => SearchMode::HybridBatches,
    };
    debug!(
        ?mode,
        filter = ?child.kind(),
        filter_estimate = estimate.filter_estimate,
        index_size,
        k,
        "selected hybrid search mode"
    );
    mode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::IdListIterator;

    fn input(k: usize, index_size: usize, filter_estimate: usize) -> BatchSizeInput {
        BatchSizeInput {
            k,
            index_size,
            filter_estimate,
            accepted: 0,
            batches_issued: 0,
        }
    }

    #[test]
    fn test_no_filter_is_standard_knn() {
        let mode = select_mode(None, 100, 5, &QueryParams::default(), &SearchPolicy::default());
        assert_eq!(mode, SearchMode::StandardKnn);
        assert!(!mode.is_hybrid());
    }

    #[test]
    fn test_default_policy_always_batches() {
        let filter = IdListIterator::new(vec![1]);
        let mode = select_mode(
            Some(&filter),
            1_000_000,
            5,
            &QueryParams::default(),
            &SearchPolicy::default(),
        );
        assert_eq!(mode, SearchMode::HybridBatches);
    }

    #[test]
    fn test_adaptive_policy_prefers_adhoc_for_selective_filters() {
        let policy = SearchPolicy::adaptive();
        let params = QueryParams::default();
        let selective = IdListIterator::new(vec![1, 2, 3]);
        assert_eq!(
            select_mode(Some(&selective), 1000, 5, &params, &policy),
            SearchMode::HybridAdhocBf
        );
        let broad = IdListIterator::new((0..500).collect());
        assert_eq!(
            select_mode(Some(&broad), 1000, 5, &params, &policy),
            SearchMode::HybridBatches
        );
    }

    #[test]
    fn test_params_override_policy() {
        let filter = IdListIterator::new(vec![1, 2, 3]);
        let force_adhoc = QueryParams {
            hybrid_policy: HybridPolicy::ForceAdhocBf,
            ..QueryParams::default()
        };
        assert_eq!(
            select_mode(Some(&filter), 10, 1, &force_adhoc, &SearchPolicy::default()),
            SearchMode::HybridAdhocBf
        );
        let force_batches = QueryParams {
            hybrid_policy: HybridPolicy::ForceBatches,
            ..QueryParams::default()
        };
        assert_eq!(
            select_mode(Some(&filter), 1000, 1, &force_batches, &SearchPolicy::adaptive()),
            SearchMode::HybridBatches
        );
    }

    #[test]
    fn test_batch_size_k() {
        assert_eq!(batch_size_k(&input(7, 100, 3)), 7);
    }

    #[test]
    fn test_proportional_batch_size_scales_and_clamps() {
        // 10% selectivity: ten times k.
        assert_eq!(proportional_batch_size(&input(5, 1000, 100)), 50);
        // Never below k.
        assert_eq!(proportional_batch_size(&input(5, 1000, 1000)), 5);
        // Never above the index size.
        assert_eq!(proportional_batch_size(&input(20, 100, 1)), 100);
        // Never above the configured factor.
        let capped = proportional_batch_size(&input(2, 1_000_000, 1));
        assert_eq!(capped, 2 * config::MAX_BATCH_SIZE_FACTOR);
        // Unknown selectivity falls back to k.
        assert_eq!(proportional_batch_size(&input(4, 1000, 0)), 4);
    }
}
