//! The hybrid top-k iterator.
//!
//! Combines a vector top-k query with an optional docId-ordered filter iterator
//! and serves at most k results through the [`IndexIterator`] capability set.
//! Work happens lazily on the first [`read`](IndexIterator::read).
//!
//! # Modes
//!
//! - [`SearchMode::StandardKnn`]: results stream straight from the index's top-k list.
//! - [`SearchMode::HybridBatches`]: id-ordered candidate batches are merged against
//!   the filter until k matches are held or the index runs out of candidates.
//! - [`SearchMode::HybridAdhocBf`]: the filter is scanned to exhaustion and every
//!   match is scored exactly.
//!
//! Hybrid results come out worst-first (popped from a max-heap); callers that
//! need best-first order re-sort.

use crate::config;
use crate::error::{HybridError, IteratorError};
use crate::hybrid::merge::{merge_intersect, BatchCursor};
use crate::hybrid::mode::{select_mode, BatchSizeInput, SearchMode, SearchPolicy};
use crate::hybrid::topk::TopKSet;
use crate::iterator::{IndexIterator, IteratorKind, SkipToOutcome};
use crate::query::{QueryParams, QueryResultOrder, TopKQuery};
use crate::result::{DistanceResult, DocId, HybridResult, IndexResult};
use crate::vector::{QueryResult, VectorIndex};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Counters collected while preparing results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrepareStats {
    /// Candidate batches pulled from the vector index.
    pub batches: usize,
    /// Documents accepted by the filter and scored (ad-hoc) or present in a batch (batches).
    pub matches: usize,
    /// Matches admitted into the top-k set, including ones later evicted.
    pub accepted: usize,
}

/// Top-k vector search restricted to the documents of an optional filter iterator.
pub struct HybridIterator<'index> {
    index: &'index dyn VectorIndex,
    query: TopKQuery,
    params: QueryParams,
    policy: SearchPolicy,
    score_field: Option<Arc<str>>,
    child: Option<Box<dyn IndexIterator + 'index>>,
    mode: SearchMode,

    results_prepared: bool,
    is_valid: bool,
    last_doc_id: DocId,

    /// StandardKnn only: remaining top-k results.
    knn_results: Option<std::vec::IntoIter<QueryResult>>,
    /// StandardKnn only: the result handed out by the last read.
    current: Option<IndexResult>,
    /// Hybrid modes only.
    top_results: Option<TopKSet>,
    /// Hybrid results handed out since the last rewind, in read order.
    returned: Vec<IndexResult>,
    stats: PrepareStats,
}

impl<'index> HybridIterator<'index> {
    /// Creates an iterator with the default [`SearchPolicy`].
    pub fn new(
        index: &'index dyn VectorIndex,
        query: TopKQuery,
        params: QueryParams,
        score_field: Option<Arc<str>>,
        child: Option<Box<dyn IndexIterator + 'index>>,
    ) -> Result<Self, HybridError> {
        Self::with_policy(index, query, params, score_field, child, SearchPolicy::default())
    }

    pub fn with_policy(
        index: &'index dyn VectorIndex,
        query: TopKQuery,
        params: QueryParams,
        score_field: Option<Arc<str>>,
        child: Option<Box<dyn IndexIterator + 'index>>,
        policy: SearchPolicy,
    ) -> Result<Self, HybridError> {
        if query.vector.len() != index.dimension() {
            return Err(HybridError::DimensionMismatch {
                expected: index.dimension(),
                actual: query.vector.len(),
            });
        }
        if query.vector.iter().any(|x| !x.is_finite()) {
            return Err(HybridError::NonFiniteQuery);
        }
        if query.k == 0 || query.k > config::MAX_K {
            return Err(HybridError::InvalidK {
                k: query.k,
                max: config::MAX_K,
            });
        }

        let mode = select_mode(child.as_deref(), index.index_size(), query.k, &params, &policy);
        let (top_results, returned) = if mode.is_hybrid() {
            (Some(TopKSet::new(query.k)), Vec::with_capacity(query.k))
        } else {
            (None, Vec::new())
        };

        Ok(Self {
            index,
            query,
            params,
            policy,
            score_field,
            child,
            mode,
            results_prepared: false,
            is_valid: true,
            last_doc_id: 0,
            knn_results: None,
            current: None,
            top_results,
            returned,
            stats: PrepareStats::default(),
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn k(&self) -> usize {
        self.query.k
    }

    pub fn score_field(&self) -> Option<&str> {
        self.score_field.as_deref()
    }

    pub fn prepare_stats(&self) -> PrepareStats {
        self.stats
    }

    /// Hybrid results handed out since the last rewind. Always empty in StandardKnn mode.
    pub fn returned_results(&self) -> &[IndexResult] {
        &self.returned
    }

    pub fn child(&self) -> Option<&(dyn IndexIterator + 'index)> {
        self.child.as_deref()
    }

    fn eof(&mut self) {
        self.is_valid = false;
        self.current = None;
    }

    fn prepare(&mut self) -> Result<(), IteratorError> {
        match self.mode {
            SearchMode::StandardKnn => {
                let results = self.index.top_k_query(
                    &self.query.vector,
                    self.query.k,
                    &self.params,
                    self.query.order,
                );
                debug!(k = self.query.k, found = results.len(), "prepared knn results");
                self.knn_results = Some(results.into_iter());
            }
            SearchMode::HybridAdhocBf => self.prepare_adhoc()?,
            SearchMode::HybridBatches => self.prepare_batches()?,
        }
        if self.mode.is_hybrid() {
            debug!(
                mode = ?self.mode,
                batches = self.stats.batches,
                matches = self.stats.matches,
                accepted = self.stats.accepted,
                held = self.top_results.as_ref().map_or(0, TopKSet::len),
                "prepared hybrid results"
            );
        }
        Ok(())
    }

    /// Scores every filter match exactly and keeps the k best.
    fn prepare_adhoc(&mut self) -> Result<(), IteratorError> {
        let (Some(child), Some(top)) = (self.child.as_mut(), self.top_results.as_mut()) else {
            return Ok(());
        };
        child.rewind();
        while let Some(filter_result) = child.read()? {
            let doc_id = filter_result.doc_id();
            let Some(distance) = self.index.distance_to(doc_id, &self.query.vector) else {
                trace!(doc_id, "filter match has no vector, skipping");
                continue;
            };
            self.stats.matches += 1;
            if top.would_accept(distance) {
                let vector = DistanceResult {
                    doc_id,
                    distance,
                    score_field: self.score_field.clone(),
                };
                top.insert(HybridResult::new(vector, filter_result.clone()));
                self.stats.accepted += 1;
            }
        }
        Ok(())
    }

    /// Merges id-ordered candidate batches against the filter until k matches are held.
    fn prepare_batches(&mut self) -> Result<(), IteratorError> {
        let (Some(child), Some(top)) = (self.child.as_mut(), self.top_results.as_mut()) else {
            return Ok(());
        };
        let index = self.index;
        let index_size = index.index_size();
        let filter_estimate = child.num_estimated();
        let mut batches = index.batch_iterator(&self.query.vector, &self.params);

        while !top.is_full() && batches.has_next() {
            let input = BatchSizeInput {
                k: self.query.k,
                index_size,
                filter_estimate,
                accepted: top.len(),
                batches_issued: self.stats.batches,
            };
            let batch_size = self
                .params
                .batch_size
                .unwrap_or_else(|| (self.policy.batch_size)(&input))
                .max(1);
            let batch = batches.next_batch(batch_size, QueryResultOrder::ById);
            if batch.is_empty() {
                break;
            }
            self.stats.batches += 1;

            child.rewind();
            let mut cursor = BatchCursor::new(batch);
            let merged = merge_intersect(&mut **child, &mut cursor, top, &self.score_field)?;
            self.stats.matches += merged.matches;
            self.stats.accepted += merged.accepted;
            trace!(
                batch = self.stats.batches,
                batch_size,
                matches = merged.matches,
                accepted = merged.accepted,
                held = top.len(),
                upper_bound = top.upper_bound(),
                "merged candidate batch"
            );
        }
        Ok(())
    }
}

impl IndexIterator for HybridIterator<'_> {
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError> {
        if !self.is_valid {
            return Ok(None);
        }
        if !self.results_prepared {
            self.results_prepared = true;
            if let Err(err) = self.prepare() {
                self.eof();
                return Err(err);
            }
        }

        if self.mode == SearchMode::StandardKnn {
            let Some(next) = self.knn_results.as_mut().and_then(|it| it.next()) else {
                self.eof();
                return Ok(None);
            };
            self.last_doc_id = next.id;
            self.current = Some(IndexResult::Distance(DistanceResult {
                doc_id: next.id,
                distance: next.score,
                score_field: self.score_field.clone(),
            }));
            return Ok(self.current.as_ref());
        }

        let Some(next) = self.top_results.as_mut().and_then(TopKSet::pop) else {
            self.eof();
            return Ok(None);
        };
        self.last_doc_id = next.doc_id();
        self.returned.push(IndexResult::Hybrid(next));
        Ok(self.returned.last())
    }

    fn skip_to(&mut self, _target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError> {
        Err(IteratorError::SkipToUnsupported(IteratorKind::Hybrid))
    }

    fn current(&self) -> Option<&IndexResult> {
        if !self.is_valid || !self.results_prepared {
            return None;
        }
        match self.mode {
            SearchMode::StandardKnn => self.current.as_ref(),
            _ => self.returned.last(),
        }
    }

    fn rewind(&mut self) {
        self.results_prepared = false;
        self.is_valid = true;
        self.last_doc_id = 0;
        self.knn_results = None;
        self.current = None;
        if let Some(top) = self.top_results.as_mut() {
            top.clear();
        }
        self.returned.clear();
        self.stats = PrepareStats::default();
        if let Some(child) = self.child.as_mut() {
            child.rewind();
        }
    }

    fn abort(&mut self) {
        self.is_valid = false;
    }

    fn has_next(&self) -> bool {
        self.is_valid
    }

    fn num_estimated(&self) -> usize {
        let estimate = self.query.k.min(self.index.index_size());
        match &self.child {
            Some(child) => estimate.min(child.num_estimated()),
            None => estimate,
        }
    }

    fn last_doc_id(&self) -> DocId {
        self.last_doc_id
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::Hybrid
    }

    fn sorted_by_id(&self) -> bool {
        false
    }
}
