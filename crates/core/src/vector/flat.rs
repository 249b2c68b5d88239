//! Exhaustive vector index.
//!
//! Stores vectors contiguously in an arena and scores every one of them per
//! query. Exact, and the reference the HNSW index is measured against.

use crate::config;
use crate::error::IndexError;
use crate::query::{QueryParams, QueryResultOrder};
use crate::result::DocId;
use crate::vector::{sort_results, BatchIterator, DistanceMetric, QueryResult, VectorIndex};
use ordered_float::OrderedFloat;
use std::collections::{BinaryHeap, HashMap};

/// Brute-force index over f32 vectors keyed by [`DocId`].
#[derive(Debug, Clone)]
pub struct FlatIndex {
    metric: DistanceMetric,
    dimension: usize,
    /// Arena: `ids.len() * dimension` floats.
    vectors: Vec<f32>,
    ids: Vec<DocId>,
    positions: HashMap<DocId, usize>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            metric,
            dimension,
            vectors: Vec::new(),
            ids: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn add(&mut self, id: DocId, vector: &[f32]) -> Result<(), IndexError> {
        if self.dimension > config::MAX_DIMENSION {
            return Err(IndexError::DimensionTooLarge(self.dimension));
        }
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(IndexError::NonFiniteVector);
        }
        if self.positions.contains_key(&id) {
            return Err(IndexError::DuplicateId(id));
        }
        self.positions.insert(id, self.ids.len());
        self.ids.push(id);
        self.vectors.extend_from_slice(vector);
        Ok(())
    }

    #[inline]
    fn vector_at(&self, pos: usize) -> &[f32] {
        let start = pos * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    fn score_all(&self, query: &[f32]) -> Vec<QueryResult> {
        self.ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| QueryResult::new(id, self.metric.distance(query, self.vector_at(pos))))
            .collect()
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn index_size(&self) -> usize {
        self.ids.len()
    }

    fn top_k_query(
        &self,
        query: &[f32],
        k: usize,
        _params: &QueryParams,
        order: QueryResultOrder,
    ) -> Vec<QueryResult> {
        if k == 0 {
            return Vec::new();
        }
        // Max-heap of size k keyed by (distance, id): the root is the worst kept result.
        let mut heap: BinaryHeap<(OrderedFloat<f32>, DocId)> = BinaryHeap::with_capacity(k + 1);
        for (pos, &id) in self.ids.iter().enumerate() {
            let dist = self.metric.distance(query, self.vector_at(pos));
            heap.push((OrderedFloat(dist), id));
            if heap.len() > k {
                heap.pop();
            }
        }
        let mut results: Vec<QueryResult> = heap
            .into_iter()
            .map(|(d, id)| QueryResult::new(id, d.0))
            .collect();
        sort_results(&mut results, order);
        results
    }

    fn batch_iterator<'a>(
        &'a self,
        query: &[f32],
        _params: &QueryParams,
    ) -> Box<dyn BatchIterator + 'a> {
        Box::new(FlatBatchIterator {
            index: self,
            query: query.to_vec(),
            ranked: Vec::new(),
            position: 0,
            computed: false,
        })
    }

    fn distance_to(&self, id: DocId, query: &[f32]) -> Option<f32> {
        let &pos = self.positions.get(&id)?;
        Some(self.metric.distance(query, self.vector_at(pos)))
    }
}

/// Scores the whole index on first use, then hands out consecutive slices.
struct FlatBatchIterator<'a> {
    index: &'a FlatIndex,
    query: Vec<f32>,
    /// Every candidate, ascending distance.
    ranked: Vec<QueryResult>,
    position: usize,
    computed: bool,
}

impl FlatBatchIterator<'_> {
    fn compute(&mut self) {
        if self.computed {
            return;
        }
        self.ranked = self.index.score_all(&self.query);
        sort_results(&mut self.ranked, QueryResultOrder::ByScore);
        self.computed = true;
    }
}

impl BatchIterator for FlatBatchIterator<'_> {
    fn has_next(&self) -> bool {
        if self.computed {
            self.position < self.ranked.len()
        } else {
            !self.index.is_empty()
        }
    }

    fn next_batch(&mut self, batch_size: usize, order: QueryResultOrder) -> Vec<QueryResult> {
        self.compute();
        let end = (self.position + batch_size).min(self.ranked.len());
        let mut batch = self.ranked[self.position..end].to_vec();
        self.position = end;
        sort_results(&mut batch, order);
        batch
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}
