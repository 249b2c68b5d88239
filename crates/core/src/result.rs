//! Result types produced by iterators.
//!
//! Every iterator yields an [`IndexResult`]. Vector results carry a distance
//! (lower is better) and the score field that produced it; hybrid results pair
//! a vector result with an owned copy of the filter result for the same document.

use std::sync::Arc;

/// Per-document integer identifier shared by the vector index and filter iterators.
pub type DocId = u64;

/// A vector match: document id, distance to the query, and the vector field it was scored on.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceResult {
    pub doc_id: DocId,
    /// Distance to the query vector. Lower = more similar.
    pub distance: f32,
    /// Name of the vector field that produced `distance`, used by sorters when a
    /// query plan contains several vector fields.
    pub score_field: Option<Arc<str>>,
}

/// A document present in both the vector candidates and the filter stream.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridResult {
    pub vector: DistanceResult,
    /// The filter iterator's result for the same document, owned by this result.
    pub filter: Box<IndexResult>,
}

impl HybridResult {
    /// Pairs a vector match with the filter result for the same document.
    pub fn new(vector: DistanceResult, filter: IndexResult) -> Self {
        debug_assert_eq!(vector.doc_id, filter.doc_id());
        Self {
            vector,
            filter: Box::new(filter),
        }
    }

    #[inline]
    pub fn doc_id(&self) -> DocId {
        self.vector.doc_id
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.vector.distance
    }
}

/// A single result handed out by an [`IndexIterator`](crate::iterator::IndexIterator).
#[derive(Debug, Clone, PartialEq)]
pub enum IndexResult {
    /// A docId-only match (id lists, metadata predicates).
    Virtual(DocId),
    /// A pure vector match.
    Distance(DistanceResult),
    /// A vector match that also passed the filter.
    Hybrid(HybridResult),
}

impl IndexResult {
    #[inline]
    pub fn doc_id(&self) -> DocId {
        match self {
            IndexResult::Virtual(id) => *id,
            IndexResult::Distance(d) => d.doc_id,
            IndexResult::Hybrid(h) => h.doc_id(),
        }
    }

    /// Vector distance, if this result carries one.
    pub fn distance(&self) -> Option<f32> {
        match self {
            IndexResult::Virtual(_) => None,
            IndexResult::Distance(d) => Some(d.distance),
            IndexResult::Hybrid(h) => Some(h.distance()),
        }
    }

    /// Score field of the vector component, if any.
    pub fn score_field(&self) -> Option<&str> {
        match self {
            IndexResult::Virtual(_) => None,
            IndexResult::Distance(d) => d.score_field.as_deref(),
            IndexResult::Hybrid(h) => h.vector.score_field.as_deref(),
        }
    }

    pub fn as_hybrid(&self) -> Option<&HybridResult> {
        match self {
            IndexResult::Hybrid(h) => Some(h),
            _ => None,
        }
    }
}
