//! Error types for hybrid search.
//!
//! End-of-stream is never an error: pull operations report it as `Ok(None)`.

use crate::iterator::IteratorKind;
use crate::result::DocId;
use thiserror::Error;

/// Errors raised while constructing a [`HybridIterator`](crate::hybrid::HybridIterator).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HybridError {
    #[error("query vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("k must be in 1..={max}, got {k}")]
    InvalidK { k: usize, max: usize },

    #[error("query vector contains NaN or infinite values")]
    NonFiniteQuery,
}

/// Errors raised by [`IndexIterator`](crate::iterator::IndexIterator) pull operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IteratorError {
    /// The iterator does not emit results in docId order, so positional skips are undefined.
    #[error("skip_to is not supported by {0:?} iterators")]
    SkipToUnsupported(IteratorKind),
}

/// Errors raised when adding vectors to an index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("document {0} is already indexed")]
    DuplicateId(DocId),

    #[error("vector contains NaN or infinite values")]
    NonFiniteVector,

    #[error("dimension {0} exceeds the maximum of {max}", max = crate::config::MAX_DIMENSION)]
    DimensionTooLarge(usize),
}
