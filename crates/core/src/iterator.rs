//! The pull-iterator capability set shared by every query-plan node.
//!
//! Filter iterators (id lists, metadata predicates) and the hybrid vector
//! iterator all implement [`IndexIterator`]. Results are borrowed from the
//! iterator and stay valid until its next mutating call.

use crate::error::IteratorError;
use crate::result::{DocId, IndexResult};

/// Identifies the concrete iterator behind a `dyn IndexIterator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorKind {
    IdList,
    Metadata,
    Hybrid,
}

/// Outcome of a successful [`IndexIterator::skip_to`].
#[derive(Debug)]
pub enum SkipToOutcome<'a> {
    /// The iterator landed exactly on the requested id.
    Found(&'a IndexResult),
    /// The requested id is absent; the iterator is positioned on the next larger id.
    NotFound(&'a IndexResult),
}

impl<'a> SkipToOutcome<'a> {
    /// The result the iterator is now positioned on.
    pub fn result(&self) -> &'a IndexResult {
        match self {
            SkipToOutcome::Found(r) | SkipToOutcome::NotFound(r) => r,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SkipToOutcome::Found(_))
    }
}

/// Generic pull-based result producer.
///
/// `read` and `skip_to` return `Ok(None)` at end of stream. Once exhausted or
/// aborted an iterator stays invalid until [`rewind`](IndexIterator::rewind).
pub trait IndexIterator {
    /// Advances by one result.
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError>;

    /// Advances to the first result with `doc_id >= target`.
    fn skip_to(&mut self, target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError>;

    /// The result the iterator is positioned on, if any.
    fn current(&self) -> Option<&IndexResult>;

    /// Resets the iterator to its initial state.
    fn rewind(&mut self);

    /// Marks the iterator invalid without releasing anything.
    fn abort(&mut self);

    fn has_next(&self) -> bool;

    /// Estimated number of results. Used for planning; not guaranteed exact.
    fn num_estimated(&self) -> usize;

    /// Id of the most recently returned result, `0` before the first read.
    fn last_doc_id(&self) -> DocId;

    fn kind(&self) -> IteratorKind;

    /// Whether results are emitted in ascending docId order.
    fn sorted_by_id(&self) -> bool {
        true
    }
}

impl<I: IndexIterator + ?Sized> IndexIterator for Box<I> {
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError> {
        (**self).read()
    }

    fn skip_to(&mut self, target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError> {
        (**self).skip_to(target)
    }

    fn current(&self) -> Option<&IndexResult> {
        (**self).current()
    }

    fn rewind(&mut self) {
        (**self).rewind()
    }

    fn abort(&mut self) {
        (**self).abort()
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn num_estimated(&self) -> usize {
        (**self).num_estimated()
    }

    fn last_doc_id(&self) -> DocId {
        (**self).last_doc_id()
    }

    fn kind(&self) -> IteratorKind {
        (**self).kind()
    }

    fn sorted_by_id(&self) -> bool {
        (**self).sorted_by_id()
    }
}
