//! Iterator over an explicit, sorted list of document ids.

use crate::error::IteratorError;
use crate::iterator::{IndexIterator, IteratorKind, SkipToOutcome};
use crate::result::{DocId, IndexResult};

/// Yields a fixed set of document ids in ascending order.
///
/// Input ids are sorted and de-duplicated on construction. `skip_to` binary-searches
/// the remaining suffix.
#[derive(Debug, Clone)]
pub struct IdListIterator {
    ids: Vec<DocId>,
    /// Index of the next id to hand out.
    offset: usize,
    current: Option<IndexResult>,
    last_doc_id: DocId,
    is_valid: bool,
}

impl IdListIterator {
    pub fn new(mut ids: Vec<DocId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        let is_valid = !ids.is_empty();
        Self {
            ids,
            offset: 0,
            current: None,
            last_doc_id: 0,
            is_valid,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn eof(&mut self) {
        self.is_valid = false;
        self.current = None;
    }

    fn land(&mut self, at: usize) -> DocId {
        let id = self.ids[at];
        self.offset = at + 1;
        self.last_doc_id = id;
        self.current = Some(IndexResult::Virtual(id));
        id
    }
}

impl IndexIterator for IdListIterator {
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError> {
        if !self.is_valid || self.offset >= self.ids.len() {
            self.eof();
            return Ok(None);
        }
        self.land(self.offset);
        Ok(self.current.as_ref())
    }

    fn skip_to(&mut self, target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError> {
        if !self.is_valid {
            return Ok(None);
        }
        let rest = &self.ids[self.offset..];
        let at = self.offset + rest.partition_point(|&id| id < target);
        if at >= self.ids.len() {
            self.eof();
            return Ok(None);
        }
        let landed = self.land(at);
        let Some(current) = self.current.as_ref() else {
            return Ok(None);
        };
        if landed == target {
            Ok(Some(SkipToOutcome::Found(current)))
        } else {
            Ok(Some(SkipToOutcome::NotFound(current)))
        }
    }

    fn current(&self) -> Option<&IndexResult> {
        self.current.as_ref()
    }

    fn rewind(&mut self) {
        self.offset = 0;
        self.current = None;
        self.last_doc_id = 0;
        self.is_valid = !self.ids.is_empty();
    }

    fn abort(&mut self) {
        self.is_valid = false;
    }

    fn has_next(&self) -> bool {
        self.is_valid
    }

    fn num_estimated(&self) -> usize {
        self.ids.len()
    }

    fn last_doc_id(&self) -> DocId {
        self.last_doc_id
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::IdList
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(it: &mut IdListIterator) -> Vec<DocId> {
        let mut out = Vec::new();
        while let Some(r) = it.read().unwrap() {
            out.push(r.doc_id());
        }
        out
    }

    #[test]
    fn test_reads_sorted_and_deduplicated() {
        let mut it = IdListIterator::new(vec![9, 3, 3, 1, 7]);
        assert_eq!(it.len(), 4);
        assert_eq!(drain(&mut it), vec![1, 3, 7, 9]);
        assert!(!it.has_next());
        assert!(it.read().unwrap().is_none());
    }

    #[test]
    fn test_skip_to_found_and_not_found() {
        let mut it = IdListIterator::new(vec![2, 4, 8, 16]);
        let outcome = it.skip_to(4).unwrap().unwrap();
        assert!(outcome.is_found());
        assert_eq!(outcome.result().doc_id(), 4);

        let outcome = it.skip_to(5).unwrap().unwrap();
        assert!(!outcome.is_found());
        assert_eq!(outcome.result().doc_id(), 8);
        assert_eq!(it.last_doc_id(), 8);

        // Next read continues after the landed position.
        assert_eq!(it.read().unwrap().map(IndexResult::doc_id), Some(16));
    }

    #[test]
    fn test_skip_past_end_is_eof() {
        let mut it = IdListIterator::new(vec![1, 2, 3]);
        assert!(it.skip_to(10).unwrap().is_none());
        assert!(!it.has_next());
        assert!(it.current().is_none());
    }

    #[test]
    fn test_rewind_restarts() {
        let mut it = IdListIterator::new(vec![5, 6]);
        assert_eq!(drain(&mut it), vec![5, 6]);
        it.rewind();
        assert!(it.has_next());
        assert_eq!(it.last_doc_id(), 0);
        assert_eq!(drain(&mut it), vec![5, 6]);
    }

    #[test]
    fn test_abort_stops_reads() {
        let mut it = IdListIterator::new(vec![1, 2, 3]);
        it.read().unwrap();
        it.abort();
        assert!(!it.has_next());
        assert!(it.read().unwrap().is_none());
    }

    #[test]
    fn test_empty_list() {
        let mut it = IdListIterator::new(vec![]);
        assert!(it.is_empty());
        assert!(!it.has_next());
        assert!(it.read().unwrap().is_none());
        assert_eq!(it.num_estimated(), 0);
    }
}
