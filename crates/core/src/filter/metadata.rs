//! Document metadata store and the predicate iterator that scans it.
//!
//! [`MetadataStore`] keeps per-document key-value metadata ordered by docId.
//! [`MetadataFilterIterator`] walks it in ascending docId and yields the
//! documents whose metadata satisfies a [`FilterClause`].

use crate::error::IteratorError;
use crate::filter::clause::FilterClause;
use crate::iterator::{IndexIterator, IteratorKind, SkipToOutcome};
use crate::result::{DocId, IndexResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// A typed metadata value attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// Boolean value (`true` / `false`).
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

/// Key-value metadata of one document.
pub type Metadata = HashMap<String, MetadataValue>;

/// Per-document metadata, ordered by docId.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MetadataStore {
    docs: BTreeMap<DocId, Metadata>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the metadata of `doc_id`.
    pub fn insert(&mut self, doc_id: DocId, metadata: Metadata) -> Option<Metadata> {
        self.docs.insert(doc_id, metadata)
    }

    pub fn remove(&mut self, doc_id: DocId) -> Option<Metadata> {
        self.docs.remove(&doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Metadata> {
        self.docs.get(&doc_id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// First document at or after `from` whose metadata matches `clause`.
    fn next_match(&self, from: Bound<DocId>, clause: &FilterClause) -> Option<DocId> {
        self.docs
            .range((from, Bound::Unbounded))
            .find(|(_, meta)| clause.matches(meta))
            .map(|(&id, _)| id)
    }
}

/// Yields documents of a [`MetadataStore`] matching a [`FilterClause`], by ascending docId.
#[derive(Debug)]
pub struct MetadataFilterIterator<'a> {
    store: &'a MetadataStore,
    clause: FilterClause,
    current: Option<IndexResult>,
    last_doc_id: DocId,
    /// No read has happened since construction or the last rewind.
    at_start: bool,
    is_valid: bool,
}

impl<'a> MetadataFilterIterator<'a> {
    pub fn new(store: &'a MetadataStore, clause: FilterClause) -> Self {
        Self {
            store,
            clause,
            current: None,
            last_doc_id: 0,
            at_start: true,
            is_valid: !store.is_empty(),
        }
    }

    pub fn clause(&self) -> &FilterClause {
        &self.clause
    }

    fn position(&mut self, found: Option<DocId>) -> Option<DocId> {
        self.at_start = false;
        match found {
            Some(id) => {
                self.last_doc_id = id;
                self.current = Some(IndexResult::Virtual(id));
            }
            None => {
                self.is_valid = false;
                self.current = None;
            }
        }
        found
    }
}

impl IndexIterator for MetadataFilterIterator<'_> {
    fn read(&mut self) -> Result<Option<&IndexResult>, IteratorError> {
        if !self.is_valid {
            return Ok(None);
        }
        let from = if self.at_start {
            Bound::Unbounded
        } else {
            Bound::Excluded(self.last_doc_id)
        };
        let found = self.store.next_match(from, &self.clause);
        self.position(found);
        Ok(self.current.as_ref())
    }

    fn skip_to(&mut self, target: DocId) -> Result<Option<SkipToOutcome<'_>>, IteratorError> {
        if !self.is_valid {
            return Ok(None);
        }
        // Never move backwards past what was already returned.
        let from = if !self.at_start && target <= self.last_doc_id {
            Bound::Excluded(self.last_doc_id)
        } else {
            Bound::Included(target)
        };
        let found = self.store.next_match(from, &self.clause);
        let Some(landed) = self.position(found) else {
            return Ok(None);
        };
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
        self.current = None;
        self.last_doc_id = 0;
        self.at_start = true;
        self.is_valid = !self.store.is_empty();
    }

    fn abort(&mut self) {
        self.is_valid = false;
    }

    fn has_next(&self) -> bool {
        self.is_valid
    }

    /// Upper bound: every stored document.
    fn num_estimated(&self) -> usize {
        self.store.len()
    }

    fn last_doc_id(&self) -> DocId {
        self.last_doc_id
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::Metadata
    }
}
