//! Filter iterators: docId-ordered producers of non-vector predicates.

/// Metadata filter clauses and their evaluation.
pub mod clause;
/// Iterator over an explicit sorted docId list.
pub mod id_list;
/// Metadata store and the predicate iterator scanning it.
pub mod metadata;

pub use clause::{FilterClause, FilterCondition, FilterOperator};
pub use id_list::IdListIterator;
pub use metadata::{Metadata, MetadataFilterIterator, MetadataStore, MetadataValue};
