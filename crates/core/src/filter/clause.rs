//! Metadata predicates: filter clauses, conditions, and their evaluation.
//!
//! A [`FilterClause`] combines `must` (AND) and `must_not` (AND-NOT) conditions.
//! Operands are JSON values so clauses deserialize straight from a query body.

use crate::filter::metadata::{Metadata, MetadataValue};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Metadata filter clause with `must` (AND) and `must_not` (AND-NOT) conditions.
///
/// An empty clause matches every document.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilterClause {
    #[serde(default)]
    pub must: Vec<FilterCondition>,
    #[serde(default)]
    pub must_not: Vec<FilterCondition>,
}

/// A single condition on one metadata field.
#[derive(Debug, Deserialize, Clone)]
pub struct FilterCondition {
    pub field: String,
    pub op: FilterOperator,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
}

/// Comparison operator for filter conditions.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
}

impl FilterClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition that must hold.
    pub fn must(mut self, cond: FilterCondition) -> Self {
        self.must.push(cond);
        self
    }

    /// Adds a condition that must not hold.
    pub fn must_not(mut self, cond: FilterCondition) -> Self {
        self.must_not.push(cond);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty()
    }

    /// Whether `metadata` satisfies every `must` condition and no `must_not` condition.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.must.iter().all(|c| c.evaluate(metadata))
            && !self.must_not.iter().any(|c| c.evaluate(metadata))
    }
}

impl FilterCondition {
    /// A single-operand condition (`eq`, `ne`, `gt`, `lt`, `gte`, `lte`).
    pub fn compare(field: impl Into<String>, op: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value: Some(value),
            values: None,
        }
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, FilterOperator::Eq, value)
    }

    /// An `in` condition over a set of operands.
    pub fn any_of(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOperator::In,
            value: None,
            values: Some(values),
        }
    }

    /// A condition on a missing field, or without its operand, is false.
    pub fn evaluate(&self, metadata: &Metadata) -> bool {
        let Some(field_value) = metadata.get(&self.field) else {
            return false;
        };

        let cmp = || self.value.as_ref().and_then(|v| json_cmp(field_value, v));
        match self.op {
            FilterOperator::Eq => self.value.as_ref().is_some_and(|v| json_eq(field_value, v)),
            FilterOperator::Ne => self.value.as_ref().is_some_and(|v| !json_eq(field_value, v)),
            FilterOperator::Gt => cmp() == Some(Ordering::Greater),
            FilterOperator::Lt => cmp() == Some(Ordering::Less),
            FilterOperator::Gte => cmp().is_some_and(|o| o != Ordering::Less),
            FilterOperator::Lte => cmp().is_some_and(|o| o != Ordering::Greater),
            FilterOperator::In => self
                .values
                .as_ref()
                .is_some_and(|vals| vals.iter().any(|v| json_eq(field_value, v))),
        }
    }
}

fn json_eq(meta: &MetadataValue, json: &Value) -> bool {
    match (meta, json) {
        (MetadataValue::String(s), Value::String(js)) => s == js,
        (MetadataValue::Boolean(b), Value::Bool(jb)) => b == jb,
        (MetadataValue::Integer(i), Value::Number(n)) => {
            n.as_i64().is_some_and(|ni| *i == ni)
                || n.as_f64()
                    .is_some_and(|nf| (*i as f64 - nf).abs() < f64::EPSILON)
        }
        (MetadataValue::Float(f), Value::Number(n)) => {
            n.as_f64().is_some_and(|nf| (*f - nf).abs() < f64::EPSILON)
        }
        _ => false,
    }
}

/// Numeric ordering only; strings and booleans are not comparable.
fn json_cmp(meta: &MetadataValue, json: &Value) -> Option<Ordering> {
    let meta_f = match meta {
        MetadataValue::Integer(i) => *i as f64,
        MetadataValue::Float(f) => *f,
        _ => return None,
    };
    meta_f.partial_cmp(&json.as_f64()?)
}
