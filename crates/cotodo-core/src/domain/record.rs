//! Record Snapshots
//!
//! Point-in-time view of a replicated record as read from the engine.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

/// Schema a record was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    List,
    Task,
}

/// Value of a scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Snapshot of a record's scalar fields and grow-only reference sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub fields: BTreeMap<String, FieldValue>,
    /// Insertion-ordered reference sets, keyed by field name
    pub sets: BTreeMap<String, IndexSet<RecordId>>,
}

impl RecordSnapshot {
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Unset and non-boolean fields read as `false`.
    pub fn flag(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(FieldValue::Bool(true)))
    }

    pub fn set(&self, field: &str) -> impl Iterator<Item = &RecordId> {
        self.sets.get(field).into_iter().flatten()
    }
}
