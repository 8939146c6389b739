//! Snapshot input model.
//!
//! A [`Snapshot`] is one full captured export of a server's configuration:
//! a JSON object mapping entity-type keys to collections of records. The
//! comparison core never mutates snapshots and does not validate their
//! schema beyond requiring an object root; absent or non-array collections
//! are defensively treated as empty.

use crate::config::CompareConfig;
use crate::error_codes;
use crate::registry::Registry;
use crate::report::Report;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while constructing a [`Snapshot`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("[SNAPDIFF_SNAP_001] snapshot root must be a JSON object, got {kind}. Suggestion: check that the export produced a full snapshot document.")]
    RootNotObject { kind: &'static str },

    #[error("[SNAPDIFF_SNAP_002] snapshot is not valid JSON: {source}. Suggestion: re-export the snapshot and retry.")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotError::RootNotObject { .. } => error_codes::SNAP_ROOT_NOT_OBJECT,
            SnapshotError::Parse { .. } => error_codes::SNAP_PARSE,
        }
    }
}

/// One captured configuration export.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Map<String, Value>,
}

impl Snapshot {
    /// Wrap an already-parsed JSON document. The root must be an object.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(SnapshotError::RootNotObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// The records stored under `key`, or an empty slice when the key is
    /// absent or not an array. An absent collection is indistinguishable
    /// from an empty one.
    pub fn collection(&self, key: &str) -> &[Value] {
        match self.root.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// The raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Top-level keys present in this snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Compare this snapshot (as the saved side) against `current`.
    ///
    /// Convenience wrapper around [`crate::compare`].
    pub fn diff(&self, current: &Snapshot, registry: &Registry, config: &CompareConfig) -> Report {
        crate::engine::compare(self, current, registry, config)
    }
}

/// The records stored under `key` inside a parent record, or empty when the
/// parent is not an object or the key is absent or not an array.
pub(crate) fn record_collection<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    match record.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
