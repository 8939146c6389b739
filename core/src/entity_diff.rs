//! Identity-keyed two-phase comparison for entity collections.
//!
//! Phase 1 answers "does this entity still exist" by indexing both sides on
//! the identity field; phase 2 answers "did its fields drift" by diffing
//! each matched pair property by property under canonical equality.

use crate::canonical::canonically_equal;
use crate::report::{EntityRef, EntitySummary, MatchedEntity, PropertyDifference, PropertySlot};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Result of [`entity_compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntityOutcome {
    /// Entities whose ID appears only in the saved snapshot, sorted by ID.
    pub missing: Vec<EntityRef>,
    /// Entities whose ID appears only in the current snapshot, sorted by ID.
    pub extra: Vec<EntityRef>,
    /// Every ID present on both sides, in sorted ID order, including
    /// in-sync entities.
    pub matched: Vec<MatchedEntity>,
    pub summary: EntitySummary,
    /// Records in the saved collection lacking the identity field; they are
    /// invisible to the presence comparison.
    pub unidentified_saved: usize,
    /// Same for the current collection.
    pub unidentified_current: usize,
}

/// Compare two entity collections keyed by `id_field`.
///
/// Property names in `exclude` are skipped during phase 2; the engine
/// passes the keys of child descriptors so that nested collections are not
/// double-reported as scalar property drift.
pub fn entity_compare(
    saved: &[Value],
    current: &[Value],
    id_field: &str,
    exclude: &BTreeSet<String>,
) -> EntityOutcome {
    let (saved_index, unidentified_saved) = index_by_id(saved, id_field);
    let (current_index, unidentified_current) = index_by_id(current, id_field);

    let mut missing = Vec::new();
    let mut extra = Vec::new();
    let mut matched = Vec::new();
    let mut summary = EntitySummary::default();

    for (id, record) in &saved_index {
        if !current_index.contains_key(id) {
            missing.push(EntityRef {
                id: id.clone(),
                entity: (*record).clone(),
            });
        }
    }
    for (id, record) in &current_index {
        if !saved_index.contains_key(id) {
            extra.push(EntityRef {
                id: id.clone(),
                entity: (*record).clone(),
            });
        }
    }

    for (id, saved_record) in &saved_index {
        let Some(current_record) = current_index.get(id) else {
            continue;
        };
        let differences = diff_properties(saved_record, current_record, id_field, exclude);
        if differences.is_empty() {
            summary.in_sync += 1;
        } else {
            summary.changed += 1;
        }
        matched.push(MatchedEntity {
            id: id.clone(),
            differences,
        });
    }

    summary.missing = missing.len();
    summary.extra = extra.len();

    EntityOutcome {
        missing,
        extra,
        matched,
        summary,
        unidentified_saved,
        unidentified_current,
    }
}

/// Index records by the stringified value of `id_field`.
///
/// Records without the field (including non-object records) are skipped and
/// counted. Duplicate IDs within one collection are last-write-wins.
pub(crate) fn index_by_id<'a>(
    records: &'a [Value],
    id_field: &str,
) -> (BTreeMap<String, &'a Value>, usize) {
    let mut index = BTreeMap::new();
    let mut unidentified = 0usize;
    for record in records {
        match record.get(id_field) {
            Some(id) => {
                index.insert(stringify_id(id), record);
            }
            None => unidentified += 1,
        }
    }
    (index, unidentified)
}

/// JSON strings become the ID directly; other values use their JSON text,
/// so an explicit null ID is the string "null" and stays comparable.
fn stringify_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One difference per drifted name in the union of property names across
/// both records, visited in sorted order, minus the identity field and the
/// excluded keys. A name present on one side only yields a difference with
/// the other side marked absent.
fn diff_properties(
    saved: &Value,
    current: &Value,
    id_field: &str,
    exclude: &BTreeSet<String>,
) -> Vec<PropertyDifference> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    if let Some(map) = saved.as_object() {
        names.extend(map.keys().map(String::as_str));
    }
    if let Some(map) = current.as_object() {
        names.extend(map.keys().map(String::as_str));
    }

    let mut differences = Vec::new();
    for name in names {
        if name == id_field || exclude.contains(name) {
            continue;
        }
        let saved_value = saved.get(name);
        let current_value = current.get(name);
        let drifted = match (saved_value, current_value) {
            (Some(a), Some(b)) => !canonically_equal(a, b),
            (None, None) => false,
            _ => true,
        };
        if drifted {
            differences.push(PropertyDifference {
                property: name.to_string(),
                saved: PropertySlot::from_option(saved_value),
                current: PropertySlot::from_option(current_value),
            });
        }
    }
    differences
}
