//! Order-insensitive multiset comparison for collections without identity.
//!
//! Used for unordered, unkeyed collections such as lookup tables. Records
//! that canonicalize identically are indistinguishable, so the result only
//! reports aggregate surplus and deficit per distinct value, never that one
//! specific record changed into another.

use crate::canonical::canonicalize;
use crate::report::FlatSummary;
use serde_json::Value;
use std::collections::BTreeMap;

/// Result of [`flat_compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatOutcome {
    /// Records over-represented in the saved snapshot, one entry per
    /// surplus copy.
    pub missing: Vec<Value>,
    /// Records over-represented in the current snapshot.
    pub extra: Vec<Value>,
    pub summary: FlatSummary,
}

/// Compare two collections as multisets keyed by canonical form.
///
/// For a value with count `Cs` in saved and `Cc` in current, `missing`
/// receives `max(0, Cs - Cc)` copies of the retained representative and
/// `extra` receives `max(0, Cc - Cs)`. Output order is sorted by canonical
/// key, so the result is deterministic regardless of input order.
pub fn flat_compare(saved: &[Value], current: &[Value]) -> FlatOutcome {
    let saved_freq = frequencies(saved);
    let current_freq = frequencies(current);

    let mut missing = Vec::new();
    let mut extra = Vec::new();

    for (key, (representative, saved_count)) in &saved_freq {
        let current_count = current_freq.get(key).map_or(0, |(_, n)| *n);
        for _ in current_count..*saved_count {
            missing.push((*representative).clone());
        }
    }
    for (key, (representative, current_count)) in &current_freq {
        let saved_count = saved_freq.get(key).map_or(0, |(_, n)| *n);
        for _ in saved_count..*current_count {
            extra.push((*representative).clone());
        }
    }

    let summary = FlatSummary {
        missing: missing.len(),
        extra: extra.len(),
    };
    FlatOutcome {
        missing,
        extra,
        summary,
    }
}

/// Frequency map keyed by canonical form, retaining the first-seen record
/// as the representative for its key.
fn frequencies(records: &[Value]) -> BTreeMap<String, (&Value, usize)> {
    let mut map: BTreeMap<String, (&Value, usize)> = BTreeMap::new();
    for record in records {
        let entry = map.entry(canonicalize(record)).or_insert((record, 0));
        entry.1 += 1;
    }
    map
}
