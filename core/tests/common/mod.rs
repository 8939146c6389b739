//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use snapshot_diff::{
    compare_at, CompareConfig, EntityDescriptor, Registry, Report, Section, Snapshot,
};

pub fn snapshot(value: Value) -> Snapshot {
    Snapshot::from_value(value).expect("snapshot root must be an object")
}

pub fn registry(entries: Vec<EntityDescriptor>) -> Registry {
    Registry::from_entries(entries).expect("registry entries must be valid")
}

pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn compare_default(saved: &Snapshot, current: &Snapshot, registry: &Registry) -> Report {
    compare_at(
        saved,
        current,
        registry,
        &CompareConfig::default(),
        fixed_timestamp(),
    )
}

/// Check the total invariant on a section and all its descendants: the
/// stored total equals direct differences plus child totals.
pub fn assert_total_consistency(section: &Section) {
    assert_eq!(
        section.total_differences,
        section.computed_total(),
        "total mismatch in section '{}'",
        section.key
    );
    for child in &section.child_sections {
        assert_total_consistency(child);
    }
}
