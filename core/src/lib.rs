//! Snapshot Diff: a library for comparing configuration snapshots.
//!
//! This crate compares two point-in-time configuration exports ("snapshots")
//! and produces a structured report grouped by entity type:
//! - identity-keyed comparison for collections of identified records
//!   (missing / extra / per-property drift on matched entities)
//! - order-insensitive multiset comparison for unkeyed lookup collections
//! - recursive comparison of nested child collections inside matched parent
//!   entities
//!
//! Which collections exist and how each one is compared is driven by a
//! declarative [`Registry`] of [`EntityDescriptor`] values, supplied by the
//! caller as configuration.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use snapshot_diff::{compare, CompareConfig, EntityDescriptor, Registry, Snapshot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let saved = Snapshot::from_value(json!({ "users": [{ "id": "u1", "name": "Ann" }] }))?;
//! let current = Snapshot::from_value(json!({ "users": [{ "id": "u1", "name": "Ann2" }] }))?;
//! let registry = Registry::from_entries(vec![EntityDescriptor::entity("users", "Users", "id")])?;
//!
//! let report = compare(&saved, &current, &registry, &CompareConfig::default());
//! assert_eq!(report.total_differences, 1);
//! # Ok(())
//! # }
//! ```

mod canonical;
mod config;
mod engine;
mod entity_diff;
pub(crate) mod error_codes;
mod flat_diff;
mod output;
mod registry;
mod report;
mod snapshot;

pub use canonical::{canonicalize, canonically_equal};
pub use config::{CompareConfig, UnidentifiedBehavior};
pub use engine::{compare, compare_at};
pub use entity_diff::{entity_compare, EntityOutcome};
pub use flat_diff::{flat_compare, FlatOutcome};
pub use output::json::{serialize_report, serialize_report_pretty};
pub use registry::{EntityDescriptor, Registry, RegistryError, Strategy};
pub use report::{
    EntityRef, EntitySummary, FlatSummary, MatchedEntity, PropertyDifference, PropertySlot, Report,
    ReportMeta, Section, SectionDetail,
};
pub use snapshot::{Snapshot, SnapshotError};
