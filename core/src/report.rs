//! Report types produced by the comparison engine.
//!
//! A [`Report`] holds one [`Section`] per registry entry (in registry
//! order), aggregate difference counts, and any non-fatal warnings gathered
//! during comparison. Child sections are structurally identical to
//! top-level sections, which is what lets the engine recurse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One side of a property comparison: either the property's value, or a
/// marker that the property is absent on that side. Absent is distinct from
/// an explicit JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySlot {
    Absent,
    Value(Value),
}

impl PropertySlot {
    pub fn from_option(value: Option<&Value>) -> Self {
        match value {
            Some(v) => PropertySlot::Value(v.clone()),
            None => PropertySlot::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, PropertySlot::Absent)
    }
}

/// A single drifted property on a matched entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDifference {
    pub property: String,
    pub saved: PropertySlot,
    pub current: PropertySlot,
}

/// An entity present on only one side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    /// The full record as it appeared in the snapshot that contains it.
    pub entity: Value,
}

/// An entity present on both sides, with its property drift (possibly none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEntity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<PropertyDifference>,
}

impl MatchedEntity {
    pub fn is_in_sync(&self) -> bool {
        self.differences.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub missing: usize,
    pub extra: usize,
    pub changed: usize,
    pub in_sync: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSummary {
    pub missing: usize,
    pub extra: usize,
}

/// Strategy-specific body of a [`Section`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SectionDetail {
    Entity {
        missing: Vec<EntityRef>,
        extra: Vec<EntityRef>,
        matched: Vec<MatchedEntity>,
        summary: EntitySummary,
    },
    Flat {
        missing: Vec<Value>,
        extra: Vec<Value>,
        summary: FlatSummary,
    },
}

impl SectionDetail {
    /// Differences contributed by this section alone, excluding child
    /// sections.
    pub fn direct_differences(&self) -> usize {
        match self {
            SectionDetail::Entity { summary, .. } => {
                summary.missing + summary.extra + summary.changed
            }
            SectionDetail::Flat { summary, .. } => summary.missing + summary.extra,
        }
    }
}

/// Diff result for one entity-type key, possibly containing nested child
/// sections produced for matched parent entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub detail: SectionDetail,
    /// Set on child sections only: the matched parent entity's ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Set on child sections only: the parent descriptor's label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_sections: Vec<Section>,
    /// Direct differences plus the totals of all descendant child sections.
    pub total_differences: usize,
}

impl Section {
    /// Recompute the total from parts, recursively. Equal to
    /// `total_differences` by construction; used to check the invariant in
    /// tests.
    pub fn computed_total(&self) -> usize {
        self.detail.direct_differences()
            + self
                .child_sections
                .iter()
                .map(Section::computed_total)
                .sum::<usize>()
    }
}

/// Caller-attached identity of the two snapshots being compared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_server: Option<String>,
    /// When the saved snapshot was originally captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// The result of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version (currently "1").
    pub version: String,
    /// When the comparison ran.
    pub timestamp: DateTime<Utc>,
    /// Sum of all top-level section totals.
    pub total_differences: usize,
    pub sections: Vec<Section>,
    /// Non-fatal anomalies observed during comparison, e.g. records lacking
    /// their identity field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ReportMeta>,
}

impl Report {
    pub const SCHEMA_VERSION: &'static str = "1";

    pub fn new(sections: Vec<Section>, timestamp: DateTime<Utc>) -> Report {
        let total_differences = sections.iter().map(|s| s.total_differences).sum();
        Report {
            version: Self::SCHEMA_VERSION.to_string(),
            timestamp,
            total_differences,
            sections,
            warnings: Vec::new(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ReportMeta) -> Report {
        self.meta = Some(meta);
        self
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.total_differences == 0
    }

    /// Look up a top-level section by entity-type key.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}
