//! The comparison engine.
//!
//! Walks the registry, dispatches each entity type's collections to the
//! right strategy, recurses into matched parents' child collections, and
//! assembles the final [`Report`]. The engine performs no I/O and is pure:
//! identical inputs (and timestamp) produce a structurally identical
//! report.

use crate::config::{CompareConfig, UnidentifiedBehavior};
use crate::entity_diff::{entity_compare, index_by_id};
use crate::flat_diff::flat_compare;
use crate::registry::{EntityDescriptor, Registry, Strategy};
use crate::report::{Report, Section, SectionDetail};
use crate::snapshot::{record_collection, Snapshot};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;

struct CompareContext<'a> {
    config: &'a CompareConfig,
    warnings: Vec<String>,
}

impl CompareContext<'_> {
    fn warn_unidentified(&mut self, descriptor: &EntityDescriptor, side: &str, count: usize) {
        if count == 0 || self.config.on_unidentified == UnidentifiedBehavior::Ignore {
            return;
        }
        let id_field = descriptor.id_field.as_deref().unwrap_or("");
        self.warnings.push(format!(
            "entity type '{}': {} record(s) in the {} snapshot lack identity field '{}' and were excluded from comparison",
            descriptor.key, count, side, id_field
        ));
    }
}

/// Compare two snapshots, stamping the report with the current time.
pub fn compare(
    saved: &Snapshot,
    current: &Snapshot,
    registry: &Registry,
    config: &CompareConfig,
) -> Report {
    compare_at(saved, current, registry, config, Utc::now())
}

/// Compare two snapshots with an injected timestamp, for callers that need
/// fully deterministic output.
pub fn compare_at(
    saved: &Snapshot,
    current: &Snapshot,
    registry: &Registry,
    config: &CompareConfig,
    timestamp: DateTime<Utc>,
) -> Report {
    let mut ctx = CompareContext {
        config,
        warnings: Vec::new(),
    };
    let sections = registry
        .entries()
        .iter()
        .map(|descriptor| {
            compare_section(
                descriptor,
                saved.collection(&descriptor.key),
                current.collection(&descriptor.key),
                &mut ctx,
            )
        })
        .collect();
    let mut report = Report::new(sections, timestamp);
    for warning in ctx.warnings {
        report.add_warning(warning);
    }
    report
}

/// Compare one collection pair according to its descriptor.
fn compare_section(
    descriptor: &EntityDescriptor,
    saved: &[Value],
    current: &[Value],
    ctx: &mut CompareContext<'_>,
) -> Section {
    match descriptor.strategy {
        Strategy::Flat => flat_section(descriptor, saved, current),
        Strategy::Entity => entity_section(descriptor, saved, current, ctx),
    }
}

fn flat_section(descriptor: &EntityDescriptor, saved: &[Value], current: &[Value]) -> Section {
    let outcome = flat_compare(saved, current);
    let total = outcome.summary.missing + outcome.summary.extra;
    Section {
        key: descriptor.key.clone(),
        label: descriptor.label.clone(),
        detail: SectionDetail::Flat {
            missing: outcome.missing,
            extra: outcome.extra,
            summary: outcome.summary,
        },
        parent_id: None,
        parent_label: None,
        child_sections: Vec::new(),
        total_differences: total,
    }
}

/// Entity-strategy section: presence + property diff, then recursion into
/// child collections for matched parent IDs only. A parent absent on one
/// side has no matched counterpart to recurse into, so its children are
/// accounted for solely by the parent's missing/extra entry.
fn entity_section(
    descriptor: &EntityDescriptor,
    saved: &[Value],
    current: &[Value],
    ctx: &mut CompareContext<'_>,
) -> Section {
    debug_assert!(
        descriptor.id_field.is_some(),
        "entity descriptor '{}' must carry an id_field (registry validation enforces this)",
        descriptor.key
    );
    let id_field = descriptor.id_field.as_deref().unwrap_or("");

    // Child-collection keys are diffed recursively, never as scalar
    // properties of the parent.
    let exclude: BTreeSet<String> = descriptor
        .children
        .iter()
        .map(|child| child.key.clone())
        .collect();
    let outcome = entity_compare(saved, current, id_field, &exclude);

    ctx.warn_unidentified(descriptor, "saved", outcome.unidentified_saved);
    ctx.warn_unidentified(descriptor, "current", outcome.unidentified_current);

    let mut child_sections = Vec::new();
    if !descriptor.children.is_empty() {
        let (saved_index, _) = index_by_id(saved, id_field);
        let (current_index, _) = index_by_id(current, id_field);
        for entity in &outcome.matched {
            let (Some(saved_record), Some(current_record)) =
                (saved_index.get(&entity.id), current_index.get(&entity.id))
            else {
                continue;
            };
            for child in &descriptor.children {
                let mut section = compare_section(
                    child,
                    record_collection(saved_record, &child.key),
                    record_collection(current_record, &child.key),
                    ctx,
                );
                section.parent_id = Some(entity.id.clone());
                section.parent_label = Some(descriptor.label.clone());
                child_sections.push(section);
            }
        }
    }

    let child_total: usize = child_sections.iter().map(|s| s.total_differences).sum();
    let total = outcome.summary.missing + outcome.summary.extra + outcome.summary.changed
        + child_total;

    let matched = if ctx.config.include_in_sync {
        outcome.matched
    } else {
        outcome
            .matched
            .into_iter()
            .filter(|entity| !entity.is_in_sync())
            .collect()
    };

    Section {
        key: descriptor.key.clone(),
        label: descriptor.label.clone(),
        detail: SectionDetail::Entity {
            missing: outcome.missing,
            extra: outcome.extra,
            matched,
            summary: outcome.summary,
        },
        parent_id: None,
        parent_label: None,
        child_sections,
        total_differences: total,
    }
}
