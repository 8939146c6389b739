mod common;

use common::{assert_total_consistency, compare_default, fixed_timestamp, registry, snapshot};
use serde_json::json;
use snapshot_diff::{
    compare_at, CompareConfig, EntityDescriptor, Report, SectionDetail, UnidentifiedBehavior,
};

fn users_registry() -> snapshot_diff::Registry {
    registry(vec![EntityDescriptor::entity("users", "Users", "id")])
}

fn namespaces_registry() -> snapshot_diff::Registry {
    registry(vec![EntityDescriptor::entity(
        "namespaces",
        "Namespaces",
        "id",
    )
    .with_children(vec![EntityDescriptor::entity("classes", "Classes", "id")])])
}

#[test]
fn identical_snapshots_produce_clean_report() {
    let snap = snapshot(json!({
        "users": [{ "id": "u1", "name": "Ann" }],
        "lookups": [{ "k": "a", "v": 1 }]
    }));
    let reg = registry(vec![
        EntityDescriptor::entity("users", "Users", "id"),
        EntityDescriptor::flat("lookups", "Lookups"),
    ]);
    let report = compare_default(&snap, &snap, &reg);
    assert!(report.is_clean());
    assert!(report.warnings.is_empty());
    for section in &report.sections {
        assert_total_consistency(section);
    }
}

#[test]
fn section_order_follows_registry_order() {
    let snap = snapshot(json!({ "a": [], "b": [], "c": [] }));
    let reg = registry(vec![
        EntityDescriptor::flat("c", "C"),
        EntityDescriptor::flat("a", "A"),
        EntityDescriptor::flat("b", "B"),
    ]);
    let report = compare_default(&snap, &snap, &reg);
    let keys: Vec<&str> = report.sections.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[test]
fn changed_entity_counts_one_difference() {
    let saved = snapshot(json!({ "users": [{ "id": "u1", "name": "Ann" }] }));
    let current = snapshot(json!({ "users": [{ "id": "u1", "name": "Ann2" }] }));
    let report = compare_default(&saved, &current, &users_registry());

    assert_eq!(report.total_differences, 1);
    let section = report.section("users").unwrap();
    assert_eq!(section.total_differences, 1);
    let SectionDetail::Entity {
        matched, summary, ..
    } = &section.detail
    else {
        panic!("expected entity section");
    };
    assert_eq!(summary.changed, 1);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].differences[0].property, "name");
}

#[test]
fn absent_collection_defaults_to_empty_without_being_a_difference() {
    let saved = snapshot(json!({ "users": [] }));
    let current = snapshot(json!({}));
    let report = compare_default(&saved, &current, &users_registry());
    assert!(report.is_clean());
}

#[test]
fn missing_collection_with_records_reports_them_missing() {
    let saved = snapshot(json!({ "roles": [{ "id": "r1" }] }));
    let current = snapshot(json!({}));
    let reg = registry(vec![EntityDescriptor::entity("roles", "Roles", "id")]);
    let report = compare_default(&saved, &current, &reg);

    assert_eq!(report.total_differences, 1);
    let SectionDetail::Entity { missing, .. } = &report.sections[0].detail else {
        panic!("expected entity section");
    };
    assert_eq!(missing[0].id, "r1");
}

#[test]
fn child_drift_propagates_to_parent_total() {
    // Scenario: matched namespace whose classes collection lost a member.
    let saved = snapshot(json!({
        "namespaces": [{ "id": "ns1", "name": "core", "classes": [{ "id": "c1" }] }]
    }));
    let current = snapshot(json!({
        "namespaces": [{ "id": "ns1", "name": "core", "classes": [] }]
    }));
    let report = compare_default(&saved, &current, &namespaces_registry());

    let section = report.section("namespaces").unwrap();
    let SectionDetail::Entity {
        matched, summary, ..
    } = &section.detail
    else {
        panic!("expected entity section");
    };
    // The parent itself is in sync; the difference is purely propagated.
    assert_eq!(summary.changed, 0);
    assert_eq!(summary.in_sync, 1);
    assert!(matched[0].is_in_sync());

    assert_eq!(section.child_sections.len(), 1);
    let child = &section.child_sections[0];
    assert_eq!(child.key, "classes");
    assert_eq!(child.parent_id.as_deref(), Some("ns1"));
    assert_eq!(child.parent_label.as_deref(), Some("Namespaces"));
    assert_eq!(child.total_differences, 1);

    assert_eq!(section.total_differences, 1);
    assert_eq!(report.total_differences, 1);
    assert_total_consistency(section);
}

#[test]
fn no_child_recursion_for_unmatched_parents() {
    let saved = snapshot(json!({
        "namespaces": [{ "id": "ns1", "classes": [{ "id": "c1" }, { "id": "c2" }] }]
    }));
    let current = snapshot(json!({ "namespaces": [] }));
    let report = compare_default(&saved, &current, &namespaces_registry());

    let section = report.section("namespaces").unwrap();
    // Only the missing parent counts; its classes never get sections.
    assert!(section.child_sections.is_empty());
    assert_eq!(section.total_differences, 1);
}

#[test]
fn differences_propagate_through_two_levels_of_nesting() {
    let reg = registry(vec![EntityDescriptor::entity(
        "namespaces",
        "Namespaces",
        "id",
    )
    .with_children(vec![EntityDescriptor::entity("classes", "Classes", "id")
        .with_children(vec![EntityDescriptor::entity(
            "attributes",
            "Attributes",
            "id",
        )])])]);

    let saved = snapshot(json!({
        "namespaces": [{
            "id": "ns1",
            "classes": [{
                "id": "c1",
                "attributes": [{ "id": "a1", "type": "string" }]
            }]
        }]
    }));
    let current = snapshot(json!({
        "namespaces": [{
            "id": "ns1",
            "classes": [{
                "id": "c1",
                "attributes": [{ "id": "a1", "type": "text" }]
            }]
        }]
    }));
    let report = compare_default(&saved, &current, &reg);

    let namespaces = report.section("namespaces").unwrap();
    assert_eq!(namespaces.total_differences, 1);
    let classes = &namespaces.child_sections[0];
    assert_eq!(classes.total_differences, 1);
    let attributes = &classes.child_sections[0];
    assert_eq!(attributes.key, "attributes");
    assert_eq!(attributes.parent_id.as_deref(), Some("c1"));
    assert_eq!(attributes.total_differences, 1);
    assert_total_consistency(namespaces);
}

#[test]
fn child_collections_are_not_diffed_as_parent_properties() {
    let saved = snapshot(json!({
        "namespaces": [{ "id": "ns1", "classes": [{ "id": "c1" }] }]
    }));
    let current = snapshot(json!({
        "namespaces": [{ "id": "ns1", "classes": [{ "id": "c1" }, { "id": "c2" }] }]
    }));
    let report = compare_default(&saved, &current, &namespaces_registry());

    let section = report.section("namespaces").unwrap();
    let SectionDetail::Entity { matched, .. } = &section.detail else {
        panic!("expected entity section");
    };
    // No "classes" property difference on the parent.
    assert!(matched[0].is_in_sync());
    // The extra class shows up in the child section instead.
    assert_eq!(section.child_sections[0].total_differences, 1);
    assert_eq!(section.total_differences, 1);
}

#[test]
fn mixed_registry_sums_grand_total() {
    let saved = snapshot(json!({
        "users": [{ "id": "u1", "name": "Ann" }, { "id": "u2" }],
        "lookups": [{ "k": "a" }, { "k": "a" }]
    }));
    let current = snapshot(json!({
        "users": [{ "id": "u1", "name": "Ann2" }],
        "lookups": [{ "k": "a" }, { "k": "b" }]
    }));
    let reg = registry(vec![
        EntityDescriptor::entity("users", "Users", "id"),
        EntityDescriptor::flat("lookups", "Lookups"),
    ]);
    let report = compare_default(&saved, &current, &reg);

    // users: u2 missing + u1 changed = 2; lookups: one surplus + one extra = 2.
    assert_eq!(report.section("users").unwrap().total_differences, 2);
    assert_eq!(report.section("lookups").unwrap().total_differences, 2);
    assert_eq!(report.total_differences, 4);
}

#[test]
fn unidentified_records_warn_by_default() {
    let saved = snapshot(json!({
        "users": [{ "id": "u1" }, { "name": "no id" }]
    }));
    let current = snapshot(json!({ "users": [{ "id": "u1" }] }));
    let report = compare_default(&saved, &current, &users_registry());

    assert!(report.is_clean());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("users"));
    assert!(report.warnings[0].contains("saved"));
    assert!(report.warnings[0].contains("'id'"));
}

#[test]
fn unidentified_records_silent_under_ignore() {
    let saved = snapshot(json!({
        "users": [{ "id": "u1" }, { "name": "no id" }]
    }));
    let current = snapshot(json!({ "users": [{ "id": "u1" }] }));
    let config = CompareConfig {
        on_unidentified: UnidentifiedBehavior::Ignore,
        ..CompareConfig::default()
    };
    let report = compare_at(
        &saved,
        &current,
        &users_registry(),
        &config,
        fixed_timestamp(),
    );
    assert!(report.warnings.is_empty());
    // Classification is identical either way.
    assert!(report.is_clean());
}

#[test]
fn exclude_in_sync_filters_matched_but_not_summary() {
    let saved = snapshot(json!({
        "users": [{ "id": "u1", "name": "same" }, { "id": "u2", "name": "old" }]
    }));
    let current = snapshot(json!({
        "users": [{ "id": "u1", "name": "same" }, { "id": "u2", "name": "new" }]
    }));
    let config = CompareConfig {
        include_in_sync: false,
        ..CompareConfig::default()
    };
    let report = compare_at(
        &saved,
        &current,
        &users_registry(),
        &config,
        fixed_timestamp(),
    );

    let SectionDetail::Entity {
        matched, summary, ..
    } = &report.sections[0].detail
    else {
        panic!("expected entity section");
    };
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "u2");
    assert_eq!(summary.in_sync, 1);
    assert_eq!(summary.changed, 1);
}

#[test]
fn comparison_is_deterministic() {
    let saved = snapshot(json!({
        "users": [{ "id": "u2", "name": "b" }, { "id": "u1", "name": "a" }],
        "lookups": [{ "k": "z" }, { "k": "a" }]
    }));
    let current = snapshot(json!({
        "users": [{ "id": "u1", "name": "a2" }],
        "lookups": [{ "k": "a" }]
    }));
    let reg = registry(vec![
        EntityDescriptor::entity("users", "Users", "id"),
        EntityDescriptor::flat("lookups", "Lookups"),
    ]);
    let first = compare_default(&saved, &current, &reg);
    let second = compare_default(&saved, &current, &reg);
    assert_eq!(first, second);
}

#[test]
fn snapshot_diff_method_matches_free_function() {
    let saved = snapshot(json!({ "users": [{ "id": "u1", "name": "Ann" }] }));
    let current = snapshot(json!({ "users": [{ "id": "u1", "name": "Ann2" }] }));
    let reg = users_registry();
    let report = saved.diff(&current, &reg, &CompareConfig::default());
    assert_eq!(report.total_differences, 1);
}

#[test]
fn report_attaches_caller_metadata() {
    let saved = snapshot(json!({}));
    let current = snapshot(json!({}));
    let report = compare_default(&saved, &current, &users_registry()).with_meta(
        snapshot_diff::ReportMeta {
            saved_server: Some("prod-a".to_string()),
            current_server: Some("prod-b".to_string()),
            saved_at: None,
        },
    );
    let meta = report.meta.as_ref().unwrap();
    assert_eq!(meta.saved_server.as_deref(), Some("prod-a"));
    assert_eq!(meta.current_server.as_deref(), Some("prod-b"));
}

#[test]
fn report_json_roundtrip() {
    let saved = snapshot(json!({
        "namespaces": [{ "id": "ns1", "note": "x", "classes": [{ "id": "c1" }] }],
        "lookups": [{ "k": "a" }]
    }));
    let current = snapshot(json!({
        "namespaces": [{ "id": "ns1", "note": "y", "classes": [] }],
        "lookups": []
    }));
    let reg = registry(vec![
        EntityDescriptor::entity("namespaces", "Namespaces", "id")
            .with_children(vec![EntityDescriptor::entity("classes", "Classes", "id")]),
        EntityDescriptor::flat("lookups", "Lookups"),
    ]);
    let report = compare_default(&saved, &current, &reg);

    let json = snapshot_diff::serialize_report(&report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(report, parsed);
}
