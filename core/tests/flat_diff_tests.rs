mod common;

use serde_json::{json, Value};
use snapshot_diff::{canonicalize, flat_compare};

fn records(values: Value) -> Vec<Value> {
    match values {
        Value::Array(items) => items,
        other => panic!("expected an array of records, got {other}"),
    }
}

#[test]
fn identical_collections_yield_empty_diff() {
    let a = records(json!([{ "k": "a", "v": 1 }, { "k": "b", "v": 2 }]));
    let outcome = flat_compare(&a, &a);
    assert!(outcome.missing.is_empty());
    assert!(outcome.extra.is_empty());
    assert_eq!(outcome.summary.missing, 0);
    assert_eq!(outcome.summary.extra, 0);
}

#[test]
fn reordered_collections_are_equal() {
    let a = records(json!([{ "k": "a" }, { "k": "b" }]));
    let b = records(json!([{ "k": "b" }, { "k": "a" }]));
    let outcome = flat_compare(&a, &b);
    assert!(outcome.missing.is_empty());
    assert!(outcome.extra.is_empty());
}

#[test]
fn surplus_copy_reported_once() {
    // Scenario: two identical saved records, one current record.
    let saved = records(json!([{ "k": "a", "v": 1 }, { "k": "a", "v": 1 }]));
    let current = records(json!([{ "k": "a", "v": 1 }]));
    let outcome = flat_compare(&saved, &current);
    assert_eq!(outcome.missing, vec![json!({ "k": "a", "v": 1 })]);
    assert!(outcome.extra.is_empty());
}

#[test]
fn missing_and_extra_reported_independently() {
    let saved = records(json!([{ "k": "a" }, { "k": "b" }]));
    let current = records(json!([{ "k": "b" }, { "k": "c" }, { "k": "c" }]));
    let outcome = flat_compare(&saved, &current);
    assert_eq!(outcome.missing, vec![json!({ "k": "a" })]);
    assert_eq!(outcome.extra, vec![json!({ "k": "c" }), json!({ "k": "c" })]);
    assert_eq!(outcome.summary.missing, 1);
    assert_eq!(outcome.summary.extra, 2);
}

#[test]
fn symmetric_in_structure() {
    let a = records(json!([{ "k": "a" }, { "k": "a" }, { "k": "b" }]));
    let b = records(json!([{ "k": "b" }, { "k": "c" }]));

    let forward = flat_compare(&a, &b);
    let backward = flat_compare(&b, &a);

    let as_multiset = |values: &[Value]| {
        let mut keys: Vec<String> = values.iter().map(canonicalize).collect();
        keys.sort();
        keys
    };
    assert_eq!(as_multiset(&forward.missing), as_multiset(&backward.extra));
    assert_eq!(as_multiset(&forward.extra), as_multiset(&backward.missing));
}

#[test]
fn records_with_reordered_nested_arrays_match() {
    let saved = records(json!([{ "k": "a", "tags": [1, 2] }]));
    let current = records(json!([{ "tags": [2, 1], "k": "a" }]));
    let outcome = flat_compare(&saved, &current);
    assert!(outcome.missing.is_empty());
    assert!(outcome.extra.is_empty());
}

#[test]
fn primitive_kind_mismatch_counts_as_different() {
    let saved = records(json!([{ "k": 1 }]));
    let current = records(json!([{ "k": "1" }]));
    let outcome = flat_compare(&saved, &current);
    assert_eq!(outcome.summary.missing, 1);
    assert_eq!(outcome.summary.extra, 1);
}

#[test]
fn empty_collections_compare_clean() {
    let outcome = flat_compare(&[], &[]);
    assert!(outcome.missing.is_empty());
    assert!(outcome.extra.is_empty());
}
