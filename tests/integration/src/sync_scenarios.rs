//! Scenario tests for failure handling and mixed formats
//!
//! Each test drives the engine against a [`MemoryStore`] with injected
//! failures or unusual contents and checks both the report and the store.

use param_core::{
    Error, MemoryStore, MutationAction, ParameterStore, StoreError, SyncEngine, SyncSettings,
};
use param_test_utils::fixtures::BASIC_PROPERTIES;
use param_test_utils::store::seeded_store;
use pretty_assertions::assert_eq;
use serde_json::json;

fn engine(store: &MemoryStore) -> SyncEngine<'_, MemoryStore> {
    SyncEngine::new(store, SyncSettings::default().with_prefix("cfg"))
}

#[test]
fn test_partial_failure_then_retry() {
    let store = MemoryStore::new();
    let engine = engine(&store);
    let local = engine.parse("app.yaml", "a: 1\nb: 2\nc: 3\n").unwrap();
    let failing = local.namespace().param_name("b");
    store.fail_on(failing.clone());

    let report = engine.push(&local, false).unwrap();
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, failing);

    // The retry only touches what failed
    let remaining = engine.plan(&local).unwrap();
    assert_eq!(remaining.changes().count(), 1);
}

#[test]
fn test_report_serializes_for_embedders() {
    let store = MemoryStore::new();
    let engine = engine(&store);
    let local = engine.parse("app.yaml", "a: 1\n").unwrap();
    store.fail_on(local.namespace().param_name("a"));

    let report = engine.push(&local, false).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["dry_run"], json!(false));
    assert_eq!(value["applied"], json!([]));
    assert_eq!(
        value["failures"][0]["cause"],
        json!({"kind": "transport", "message": "injected failure for /cfg/prod/app.yaml/a"})
    );
    assert_eq!(report.failures[0].action, MutationAction::Create);
}

#[test]
fn test_properties_and_yaml_share_a_store() {
    let store = MemoryStore::new();
    let engine = engine(&store);

    let props = engine.parse("people.properties", BASIC_PROPERTIES).unwrap();
    let yaml = engine.parse("people.yaml", "name: Sebastian\nkids: [Ann, Bob]\n").unwrap();
    assert!(engine.push(&props, false).unwrap().success());
    assert!(engine.push(&yaml, false).unwrap().success());

    assert_eq!(engine.fetch(props.namespace()).unwrap().len(), 2);
    assert_eq!(engine.fetch(yaml.namespace()).unwrap().len(), 3);
    assert_eq!(
        store.get("/cfg/prod/people.yaml/kids/1").unwrap().as_deref(),
        Some("Bob")
    );
}

#[test]
fn test_sparse_sequence_restores_with_gaps() {
    let store = MemoryStore::new();
    let engine = engine(&store);
    let ns = engine.namespace("app.yaml").unwrap();
    store.seed(ns.param_name("list/0"), "first");
    store.seed(ns.param_name("list/2"), "third");

    let restored = engine.restore(&ns).unwrap();
    let tree = param_tree::FileFormat::Nested
        .handler()
        .parse(&restored)
        .unwrap();
    let expected = param_tree::ValueNode::from(json!({"list": ["first", null, "third"]}));
    assert_eq!(tree, expected);
}

#[test]
fn test_leaf_and_branch_conflict_fails_restore() {
    let store = MemoryStore::new();
    let engine = engine(&store);
    let ns = engine.namespace("app.yaml").unwrap();
    store.seed(ns.param_name("a"), "leaf");
    store.seed(ns.param_name("a/b"), "branch");

    let err = engine.restore(&ns).unwrap_err();
    assert!(matches!(
        err,
        Error::Tree(param_tree::Error::ShapeConflict { .. })
    ));
}

#[test]
fn test_listing_failure_stops_push() {
    let store = seeded_store(
        &SyncSettings::default().with_prefix("cfg").namespace("app.yaml").unwrap(),
        &[("a", "1")],
    );
    let engine = engine(&store);
    let local = engine.parse("app.yaml", "a: 2\n").unwrap();
    store.fail_on(local.namespace().request_path());

    let err = engine.push(&local, false).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Transport { .. })));
    assert_eq!(store.mutation_count(), 0);
}
