//! End-to-end integration test for the push / restore cycle
//!
//! This test exercises the complete flow: settings loading -> file loading ->
//! push -> re-push -> restore.

use param_core::{DiffKind, MemoryStore, SyncEngine, SyncSettings, render_push, render_restore};
use param_test_utils::TestWorkspace;
use param_test_utils::fixtures::{BASIC_YAML, basic_yaml_restored};
use param_tree::FileFormat;
use pretty_assertions::assert_eq;

/// Set up a workspace with settings and one YAML file
fn setup_workspace() -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.write_settings("config/testing", "prod");
    ws.write("conf/some_file.yaml", BASIC_YAML);
    ws
}

#[test]
fn test_full_push_restore_cycle() {
    let ws = setup_workspace();
    let settings = SyncSettings::load(ws.path("settings.toml")).unwrap();
    let store = MemoryStore::with_page_size(4);
    let engine = SyncEngine::new(&store, settings);

    // 1. First push creates every parameter
    let local = engine.load(ws.path("conf/some_file.yaml")).unwrap();
    let diff = engine.plan(&local).unwrap();
    assert_eq!(diff.counts().add, local.entries().len());
    assert!(render_push(&diff).starts_with("Additions\n"));

    let report = engine.push(&local, false).unwrap();
    assert!(report.success());
    assert_eq!(store.len(), local.entries().len());

    // 2. Pushing the same file again changes nothing
    let mutations = store.mutation_count();
    let report = engine.push(&local, false).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(store.mutation_count(), mutations);

    // 3. Restore to a fresh location and compare trees
    engine
        .restore_to(local.namespace(), ws.path("restored/some_file.yaml"))
        .unwrap();
    let restored = FileFormat::Nested
        .handler()
        .parse(&ws.read("restored/some_file.yaml"))
        .unwrap();
    assert_eq!(restored, basic_yaml_restored());
}

#[test]
fn test_edit_then_push_updates_and_deletes() {
    let ws = setup_workspace();
    let store = MemoryStore::new();
    let engine = SyncEngine::new(&store, SyncSettings::load(ws.path("settings.toml")).unwrap());

    let local = engine.load(ws.path("conf/some_file.yaml")).unwrap();
    engine.push(&local, false).unwrap();

    // Drop one array element and change a value
    let edited = BASIC_YAML
        .replace("a_number: 45", "a_number: 46")
        .replace("    - orange\n", "");
    ws.write("conf/some_file.yaml", &edited);
    let local = engine.load(ws.path("conf/some_file.yaml")).unwrap();

    let diff = engine.plan(&local).unwrap();
    let counts = diff.counts();
    assert_eq!((counts.add, counts.update, counts.orphan), (0, 1, 1));
    assert_eq!(
        render_restore(&diff, local.namespace()),
        "Updates\n ~ a_number: 46 => 45\nAdded\n + some_sub_config.an_array.1: orange\n"
    );

    let report = engine.push(&local, false).unwrap();
    assert!(report.success());
    assert_eq!(report.succeeded(), 2);
    assert!(engine.plan(&local).unwrap().is_in_sync());
    assert_eq!(
        store.snapshot()[&local.namespace().param_name("a_number")],
        "46"
    );
}

#[test]
fn test_environments_are_isolated() {
    let store = MemoryStore::new();
    let prod = SyncEngine::new(&store, SyncSettings::default());
    let staging = SyncEngine::new(&store, SyncSettings::default().with_environment("staging"));

    let prod_local = prod.parse("app.yaml", "a: 1\nb: 2\n").unwrap();
    let staging_local = staging.parse("app.yaml", "a: 1\n").unwrap();
    prod.push(&prod_local, false).unwrap();

    let diff = staging.plan(&staging_local).unwrap();
    assert_eq!(
        diff.iter().map(|(_, e)| e.kind()).collect::<Vec<_>>(),
        vec![DiffKind::Add]
    );

    staging.push(&staging_local, false).unwrap();
    assert_eq!(store.len(), 3);
    assert!(prod.plan(&prod_local).unwrap().is_in_sync());
}
