//! Differ tests against a live store

use std::collections::{BTreeMap, BTreeSet};

use param_core::{
    DiffEntry, DiffKind, Differ, Error, LocalConfig, Namespace, ParameterDiff, RemoteParameter,
    StoreError,
};
use param_test_utils::store::{paged_store, seeded_store};
use param_tree::Scalar;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn namespace() -> Namespace {
    Namespace::new("cfg", "prod", "app.yaml").unwrap()
}

fn local_params() -> BTreeMap<String, Scalar> {
    LocalConfig::parse(namespace(), "a:\n  b: 1\nc: [10, 20]\n")
        .unwrap()
        .to_params()
}

#[test]
fn test_scenario_diff_against_remote() {
    let ns = namespace();
    let store = seeded_store(&ns, &[("a/b", "1"), ("old", "x")]);

    let diff = Differ::new(&store).diff(&ns, &local_params()).unwrap();

    let classified: Vec<(String, DiffKind)> = diff
        .iter()
        .map(|(path, entry)| (ns.display_key(path), entry.kind()))
        .collect();
    assert_eq!(
        classified,
        vec![
            ("a.b".to_string(), DiffKind::Unchanged),
            ("c.0".to_string(), DiffKind::Add),
            ("c.1".to_string(), DiffKind::Add),
            ("old".to_string(), DiffKind::Orphan),
        ]
    );
    assert_eq!(
        diff.get(&ns.param_name("c/1")),
        Some(&DiffEntry::Add { value: "20".into() })
    );
}

#[test]
fn test_diff_ignores_other_namespaces() {
    let ns = namespace();
    let store = seeded_store(&ns, &[("a/b", "1")]);
    store.seed("/cfg/prod/other.yaml/a/b", "9");
    store.seed("/cfg/staging/app.yaml/a/b", "9");

    let diff = Differ::new(&store).diff(&ns, &local_params()).unwrap();
    assert_eq!(diff.len(), 3);
    assert_eq!(diff.counts().orphan, 0);
}

#[test]
fn test_diff_drains_every_page() {
    let ns = namespace();
    let remote: Vec<(String, String)> = (0..25)
        .map(|i| (format!("k{i:02}"), i.to_string()))
        .collect();
    let pairs: Vec<(&str, &str)> = remote
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let store = paged_store(&ns, 3, &pairs);

    let fetched = Differ::new(&store).fetch(&ns).unwrap();
    assert_eq!(fetched.len(), 25);

    let diff = Differ::new(&store).diff(&ns, &BTreeMap::new()).unwrap();
    assert_eq!(diff.counts().orphan, 25);
}

#[test]
fn test_listing_failure_aborts_diff() {
    let ns = namespace();
    let store = seeded_store(&ns, &[("a/b", "1")]);
    store.fail_on(ns.request_path());

    let err = Differ::new(&store).diff(&ns, &local_params()).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Transport { .. })));
}

fn side() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("/p/[a-e]", "[xy]", 0..5)
}

proptest! {
    #[test]
    fn test_every_name_classified_once(local in side(), remote in side()) {
        let local_scalars: BTreeMap<String, Scalar> = local
            .iter()
            .map(|(k, v)| (k.clone(), Scalar::from(v.as_str())))
            .collect();
        let diff = ParameterDiff::compute(
            &local_scalars,
            remote.iter().map(|(k, v)| RemoteParameter::new(k.clone(), v.clone())),
        );

        let names: BTreeSet<&String> = local.keys().chain(remote.keys()).collect();
        prop_assert_eq!(diff.len(), names.len());

        for (path, entry) in diff.iter() {
            let expected = match (local.get(path), remote.get(path)) {
                (Some(_), None) => DiffKind::Add,
                (None, Some(_)) => DiffKind::Orphan,
                (Some(l), Some(r)) if l == r => DiffKind::Unchanged,
                (Some(_), Some(_)) => DiffKind::Update,
                (None, None) => unreachable!(),
            };
            prop_assert_eq!(entry.kind(), expected);
        }
    }
}
