//! Lease inspection specs

use crate::prelude::*;

#[test]
fn show_empty_store() {
    Store::empty()
        .tenure()
        .args(&["show", "--key", "deploy"])
        .passes()
        .stdout_eq("deploy: free\n");
}

#[test]
fn show_after_run_reports_release() {
    let store = Store::empty();
    store
        .tenure()
        .args(&["run", "--key", "deploy", "--owner", "ci-1", "--", "true"])
        .passes();

    let json = store
        .tenure()
        .args(&["show", "--key", "deploy", "--format", "json"])
        .passes()
        .stdout();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["state"], "released");
    assert_eq!(value["owner"], "ci-1");
    assert_eq!(value["lease_ms"], 0);
}

const REGIONAL: &str = r#"
[key_schema]
partition_field = "lock_key"
sort_field = "region"
"#;

#[test]
fn sort_keys_are_separate_locks() {
    let store = Store::empty();
    let config = store.file("regional.toml", REGIONAL).display().to_string();
    store
        .tenure()
        .args(&["--config", &config, "run", "--key", "deploy", "--sort", "eu", "--", "true"])
        .passes();

    store
        .tenure()
        .args(&["--config", &config, "show", "--key", "deploy", "--sort", "us"])
        .passes()
        .stdout_eq("deploy/us: free\n");
    store
        .tenure()
        .args(&["--config", &config, "show", "--key", "deploy", "--sort", "eu"])
        .passes()
        .stdout_has("deploy/eu: released");
}

#[test]
fn sort_key_is_ignored_without_a_sort_field() {
    let store = Store::empty();
    store
        .tenure()
        .args(&["run", "--key", "deploy", "--sort", "eu", "--", "true"])
        .passes()
        .stderr_has("sort key ignored");

    store
        .tenure()
        .args(&["show", "--key", "deploy"])
        .passes()
        .stdout_has("deploy: released");
}
