//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    Store::empty()
        .tenure()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn zero_attempts_is_rejected_before_touching_the_store() {
    let store = Store::empty();

    store
        .tenure()
        .args(&["run", "--key", "k", "--attempts", "0", "--", "true"])
        .exits(78)
        .stderr_has("max acquisition attempts must be at least 1");

    store.tenure().args(&["show", "--key", "k"]).passes().stdout_eq("k: free\n");
}

#[test]
fn unparsable_settings_file_names_the_file() {
    let store = Store::empty();
    let config = store.file("bad.toml", "lease_duration = \"forever\"\n");

    store
        .tenure()
        .args(&["--config", &config.display().to_string(), "show", "--key", "k"])
        .exits(78)
        .stderr_has("bad.toml");
}

#[test]
fn missing_settings_file_fails() {
    let store = Store::empty();
    let missing = store.scratch().join("nope.toml");

    store
        .tenure()
        .args(&["--config", &missing.display().to_string(), "show", "--key", "k"])
        .exits(1)
        .stderr_has("failed to read settings");
}

#[test]
fn unstartable_command_is_reported() {
    Store::empty()
        .tenure()
        .args(&["run", "--key", "k", "--", "/definitely/not/a/program"])
        .exits(1)
        .stderr_has("failed to start");
}
