//! Help output specs

use crate::prelude::*;

#[test]
fn top_level_help_lists_commands() {
    Store::empty()
        .tenure()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("show")
        .stdout_has("completions")
        .stdout_has("--store");
}

#[test]
fn run_help_describes_timing_flags() {
    Store::empty()
        .tenure()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--lease")
        .stdout_has("--heartbeat")
        .stdout_has("--attempts");
}

#[test]
fn completions_are_generated() {
    Store::empty()
        .tenure()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("tenure");
}
