//! Mutual exclusion specs
//!
//! Several `tenure run` processes share one store. Each critical section
//! checks for a marker left by another holder, creates its own, lingers, and
//! removes it again.

use crate::prelude::*;

const SECTION: &str = r#"
if [ -e "$MARKER" ]; then echo overlap; fi
touch "$MARKER"
sleep 0.3
rm -f "$MARKER"
echo done
"#;

fn contender(store: &Store, owner: &str) -> std::process::Child {
    let marker = store.scratch().join("marker").display().to_string();
    store
        .tenure()
        .env("MARKER", &marker)
        .args(&[
            "run",
            "--key",
            "shared",
            "--owner",
            owner,
            "--lease",
            "1s",
            "--heartbeat",
            "200ms",
            "--attempts",
            "50",
            "--",
            "sh",
            "-c",
            SECTION,
        ])
        .spawn()
}

#[test]
fn concurrent_processes_take_turns() {
    let store = Store::empty();

    let children: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|owner| contender(&store, owner))
        .collect();

    let mut stdout = String::new();
    for child in children {
        let output = child.wait_with_output().unwrap();
        assert!(
            output.status.success(),
            "contender failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        stdout.push_str(&String::from_utf8_lossy(&output.stdout));
    }

    assert!(!stdout.contains("overlap"), "sections overlapped:\n{}", stdout);
    assert_eq!(stdout.matches("done").count(), 3);
}

#[test]
fn lock_is_free_again_after_all_contenders_finish() {
    let store = Store::empty();

    for owner in ["a", "b"] {
        let output = contender(&store, owner).wait_with_output().unwrap();
        assert!(output.status.success());
    }

    store
        .tenure()
        .args(&["show", "--key", "shared"])
        .passes()
        .stdout_has("shared: released by b");
}

#[test]
fn different_keys_do_not_block_each_other() {
    let store = Store::empty();
    let script = "sleep 0.5";

    let started = std::time::Instant::now();
    let children: Vec<_> = ["one", "two"]
        .iter()
        .map(|key| {
            store
                .tenure()
                .args(&["run", "--key", key, "--", "sh", "-c", script])
                .spawn()
        })
        .collect();
    for child in children {
        assert!(child.wait_with_output().unwrap().status.success());
    }

    // Serialized, the two would need a full default lease of waiting
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
