// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for team record administration

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{data_dir, run, tsync, tsync_process};
use predicates::prelude::*;

// ============================================================================
// Membership
// ============================================================================

#[test]
fn join_is_idempotent_and_persists() {
    let dir = data_dir();

    tsync(dir.path())
        .args(["join", "s42p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Joined s42p1 to team 42 (1 participants)"));
    run(dir.path(), &["join", "s42p2"]);
    tsync(dir.path())
        .args(["join", "s42p2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 participants)"));

    tsync(dir.path())
        .args(["show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Participants: s42p1, s42p2"))
        .stdout(predicate::str::contains("Test: PracArea (screen 1)"))
        .stdout(predicate::str::contains("Next idea id: 1"));
}

#[test]
fn concurrent_joins_are_all_kept() {
    let dir = data_dir();

    let children: Vec<_> = (1..=6)
        .map(|user| {
            tsync_process(dir.path())
                .args(["join", &format!("s42p{user}")])
                .stdout(std::process::Stdio::null())
                .spawn()
                .unwrap()
        })
        .collect();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    tsync(dir.path())
        .args(["show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Participants: s42p1, s42p2, s42p3, s42p4, s42p5, s42p6",
        ));
}

#[test]
fn leave_removes_only_members() {
    let dir = data_dir();
    run(dir.path(), &["join", "s7p1"]);
    run(dir.path(), &["join", "s7p2"]);

    tsync(dir.path())
        .args(["leave", "s7p2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed s7p2 from team 7"));
    tsync(dir.path())
        .args(["leave", "s7p9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not a member"));

    let shown = run(dir.path(), &["show", "7"]);
    assert!(shown.contains("Participants: s7p1\n"), "got: {shown}");
}

#[test]
fn show_lists_teams() {
    let dir = data_dir();
    tsync(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No teams"));

    run(dir.path(), &["join", "s3p1"]);
    run(dir.path(), &["join", "s12p1"]);

    let listing = run(dir.path(), &["show"]);
    let teams: Vec<_> = listing
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(teams, vec!["3", "12"]);
}

#[test]
fn show_json_is_the_record() {
    let dir = data_dir();
    run(dir.path(), &["join", "s42p1"]);

    let out = run(dir.path(), &["--format", "json", "show", "42"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["team"], 42);
    assert_eq!(json["Participants"], serde_json::json!(["s42p1"]));
    assert_eq!(json["IdeaId"], 1);
    assert_eq!(json["TestsOrder"].as_array().unwrap().len(), 7);
}

#[test]
fn invalid_access_code_is_rejected() {
    let dir = data_dir();
    tsync(dir.path())
        .args(["join", "team42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid access code"));
}

// ============================================================================
// Readiness
// ============================================================================

#[test]
fn ready_waits_for_everyone() {
    let dir = data_dir();
    run(dir.path(), &["join", "s42p1"]);
    run(dir.path(), &["join", "s42p2"]);

    tsync(dir.path())
        .args(["ready", "s42p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 1/2 ready in team 42"));
    tsync(dir.path())
        .args(["ready", "s42p2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Granted: team 42 may proceed"));

    tsync(dir.path())
        .args(["show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready: -"));
}

#[test]
fn ready_for_unknown_team_fails() {
    let dir = data_dir();
    tsync(dir.path())
        .args(["ready", "s5p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team 5 has no record"));
}

// ============================================================================
// Reset and delete
// ============================================================================

#[test]
fn reset_keeps_order_and_clears_members() {
    let dir = data_dir();
    run(dir.path(), &["join", "s42p1"]);
    let order_line = |shown: &str| {
        shown
            .lines()
            .find(|l| l.trim_start().starts_with("Order:"))
            .map(String::from)
            .unwrap()
    };
    let before = order_line(&run(dir.path(), &["show", "42"]));

    tsync(dir.path())
        .args(["reset", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset team 42"));

    let after = run(dir.path(), &["show", "42"]);
    assert_eq!(order_line(&after), before);
    assert!(after.contains("Participants: -"), "got: {after}");
}

#[test]
fn delete_removes_record_and_background() {
    let dir = data_dir();
    run(dir.path(), &["join", "s42p1"]);

    tsync(dir.path())
        .args(["delete", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted team 42"));
    tsync(dir.path())
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team 42 has no record"));
    tsync(dir.path()).args(["delete", "42"]).assert().failure();
}

// ============================================================================
// Ordering and configuration
// ============================================================================

#[test]
fn order_is_deterministic_with_fixed_anchors() {
    let dir = data_dir();
    let first = run(dir.path(), &["order", "7"]);
    let again = run(dir.path(), &["order", "7"]);
    let other = run(dir.path(), &["order", "8"]);

    assert_eq!(first, again);
    assert_ne!(first, other);
    for order in [&first, &other] {
        assert!(order.starts_with("PracArea -> "), "got: {order}");
        assert!(order.trim_end().ends_with(" -> PicCon"), "got: {order}");
    }
}

#[test]
fn team_zero_is_rejected() {
    let dir = data_dir();

    tsync(dir.path()).args(["order", "0"]).assert().failure();
    tsync(dir.path()).args(["join", "s0p1"]).assert().failure();
}

#[test]
fn config_can_disable_randomized_order() {
    let dir = data_dir();
    std::fs::write(
        dir.path().join("tsync.toml"),
        "[test_order]\nrandomized = false\n",
    )
    .unwrap();

    tsync(dir.path())
        .args(["order", "7"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "PracArea -> PicComp -> ParLines -> IdeaGen -> DesChal -> AltUses -> PicCon\n",
        ));
}

#[test]
fn invalid_config_is_reported() {
    let dir = data_dir();
    std::fs::write(dir.path().join("tsync.toml"), "lock_ttl = \"soon\"\n").unwrap();

    tsync(dir.path())
        .args(["show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tsync.toml"));
}
