//! CLI surface smoke tests: the help output documents every workflow action
//! without needing a session or network.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn top_level_help_lists_the_command_surface() {
    Command::cargo_bin("drivedesk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("progress"));
}

#[test]
fn progress_help_lists_fetch_and_advance() {
    Command::cargo_bin("drivedesk")
        .unwrap()
        .args(["progress", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("advance"));
}

#[test]
fn advance_help_lists_one_subcommand_per_table_row() {
    let mut assert = Command::cargo_bin("drivedesk")
        .unwrap()
        .args([
            "progress",
            "advance",
            "--license-type",
            "learning",
            "--user-id",
            "U1",
            "--help",
        ])
        .assert()
        .success();

    for action in [
        "set-up-test",
        "rebook-slot",
        "assign-instructor",
        "mark-passed",
        "set-license-ready",
        "dispatch-license",
        "mark-delivered",
    ] {
        assert = assert.stdout(predicate::str::contains(action));
    }
}

#[test]
fn set_up_test_requires_its_three_fields() {
    Command::cargo_bin("drivedesk")
        .unwrap()
        .args([
            "progress",
            "advance",
            "--license-type",
            "learning",
            "--user-id",
            "U1",
            "set-up-test",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--application-id"));
}

#[test]
fn unknown_license_type_is_rejected_at_parse_time() {
    Command::cargo_bin("drivedesk")
        .unwrap()
        .args([
            "progress",
            "fetch",
            "--license-type",
            "motorcycle",
            "--user-id",
            "U1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown license type"));
}
