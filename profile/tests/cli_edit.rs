//! CLI tests for `profile validate` and `profile edit`.
//!
//! Spawns the profile binary and verifies exit codes and the stored snapshot
//! for saved, rejected and cancelled edits.

use std::process::{Command, Output};

use profile::exit_codes;
use profile::test_support::TestProject;

fn profile_cmd(project: &TestProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_profile"))
        .current_dir(project.path())
        .args(["--today", "2026-10-18"])
        .args(args)
        .output()
        .expect("run profile")
}

#[test]
fn validate_sample_profile_exits_ok() {
    let project = TestProject::new().expect("project");
    let output = profile_cmd(&project, &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
}

#[test]
fn edit_saves_and_prints_notification() {
    let project = TestProject::new().expect("project");
    let output = profile_cmd(
        &project,
        &["edit", "--set", "username=petrov", "--set", "experience=12"],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Profile saved\n");
    let stored = project.read_profile().expect("read");
    assert_eq!(stored.username, "petrov");
    assert_eq!(stored.experience, Some(12));
}

/// Experience above age is rejected with the rule's message and nothing is written.
#[test]
fn edit_rejected_exits_with_rejected_code() {
    let project = TestProject::new().expect("project");
    let before = project.read_profile().expect("read");

    let output = profile_cmd(
        &project,
        &["edit", "--set", "birthDate=1976-10-18", "--set", "experience=51"],
    );

    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("- experience: Experience cannot exceed age"), "{stderr}");
    assert_eq!(project.read_profile().expect("read"), before);
}

#[test]
fn edit_cancel_discards_changes() {
    let project = TestProject::new().expect("project");
    let before = project.read_profile().expect("read");
    let output = profile_cmd(&project, &["edit", "--set", "email=broken", "--cancel"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(project.read_profile().expect("read"), before);
}

#[test]
fn edit_unknown_field_is_invalid_input() {
    let project = TestProject::new().expect("project");
    let output = profile_cmd(&project, &["edit", "--set", "nickname=x"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}
