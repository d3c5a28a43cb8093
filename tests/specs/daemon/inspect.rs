//! `inspect`/`ps` reconcile the ledger against live engine state (S4);
//! `teardown` on an application with nothing in the ledger is a no-op
//! (it never reaches the container engine), so both run without Docker.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn ps_reports_no_resources_for_a_fresh_ledger() {
    let project = TestProject::empty();
    let assert = project.forge().arg("ps").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("No resources found."), "unexpected output: {stdout}");
}

#[test]
#[serial]
fn inspect_is_an_alias_of_ps() {
    let project = TestProject::empty();
    let assert = project.forge().arg("inspect").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("No resources found."), "unexpected output: {stdout}");
}

#[test]
#[serial]
fn teardown_of_an_untracked_application_succeeds_as_a_no_op() {
    let project = TestProject::empty();
    let assert = project.forge().args(["down", "never-applied"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("torn down"), "unexpected output: {stdout}");
}
