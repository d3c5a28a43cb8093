//! Manifest decode errors (§4.1) are caught client-side, before the
//! manifest ever reaches the daemon — these never need one running.

use crate::prelude::*;

#[test]
fn missing_manifest_file_is_a_clear_error() {
    let project = TestProject::empty();
    let assert = project.forge().arg("up").assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("forge.yaml"), "unexpected stderr: {stderr}");
}

#[test]
fn malformed_yaml_is_a_clear_error() {
    let project = TestProject::empty();
    project.manifest("not: [valid, yaml: at all");
    let assert = project.forge().arg("up").assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("error:"), "unexpected stderr: {stderr}");
}

#[test]
fn custom_file_flag_is_honored() {
    let project = TestProject::empty();
    let assert = project.forge().args(["-f", "custom.yaml", "up"]).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("custom.yaml"), "should reference the -f path, not the default: {stderr}");
}
