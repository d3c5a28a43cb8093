//! `forge version` and `--help` never need a daemon.

use crate::prelude::*;

#[test]
fn version_prints_the_client_version() {
    let project = TestProject::empty();
    let assert = project.forge().arg("version").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.starts_with("forge "), "unexpected output: {stdout}");
}

#[test]
fn help_lists_every_subcommand() {
    let project = TestProject::empty();
    let assert = project.forge().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for subcommand in ["up", "down", "build", "ps", "inspect", "logs", "exec", "restart", "system"] {
        assert!(stdout.contains(subcommand), "--help missing '{subcommand}':\n{stdout}");
    }
}
