//! `forge system start|stop|status` (§6, §9): the daemon has no PID
//! file, so every test in this module runs `#[serial]` — `system stop`
//! falls back to killing every `forged` process by name and would
//! otherwise reach into a sibling test's daemon.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn status_reports_not_running_before_start() {
    let project = TestProject::empty();
    let assert = project.forge().args(["system", "status"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("not running"), "unexpected output: {stdout}");
}

#[test]
#[serial]
fn start_then_status_reports_running() {
    let project = TestProject::empty();
    project.forge().args(["system", "start"]).assert().success();

    let running = wait_for(WAIT_MAX_MS, || {
        let assert = project.forge().args(["system", "status"]).assert().success();
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        stdout.contains("running") && !stdout.contains("not running")
    });
    assert!(running, "daemon should report running after system start");
}

#[test]
#[serial]
fn stop_after_start_returns_to_not_running() {
    let project = TestProject::empty();
    project.forge().args(["system", "start"]).assert().success();
    let _ = wait_for(WAIT_MAX_MS, || {
        project.forge().args(["system", "status"]).assert().success().get_output().stdout.starts_with(b"daemon running")
    });

    project.forge().args(["system", "stop"]).assert().success();

    let stopped = wait_for(WAIT_MAX_MS, || {
        let assert = project.forge().args(["system", "status"]).assert().success();
        String::from_utf8_lossy(&assert.get_output().stdout).contains("not running")
    });
    assert!(stopped, "daemon should report not running after system stop");
}

#[test]
#[serial]
fn up_auto_starts_the_daemon() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: autostart-demo
services:
  - name: web
    image: "does-not-matter:latest"
    port: 8080
    internalPort: 8080
"#,
    );

    // Apply runs asynchronously against whatever container engine is on
    // this machine, so its outcome isn't asserted here — only that `up`
    // reached the point of starting the daemon in the first place.
    project.forge().arg("up").assert();

    let started = wait_for(WAIT_MAX_MS, || {
        let assert = project.forge().args(["system", "status"]).assert().success();
        !String::from_utf8_lossy(&assert.get_output().stdout).contains("not running")
    });
    assert!(started, "`forge up` should have auto-started the daemon");
}
