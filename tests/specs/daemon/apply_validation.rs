//! Structural manifest validation (C1) runs on the daemon before `apply`
//! touches the container engine, so these never need Docker — only a
//! running daemon, which `up`/`build` auto-start.

use crate::prelude::*;
use serial_test::serial;

fn assert_up_fails_with(project: &TestProject, needle: &str) {
    let assert = project.forge().arg("up").assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains(needle), "expected '{needle}' in: {stderr}");
}

#[test]
#[serial]
fn rejects_duplicate_node_names() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: dup-demo
services:
  - name: api
    image: "hello-world:latest"
databases:
  - name: api
    type: postgres
    version: "14"
"#,
    );
    assert_up_fails_with(&project, "duplicate node name");
}

#[test]
#[serial]
fn rejects_dependency_cycles() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: cycle-demo
services:
  - name: a
    image: "hello-world:latest"
    dependsOn: [b]
  - name: b
    image: "hello-world:latest"
    dependsOn: [a]
"#,
    );
    assert_up_fails_with(&project, "dependency cycle");
}

#[test]
#[serial]
fn rejects_ambiguous_service_source() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: ambiguous-demo
services:
  - name: api
    image: "hello-world:latest"
    path: "./api"
"#,
    );
    assert_up_fails_with(&project, "exactly one of image|path|repo");
}

#[test]
#[serial]
fn rejects_undefined_dependency() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: ghost-demo
services:
  - name: api
    image: "hello-world:latest"
    dependsOn: [ghost]
"#,
    );
    assert_up_fails_with(&project, "undefined node");
}

#[test]
#[serial]
fn rejects_data_store_missing_type_or_version() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 1
appName: nodb-demo
databases:
  - name: db
    type: postgres
"#,
    );
    assert_up_fails_with(&project, "must specify both 'type' and 'version'");
}

#[test]
#[serial]
fn rejects_unsupported_schema_version() {
    let project = TestProject::empty();
    project.manifest(
        r#"
version: 99
appName: future-demo
services:
  - name: api
    image: "hello-world:latest"
"#,
    );
    assert_up_fails_with(&project, "unsupported schema version");
}
