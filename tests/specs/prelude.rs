//! Shared test harness.
//!
//! Every project gets its own `FORGE_STATE_DIR` (so its ledger and log
//! never collide with another test's) and its own `FORGE_DAEMON_ADDR`
//! (so its daemon never collides with another test's on loopback).
//! `forge system stop` has no PID file to key on and falls back to
//! `pkill -f forged` (§9), which would also kill a daemon some other
//! test just spawned — tests that start a daemon take `#[serial]`.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};
use tempfile::TempDir;

static NEXT_PORT: AtomicU16 = AtomicU16::new(19_500);

pub const WAIT_MAX_MS: u64 = 5_000;

pub struct TestProject {
    dir: TempDir,
    addr: String,
}

impl TestProject {
    pub fn empty() -> Self {
        let port = NEXT_PORT.fetch_add(1, Ordering::SeqCst);
        TestProject {
            dir: TempDir::new().expect("tempdir"),
            addr: format!("127.0.0.1:{port}"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Write `contents` as `forge.yaml` in the project root.
    pub fn manifest(&self, contents: &str) -> &Self {
        std::fs::write(self.dir.path().join("forge.yaml"), contents).expect("write manifest");
        self
    }

    /// A `forge` invocation rooted at this project, isolated on its own
    /// state dir and daemon address.
    pub fn forge(&self) -> Command {
        let mut cmd = Command::cargo_bin("forge").expect("forge binary built");
        cmd.current_dir(self.dir.path())
            .env("FORGE_STATE_DIR", self.state_dir())
            .env("FORGE_DAEMON_ADDR", &self.addr)
            .env("FORGE_IPC_TIMEOUT_MS", "2000");
        cmd
    }

    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_dir().join("forged.log")).unwrap_or_default()
    }
}

impl Drop for TestProject {
    fn drop(&mut self) {
        let _ = self.forge().args(["system", "stop"]).ok();
    }
}

/// Poll `check` until it returns `true` or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if check() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
