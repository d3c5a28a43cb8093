//! Append-only write-ahead log backing the resource ledger.
//!
//! Every mutation is one JSON line, `fsync`ed before the call that produced
//! it returns — that `fsync` is the entire durability contract. The full
//! live set is rebuilt by replaying the log on open; once the log grows
//! past [`COMPACT_THRESHOLD`] lines it is rewritten down to just the live
//! rows, the same snapshot-style compaction idea as the rest of the stack,
//! scaled down to a single table.

use crate::error::LedgerError;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Rewrite the log once it holds more than this many lines (live + dead).
pub const COMPACT_THRESHOLD: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum WalEntry {
    Add(Resource),
    Remove { resource_id: String },
}

pub struct Wal {
    path: PathBuf,
    file: File,
    /// Lines written since open/compaction; drives the compaction threshold.
    line_count: usize,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`, replaying every entry
    /// found into the returned `Vec` in file order.
    pub fn open(path: &Path) -> Result<(Self, Vec<WalEntry>), LedgerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = fs::metadata(parent)?.permissions();
                perms.set_mode(0o755);
                fs::set_permissions(parent, perms)?;
            }
        }

        let mut entries = Vec::new();
        let mut line_count = 0;
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let entry: WalEntry = serde_json::from_str(&line)
                    .map_err(|source| LedgerError::Corrupt { line: idx + 1, source })?;
                entries.push(entry);
                line_count += 1;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok((
            Wal {
                path: path.to_path_buf(),
                file,
                line_count,
            },
            entries,
        ))
    }

    /// Append one entry, fsync'd before returning.
    pub fn append(&mut self, entry: &WalEntry) -> Result<(), LedgerError> {
        let mut line = serde_json::to_string(entry).map_err(|source| LedgerError::Corrupt { line: 0, source })?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_data()?;
        self.line_count += 1;
        Ok(())
    }

    pub fn should_compact(&self) -> bool {
        self.line_count > COMPACT_THRESHOLD
    }

    /// Rewrite the log to hold exactly one `Add` per currently-live
    /// resource, via a temp-file-plus-rename so a crash mid-compaction
    /// never truncates the log a reader could be replaying.
    pub fn compact(&mut self, live: impl Iterator<Item = Resource>) -> Result<(), LedgerError> {
        let tmp_path = self.path.with_extension("db.compact");
        let mut tmp = File::create(&tmp_path)?;
        let mut count = 0;
        for resource in live {
            let mut line = serde_json::to_string(&WalEntry::Add(resource))
                .map_err(|source| LedgerError::Corrupt { line: 0, source })?;
            line.push('\n');
            tmp.write_all(line.as_bytes())?;
            count += 1;
        }
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.line_count = count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceType, NETWORK_SERVICE_NAME};
    use chrono::Utc;

    fn resource(id: &str) -> Resource {
        Resource {
            resource_id: id.into(),
            app_name: "demo".into(),
            resource_type: ResourceType::Network,
            service_name: NETWORK_SERVICE_NAME.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replays_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.db");

        let (mut wal, entries) = Wal::open(&path).unwrap();
        assert!(entries.is_empty());
        wal.append(&WalEntry::Add(resource("net-1"))).unwrap();
        wal.append(&WalEntry::Remove { resource_id: "net-1".into() }).unwrap();
        drop(wal);

        let (_, entries) = Wal::open(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], WalEntry::Add(_)));
        assert!(matches!(entries[1], WalEntry::Remove { .. }));
    }

    #[test]
    fn compaction_keeps_only_live_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.db");

        let (mut wal, _) = Wal::open(&path).unwrap();
        wal.append(&WalEntry::Add(resource("net-1"))).unwrap();
        wal.append(&WalEntry::Add(resource("net-2"))).unwrap();
        wal.append(&WalEntry::Remove { resource_id: "net-1".into() }).unwrap();

        wal.compact(vec![resource("net-2")].into_iter()).unwrap();
        drop(wal);

        let (_, entries) = Wal::open(&path).unwrap();
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            WalEntry::Add(r) => assert_eq!(r.resource_id, "net-2"),
            other => panic!("expected Add, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_line_is_reported_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.db");
        std::fs::write(&path, "not json\n").unwrap();

        let err = Wal::open(&path).unwrap_err();
        match err {
            LedgerError::Corrupt { line, .. } => assert_eq!(line, 1),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }
}
