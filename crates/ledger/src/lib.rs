//! Durable resource ledger: the ground truth for which artifacts this
//! system has created on the engine's behalf.
//!
//! The live set lives in memory behind a [`parking_lot::Mutex`] for O(1)
//! reads; every mutation is first appended to the on-disk [`wal::Wal`] and
//! `fsync`ed before the in-memory map is updated, so a crash between the
//! two never loses a committed row.

mod error;
mod resource;
mod wal;

pub use error::LedgerError;
pub use resource::{Resource, ResourceType, NETWORK_SERVICE_NAME};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use wal::{Wal, WalEntry};

/// Default ledger file location: `<home>/.forge/forge.db`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".forge").join("forge.db"))
}

/// The resource ledger: one row per artifact the engine has created for
/// this system. Safe to share across RPC handlers via `Arc<Ledger>`; all
/// mutation is serialized through the inner mutex.
pub struct Ledger {
    inner: Mutex<Inner>,
}

struct Inner {
    wal: Wal,
    by_id: HashMap<String, Resource>,
}

impl Ledger {
    /// Open (creating if absent) the ledger at `path`, replaying its WAL.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let (wal, entries) = Wal::open(path)?;
        let mut by_id = HashMap::new();
        for entry in entries {
            match entry {
                WalEntry::Add(resource) => {
                    by_id.insert(resource.resource_id.clone(), resource);
                }
                WalEntry::Remove { resource_id } => {
                    by_id.remove(&resource_id);
                }
            }
        }
        tracing::info!(path = %path.display(), rows = by_id.len(), "ledger opened");
        Ok(Ledger {
            inner: Mutex::new(Inner { wal, by_id }),
        })
    }

    /// Record a newly created artifact. Fails if `resource_id` is already
    /// present — the engine guarantees resource ids are globally unique, so
    /// a collision means the caller is re-adding a row it already owns.
    pub fn add(
        &self,
        app_name: &str,
        resource_type: ResourceType,
        resource_id: &str,
        service_name: &str,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        if inner.by_id.contains_key(resource_id) {
            return Err(LedgerError::AlreadyExists(resource_id.to_string()));
        }
        let resource = Resource {
            resource_id: resource_id.to_string(),
            app_name: app_name.to_string(),
            resource_type,
            service_name: service_name.to_string(),
            created_at: chrono::Utc::now(),
        };
        inner.wal.append(&WalEntry::Add(resource.clone()))?;
        inner.by_id.insert(resource_id.to_string(), resource);
        Self::maybe_compact(&mut inner)?;
        Ok(())
    }

    /// Remove a row by resource id. Idempotent on "already removed" is the
    /// caller's responsibility to check first via `list_by_app`; a second
    /// removal of the same id is reported as `NotFound`.
    pub fn remove_by_id(&self, resource_id: &str) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        if inner.by_id.remove(resource_id).is_none() {
            return Err(LedgerError::NotFound(resource_id.to_string()));
        }
        inner.wal.append(&WalEntry::Remove {
            resource_id: resource_id.to_string(),
        })?;
        Self::maybe_compact(&mut inner)?;
        Ok(())
    }

    /// All live resources for one application, in no particular order.
    pub fn list_by_app(&self, app_name: &str) -> Vec<Resource> {
        let inner = self.inner.lock();
        inner
            .by_id
            .values()
            .filter(|r| r.app_name == app_name)
            .cloned()
            .collect()
    }

    /// All live resources across every application.
    pub fn list_all(&self) -> Vec<Resource> {
        let inner = self.inner.lock();
        inner.by_id.values().cloned().collect()
    }

    /// Whether any resource is currently recorded for `app_name` — the
    /// check behind the I3 conflict invariant.
    pub fn has_app(&self, app_name: &str) -> bool {
        let inner = self.inner.lock();
        inner.by_id.values().any(|r| r.app_name == app_name)
    }

    /// Drop the in-memory state. The WAL file itself is left on disk for
    /// the next `open`; there is nothing else to flush since every mutation
    /// is already fsync'd synchronously.
    pub fn close(self) {
        drop(self.inner);
    }

    fn maybe_compact(inner: &mut Inner) -> Result<(), LedgerError> {
        if inner.wal.should_compact() {
            let live: Vec<Resource> = inner.by_id.values().cloned().collect();
            inner.wal.compact(live.into_iter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_in(dir: &tempfile::TempDir) -> Ledger {
        Ledger::open(&dir.path().join("forge.db")).unwrap()
    }

    #[test]
    fn add_then_list_by_app() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_in(&dir);
        ledger
            .add("demo", ResourceType::Network, "net-1", NETWORK_SERVICE_NAME)
            .unwrap();
        ledger.add("demo", ResourceType::Container, "ctr-1", "api").unwrap();
        ledger.add("other", ResourceType::Container, "ctr-2", "api").unwrap();

        let rows = ledger.list_by_app("demo");
        assert_eq!(rows.len(), 2);
        assert!(ledger.has_app("demo"));
        assert!(!ledger.has_app("nonexistent"));
    }

    #[test]
    fn duplicate_resource_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_in(&dir);
        ledger.add("demo", ResourceType::Container, "ctr-1", "api").unwrap();
        let err = ledger.add("demo", ResourceType::Container, "ctr-1", "api").unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyExists(_)));
    }

    #[test]
    fn remove_clears_app_down_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_in(&dir);
        ledger
            .add("demo", ResourceType::Network, "net-1", NETWORK_SERVICE_NAME)
            .unwrap();
        ledger.add("demo", ResourceType::Container, "ctr-1", "api").unwrap();

        ledger.remove_by_id("ctr-1").unwrap();
        ledger.remove_by_id("net-1").unwrap();

        assert!(ledger.list_by_app("demo").is_empty());
        assert!(!ledger.has_app("demo"));
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_in(&dir);
        let err = ledger.remove_by_id("ghost").unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.db");
        {
            let ledger = Ledger::open(&path).unwrap();
            ledger.add("demo", ResourceType::Network, "net-1", NETWORK_SERVICE_NAME).unwrap();
            ledger.add("demo", ResourceType::Container, "ctr-1", "api").unwrap();
            ledger.remove_by_id("ctr-1").unwrap();
            ledger.close();
        }
        let reopened = Ledger::open(&path).unwrap();
        let rows = reopened.list_by_app("demo");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resource_id, "net-1");
    }

    #[test]
    fn list_all_spans_applications() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open_in(&dir);
        ledger.add("demo", ResourceType::Network, "net-1", NETWORK_SERVICE_NAME).unwrap();
        ledger.add("other", ResourceType::Network, "net-2", NETWORK_SERVICE_NAME).unwrap();
        assert_eq!(ledger.list_all().len(), 2);
    }
}
