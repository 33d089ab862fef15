//! Local copy of the last known dataset, used to start instantly.
//!
//! Last write wins; there is no expiry. A corrupt or unreadable file reads as
//! "no snapshot" and is overwritten by the next save.

use super::metrics::SNAPSHOT_WRITES_TOTAL;
use crate::models::Snapshot;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Narrow key-value store for the dataset snapshot.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Option<Snapshot>;

    fn save(&self, snapshot: &Snapshot);
}

/// Snapshot kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, snapshot: &Snapshot) -> std::io::Result<()> {
        let json = serde_json::to_vec(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Sibling temp file, then rename over the target.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to load cache");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to load cache");
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) {
        match self.write(snapshot) {
            Ok(()) => {
                SNAPSHOT_WRITES_TOTAL.with_label_values(&["ok"]).inc();
                tracing::debug!(path = %self.path.display(), "Snapshot saved");
            }
            Err(e) => {
                SNAPSHOT_WRITES_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to save cache");
            }
        }
    }
}

/// Snapshot held in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn save(&self, snapshot: &Snapshot) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(snapshot.clone());
            SNAPSHOT_WRITES_TOTAL.with_label_values(&["ok"]).inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("cache").join("data.json"));
        assert!(store.load().is_none());

        let snapshot = Snapshot {
            settings: Some(Settings {
                business_name: "Antler Ridge Taxidermy".to_string(),
                ..Settings::default()
            }),
            ..Snapshot::default()
        };
        store.save(&snapshot);

        assert_eq!(store.load(), Some(snapshot));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(FileSnapshotStore::new(&path).load().is_none());
    }

    #[test]
    fn memory_store_keeps_last_write() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().is_none());
        store.save(&Snapshot::default());
        assert_eq!(store.load(), Some(Snapshot::default()));
    }
}
