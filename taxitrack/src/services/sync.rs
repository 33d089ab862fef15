//! Per-record sync status for optimistic writes.
//!
//! Optimistic records are never rolled back. Each one is tracked here as
//! pending until the remote store confirms it, or failed if the remote call
//! did not succeed; a full refresh replaces local state with server truth and
//! clears the tracker.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Customer,
    Service,
    Species,
    Estimate,
    Invoice,
    Payment,
    Project,
    Settings,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Customer => "customer",
            RecordKind::Service => "service",
            RecordKind::Species => "species",
            RecordKind::Estimate => "estimate",
            RecordKind::Invoice => "invoice",
            RecordKind::Payment => "payment",
            RecordKind::Project => "project",
            RecordKind::Settings => "settings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    Confirmed,
    Failed,
}

/// A record whose remote write did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    pub kind: RecordKind,
    pub id: String,
}

#[derive(Debug, Default, Clone)]
pub struct SyncTracker {
    records: BTreeMap<(RecordKind, String), SyncStatus>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&mut self, kind: RecordKind, id: &str) {
        self.records
            .insert((kind, id.to_string()), SyncStatus::Pending);
    }

    /// Confirm `id`. When the server assigned a different ID, the optimistic
    /// entry is dropped and the confirmed one recorded instead.
    pub fn confirmed(&mut self, kind: RecordKind, optimistic_id: &str, confirmed_id: &str) {
        if optimistic_id != confirmed_id {
            self.records.remove(&(kind, optimistic_id.to_string()));
        }
        self.records
            .insert((kind, confirmed_id.to_string()), SyncStatus::Confirmed);
    }

    pub fn failed(&mut self, kind: RecordKind, id: &str) {
        self.records
            .insert((kind, id.to_string()), SyncStatus::Failed);
    }

    pub fn status(&self, kind: RecordKind, id: &str) -> Option<SyncStatus> {
        self.records.get(&(kind, id.to_string())).copied()
    }

    pub fn failed_records(&self) -> Vec<FailedRecord> {
        self.records
            .iter()
            .filter(|(_, status)| **status == SyncStatus::Failed)
            .map(|((kind, id), _)| FailedRecord {
                kind: *kind,
                id: id.clone(),
            })
            .collect()
    }

    pub fn has_unconfirmed(&self) -> bool {
        self.records
            .values()
            .any(|status| *status != SyncStatus::Confirmed)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
