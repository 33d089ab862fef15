//! Services module for taxitrack.

pub mod catalog;
pub mod conversion;
pub mod data_store;
pub mod ledger;
pub mod metrics;
pub mod remote;
pub mod reports;
pub mod sheets_client;
pub mod snapshot_store;
pub mod sync;

pub use data_store::DataStore;
pub use metrics::{get_metrics, init_metrics};
pub use remote::{RemoteError, RemoteStore};
pub use sheets_client::SheetsClient;
pub use snapshot_store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use sync::{RecordKind, SyncStatus};
