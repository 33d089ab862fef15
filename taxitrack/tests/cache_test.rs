mod common;

use chrono::NaiveDate;
use common::{customer_form, FakeSheet};
use std::sync::Arc;
use taxitrack::models::Snapshot;
use taxitrack::services::{
    DataStore, FileSnapshotStore, MemorySnapshotStore, SheetsClient, SnapshotStore,
};

#[tokio::test]
async fn refresh_writes_snapshot_that_seeds_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("taxitrack_data_cache.json");

    let sheet = FakeSheet::spawn().await;
    let mut store = sheet.store_with_cache(Arc::new(FileSnapshotStore::new(&cache_path)));
    assert!(store.is_loading());
    store.refresh().await.expect("Refresh failed");
    store
        .add_customer(customer_form("Ruth", "Olsen"))
        .await
        .expect("Failed to add customer");
    assert!(cache_path.exists());

    // Next start has no endpoint at all and still sees the data.
    let reopened = DataStore::open(
        Arc::new(SheetsClient::new(None)),
        Arc::new(FileSnapshotStore::new(&cache_path)),
    );
    assert!(!reopened.is_loading());
    assert!(reopened.is_connected());
    assert_eq!(reopened.data().customers.len(), 1);
    assert_eq!(reopened.data().customers[0].first_name, "Ruth");
}

#[tokio::test]
async fn nothing_is_written_before_first_successful_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    let sheet = FakeSheet::spawn().await;
    sheet.set_failing(true);
    let mut store = sheet.store_with_cache(Arc::new(FileSnapshotStore::new(&cache_path)));

    assert!(store.refresh().await.is_err());
    let customer = store
        .add_customer(customer_form("Ruth", "Olsen"))
        .await
        .expect("Customer should be kept locally");

    assert!(store.customer(&customer.customer_id).is_some());
    assert!(!store.is_connected());
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    std::fs::write(&cache_path, "{\"customers\": [").unwrap();

    let store = DataStore::open(
        Arc::new(SheetsClient::new(None)),
        Arc::new(FileSnapshotStore::new(&cache_path)),
    );
    assert!(store.is_loading());
    assert_eq!(store.data(), &Snapshot::default());
}

#[tokio::test]
async fn snapshot_file_uses_camel_case_collections() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileSnapshotStore::new(dir.path().join("cache.json"));
    cache.save(&Snapshot::default());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
    assert!(raw.get("estimateLineItems").is_some());
    assert!(raw.get("mountTypes").is_some());
}

#[tokio::test]
async fn blank_date_cells_do_not_sink_refresh() {
    let sheet = FakeSheet::spawn().await;
    sheet.set_raw_snapshot(serde_json::json!({
        "customers": [{
            "customer_id": "CUST-1", "first_name": "Ruth", "last_name": "Olsen",
            "phone": 5551234, "created_at": "", "is_archived": "FALSE"
        }],
        "estimates": [{
            "estimate_id": "EST-1", "customer_id": "CUST-1", "date_created": "",
            "status": "Draft", "subtotal": 650, "tax_rate": 0, "total": 650
        }],
        "invoices": [{
            "invoice_id": "INV-1", "customer_id": "CUST-1", "date_created": "",
            "status": "Unpaid", "total": 650, "balance_due": 650
        }],
        "payments": [{
            "payment_id": "PAY-1", "invoice_id": "INV-1", "date": "",
            "amount": 100, "method": "Cash", "created_at": ""
        }],
        "projects": [{
            "project_id": "26.01", "invoice_id": "INV-1", "customer_id": "CUST-1",
            "description": "Whitetail shoulder mount", "status": "Received",
            "status_updated_at": ""
        }]
    }));

    let mut store = sheet.store_with_cache(Arc::new(MemorySnapshotStore::new()));
    store
        .add_customer(customer_form("Local", "Only"))
        .await
        .expect("Customer should be kept locally");
    store.refresh().await.expect("Refresh failed");

    let data = store.data();
    assert!(store.is_connected());
    assert_eq!(data.customers.len(), 1);
    assert_eq!(data.customers[0].first_name, "Ruth");
    assert_eq!(data.customers[0].phone, "5551234");
    assert_eq!(
        data.customers[0].created_at,
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
    );
    assert_eq!(data.estimates[0].date_created, data.customers[0].created_at);
    assert_eq!(data.invoices[0].date_created, data.customers[0].created_at);
    assert_eq!(data.payments[0].date, data.customers[0].created_at);
    assert_eq!(data.payments[0].created_at.timestamp(), 0);
    assert_eq!(data.projects[0].status_updated_at.timestamp(), 0);
}
