//! Common test utilities for taxitrack integration tests.
//!
//! `FakeSheet` is an in-process stand-in for the spreadsheet endpoint. It
//! speaks the same GET/POST action contract, keeps its own dataset, records
//! every request it sees, and can be switched into a failing mode.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use taxitrack::models::{
    deposit_fraction, Customer, CustomerForm, Estimate, EstimateForm, EstimateStatus,
    LineItemForm, PaymentForm, Project, ProjectStatus, Service, ServiceForm, Settings, Snapshot,
    Species, SpeciesForm,
};
use taxitrack::services::remote::ApiResponse;
use taxitrack::services::{conversion, ledger};
use taxitrack::services::{DataStore, MemorySnapshotStore, SheetsClient, SnapshotStore};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,taxitrack=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One request as the fake endpoint received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub action: String,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    data: Snapshot,
    /// Served verbatim by `getAllData` when set, for sheet-shaped rows.
    raw_data: Option<Value>,
    failing: bool,
    requests: Vec<RecordedRequest>,
    issued: u32,
}

impl FakeState {
    /// Server-side IDs look different from client ones so tests can tell
    /// which side assigned them.
    fn next_id(&mut self, prefix: &str) -> String {
        self.issued += 1;
        format!("{}-S{:03}", prefix, self.issued)
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeSheet {
    state: Shared,
    pub url: String,
}

impl FakeSheet {
    pub async fn spawn() -> Self {
        Self::spawn_with(Snapshot::default()).await
    }

    pub async fn spawn_with(data: Snapshot) -> Self {
        init_tracing();

        let state: Shared = Arc::new(Mutex::new(FakeState {
            data,
            ..FakeState::default()
        }));
        let app = Router::new()
            .route("/exec", get(handle_get).post(handle_post))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake sheet");
        let port = listener.local_addr().expect("No local address").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            state,
            url: format!("http://127.0.0.1:{}/exec", port),
        }
    }

    pub fn client(&self) -> SheetsClient {
        SheetsClient::new(Some(self.url.clone()))
    }

    /// Store wired to this endpoint and the given cache, not yet refreshed.
    pub fn store_with_cache(&self, cache: Arc<dyn SnapshotStore>) -> DataStore {
        DataStore::open(Arc::new(self.client()), cache)
    }

    /// Store wired to this endpoint and refreshed from it.
    pub async fn connected_store(&self) -> DataStore {
        let mut store = self.store_with_cache(Arc::new(MemorySnapshotStore::new()));
        store.refresh().await.expect("Initial refresh failed");
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Serve `value` as the `getAllData` payload instead of the dataset.
    pub fn set_raw_snapshot(&self, value: Value) {
        self.state.lock().unwrap().raw_data = Some(value);
    }

    pub fn data(&self) -> Snapshot {
        self.state.lock().unwrap().data.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.action).collect()
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable").into_response()
}

fn envelope(result: Result<Value, String>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::ok(data)).into_response(),
        Err(error) => Json(ApiResponse::<Value>::failure(error)).into_response(),
    }
}

async fn handle_get(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let action = params.get("action").cloned().unwrap_or_default();
    state.requests.push(RecordedRequest {
        method: "GET",
        action: action.clone(),
        content_type: None,
        body: Value::Null,
    });
    if state.failing {
        return unavailable();
    }

    let result = match action.as_str() {
        "testConnection" => Ok(json!({
            "connected": true,
            "needsSetup": state.data.settings.is_none(),
            "sheetName": "TaxiTrack Test",
        })),
        "getAllData" => match &state.raw_data {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_value(&state.data).map_err(|e| e.to_string()),
        },
        "getSettings" => state
            .data
            .settings
            .as_ref()
            .ok_or_else(|| "Settings not found".to_string())
            .and_then(|s| serde_json::to_value(s).map_err(|e| e.to_string())),
        other => Err(format!("Unknown action: {}", other)),
    };
    envelope(result)
}

async fn handle_post(State(state): State<Shared>, headers: HeaderMap, body: String) -> Response {
    let mut state = state.lock().unwrap();
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let action = body["action"].as_str().unwrap_or_default().to_string();
    state.requests.push(RecordedRequest {
        method: "POST",
        action: action.clone(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });
    if state.failing {
        return unavailable();
    }

    envelope(dispatch(&mut state, &action, &body))
}

fn data<T: DeserializeOwned>(body: &Value) -> Result<T, String> {
    serde_json::from_value(body["data"].clone()).map_err(|e| e.to_string())
}

fn param<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, String> {
    serde_json::from_value(body[key].clone()).map_err(|e| format!("{}: {}", key, e))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn dispatch(state: &mut FakeState, action: &str, body: &Value) -> Result<Value, String> {
    let now = Utc::now();
    match action {
        "setupDatabase" => Ok(json!({ "setup": true })),

        "updateSettings" => {
            let settings: Settings = data(body)?;
            state.data.settings = Some(settings.clone());
            to_value(&settings)
        }

        "addCustomer" => {
            let form: CustomerForm = data(body)?;
            let customer = form.into_customer(state.next_id("CUST"), now.date_naive());
            state.data.customers.push(customer.clone());
            to_value(&customer)
        }

        "updateCustomer" => {
            let customer: Customer = data(body)?;
            let slot = state
                .data
                .customers
                .iter_mut()
                .find(|c| c.customer_id == customer.customer_id)
                .ok_or("Customer not found")?;
            *slot = customer.clone();
            to_value(&customer)
        }

        "addService" => {
            let form: ServiceForm = data(body)?;
            let service = form.into_service(state.next_id("SVC"), now.date_naive());
            state.data.services.push(service.clone());
            to_value(&service)
        }

        "updateService" => {
            let service: Service = data(body)?;
            let slot = state
                .data
                .services
                .iter_mut()
                .find(|s| s.service_id == service.service_id)
                .ok_or("Service not found")?;
            *slot = service.clone();
            to_value(&service)
        }

        "addSpecies" => {
            let form: SpeciesForm = data(body)?;
            if let Some(existing) = state
                .data
                .species
                .iter()
                .find(|s| s.is_same(&form.category, &form.name))
            {
                return to_value(existing);
            }
            let species = Species {
                species_id: state.next_id("SP"),
                category: form.category,
                name: form.name,
                sort_order: state.data.species.len() as i32 + 1,
            };
            state.data.species.push(species.clone());
            to_value(&species)
        }

        "addEstimate" => {
            let form: EstimateForm = data(body)?;
            let estimate_id = state.next_id("EST");
            let total = ledger::document_total(&form.line_items);
            let estimate = Estimate {
                estimate_id: estimate_id.clone(),
                customer_id: form.customer_id,
                date_created: now.date_naive(),
                status: EstimateStatus::Draft,
                notes: form.notes,
                subtotal: total,
                tax_rate: Decimal::ZERO,
                total,
                converted_to_invoice_id: None,
                is_archived: false,
            };
            state.data.estimates.push(estimate.clone());
            state
                .data
                .estimate_line_items
                .extend(ledger::estimate_line_items(&estimate_id, &form.line_items, now));
            to_value(&estimate)
        }

        "updateEstimate" => {
            let mut estimate: Estimate = data(body)?;
            let lines: Vec<LineItemForm> = serde_json::from_value(body["data"]["line_items"].clone())
                .map_err(|e| e.to_string())?;
            let total = ledger::document_total(&lines);
            estimate.subtotal = total;
            estimate.total = total;

            let id = estimate.estimate_id.clone();
            let slot = state
                .data
                .estimates
                .iter_mut()
                .find(|e| e.estimate_id == id)
                .ok_or("Estimate not found")?;
            *slot = estimate.clone();
            state.data.estimate_line_items.retain(|li| li.estimate_id != id);
            state
                .data
                .estimate_line_items
                .extend(ledger::estimate_line_items(&id, &lines, now));
            to_value(&estimate)
        }

        "updateEstimateStatus" => {
            let id: String = param(body, "estimate_id")?;
            let status: EstimateStatus = param(body, "status")?;
            let estimate = state
                .data
                .estimates
                .iter_mut()
                .find(|e| e.estimate_id == id)
                .ok_or("Estimate not found")?;
            estimate.status = status;
            to_value(&*estimate)
        }

        "convertEstimateToInvoice" => {
            let id: String = param(body, "estimate_id")?;
            let fraction = deposit_fraction(state.data.settings.as_ref());
            let converted = conversion::convert_estimate(&state.data, &id, fraction, now)
                .map_err(|e| e.to_string())?;
            conversion::apply_conversion(&mut state.data, &id, &converted);
            // The script answers with the invoice and projects only.
            Ok(json!({
                "invoice": to_value(&converted.invoice)?,
                "projects": to_value(&converted.projects)?,
            }))
        }

        "addPayment" => {
            let form: PaymentForm = data(body)?;
            let payment_id = state.next_id("PAY");
            let invoice = state
                .data
                .invoices
                .iter_mut()
                .find(|i| i.invoice_id == form.invoice_id)
                .ok_or("Invoice not found")?;
            ledger::apply_payment(invoice, form.amount);
            let invoice = invoice.clone();
            let payment = form.into_payment(payment_id, now);
            state.data.payments.push(payment.clone());
            Ok(json!({
                "payment": to_value(&payment)?,
                "invoice": to_value(&invoice)?,
            }))
        }

        "updateProjectStatus" => {
            let id: String = param(body, "project_id")?;
            let status: ProjectStatus = param(body, "status")?;
            let notes = body.get("notes").and_then(Value::as_str);
            let project = state
                .data
                .projects
                .iter_mut()
                .find(|p| p.project_id == id)
                .ok_or("Project not found")?;
            project.set_status(status, notes, now);
            to_value(&*project)
        }

        "batchUpdateProjects" => {
            let ids: Vec<String> = param(body, "project_ids")?;
            let status: ProjectStatus = param(body, "status")?;
            let notes = body.get("notes").and_then(Value::as_str);
            let mut updated = Vec::new();
            for project in state
                .data
                .projects
                .iter_mut()
                .filter(|p| ids.contains(&p.project_id))
            {
                project.set_status(status, notes, now);
                updated.push(project.clone());
            }
            to_value(&updated)
        }

        other => Err(format!("Unknown action: {}", other)),
    }
}

// ==================== Fixtures ====================

pub fn customer_form(first_name: &str, last_name: &str) -> CustomerForm {
    CustomerForm {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: "5551234567".to_string(),
        ..CustomerForm::default()
    }
}

pub fn line(description: &str, quantity: Decimal, unit_price: Decimal) -> LineItemForm {
    LineItemForm {
        service_id: None,
        description: description.to_string(),
        species: Some("Whitetail Deer".to_string()),
        mount_type: Some("Shoulder".to_string()),
        quantity,
        unit_price,
    }
}

/// Two shoulder mounts at 100 and a plaque at 50: total 250.
pub fn deer_estimate(customer_id: &str) -> EstimateForm {
    EstimateForm {
        customer_id: customer_id.to_string(),
        notes: Some("Two bucks from opening weekend".to_string()),
        line_items: vec![
            line("Shoulder mount", dec!(2), dec!(100)),
            line("Antler plaque", dec!(1), dec!(50)),
        ],
    }
}

pub fn project(project_id: &str, status: ProjectStatus) -> Project {
    Project {
        project_id: project_id.to_string(),
        invoice_id: "INV-S900".to_string(),
        customer_id: "CUST-S900".to_string(),
        species: Some("Wood Duck".to_string()),
        mount_type: Some("Flying".to_string()),
        description: "Flying duck mount".to_string(),
        status,
        status_updated_at: Utc::now(),
        notes: None,
        completed_at: None,
        is_archived: false,
    }
}

pub fn species(species_id: &str, category: &str, name: &str) -> Species {
    Species {
        species_id: species_id.to_string(),
        category: category.to_string(),
        name: name.to_string(),
        sort_order: 1,
    }
}
