//! HTTP client for the spreadsheet endpoint.
//!
//! Reads are `GET <url>?action=<name>`. Writes are `POST <url>` with a JSON
//! body sent as `text/plain`, the content type the script host accepts
//! without a preflight.

use super::metrics::{REMOTE_CALLS_TOTAL, REMOTE_CALL_DURATION};
use super::remote::{actions, ApiResponse, RemoteError, RemoteStore};
use crate::models::{
    Conversion, ConnectionStatus, Customer, CustomerForm, Estimate, EstimateForm, EstimateStatus,
    EstimateUpdate, PaymentForm, PaymentReceipt, Project, ProjectStatus, Service, ServiceForm,
    SetupResult, Settings, Snapshot, Species, SpeciesForm,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Spreadsheet API client.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    endpoint: Option<String>,
}

impl SheetsClient {
    /// Create a client; `None` leaves it unconfigured and every call short-circuits.
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Check if an endpoint is set.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn url(&self) -> Result<&str, RemoteError> {
        self.endpoint.as_deref().ok_or(RemoteError::NotConfigured)
    }

    async fn get<T: DeserializeOwned>(&self, action: &str) -> Result<T, RemoteError> {
        let url = self.url().map_err(|e| record_failure(action, e))?;
        let timer = REMOTE_CALL_DURATION
            .with_label_values(&[action])
            .start_timer();

        let result = async {
            let response = self
                .client
                .get(url)
                .query(&[("action", action)])
                .send()
                .await?;
            decode(action, response).await
        }
        .await;

        timer.observe_duration();
        record_result(action, result)
    }

    async fn post<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T, RemoteError> {
        let url = self.url().map_err(|e| record_failure(action, e))?;
        let timer = REMOTE_CALL_DURATION
            .with_label_values(&[action])
            .start_timer();

        let mut body = match params {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        body.insert("action".to_string(), Value::String(action.to_string()));

        let result = async {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "text/plain;charset=utf-8")
                .body(serde_json::to_string(&body)?)
                .send()
                .await?;
            decode(action, response).await
        }
        .await;

        timer.observe_duration();
        record_result(action, result)
    }
}

async fn decode<T: DeserializeOwned>(
    action: &str,
    response: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = response.status();
    let body = response.text().await?;

    tracing::debug!(action, status = %status, bytes = body.len(), "Remote response");

    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(envelope) => envelope.into_result(action),
        Err(_) if !status.is_success() => Err(RemoteError::Api(format!("HTTP {}", status))),
        Err(e) => Err(RemoteError::Decode(e)),
    }
}

fn record_failure(action: &str, error: RemoteError) -> RemoteError {
    REMOTE_CALLS_TOTAL
        .with_label_values(&[action, error.kind()])
        .inc();
    tracing::warn!(action, error = %error, "Remote call skipped");
    error
}

fn record_result<T>(action: &str, result: Result<T, RemoteError>) -> Result<T, RemoteError> {
    match &result {
        Ok(_) => {
            REMOTE_CALLS_TOTAL.with_label_values(&[action, "ok"]).inc();
            tracing::debug!(action, "Remote call succeeded");
        }
        Err(e) => {
            REMOTE_CALLS_TOTAL.with_label_values(&[action, e.kind()]).inc();
            tracing::error!(action, error = %e, "Remote call failed");
        }
    }
    result
}

#[async_trait]
impl RemoteStore for SheetsClient {
    async fn test_connection(&self) -> Result<ConnectionStatus, RemoteError> {
        self.get(actions::TEST_CONNECTION).await
    }

    async fn setup_database(&self) -> Result<SetupResult, RemoteError> {
        self.post(actions::SETUP_DATABASE, Value::Null).await
    }

    async fn get_all_data(&self) -> Result<Snapshot, RemoteError> {
        self.get(actions::GET_ALL_DATA).await
    }

    async fn get_settings(&self) -> Result<Settings, RemoteError> {
        self.get(actions::GET_SETTINGS).await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings, RemoteError> {
        self.post(actions::UPDATE_SETTINGS, json!({ "data": settings }))
            .await
    }

    async fn add_customer(&self, form: &CustomerForm) -> Result<Customer, RemoteError> {
        self.post(actions::ADD_CUSTOMER, json!({ "data": form })).await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<Customer, RemoteError> {
        self.post(actions::UPDATE_CUSTOMER, json!({ "data": customer }))
            .await
    }

    async fn add_service(&self, form: &ServiceForm) -> Result<Service, RemoteError> {
        self.post(actions::ADD_SERVICE, json!({ "data": form })).await
    }

    async fn update_service(&self, service: &Service) -> Result<Service, RemoteError> {
        self.post(actions::UPDATE_SERVICE, json!({ "data": service }))
            .await
    }

    async fn add_species(&self, form: &SpeciesForm) -> Result<Species, RemoteError> {
        self.post(actions::ADD_SPECIES, json!({ "data": form })).await
    }

    async fn add_estimate(&self, form: &EstimateForm) -> Result<Estimate, RemoteError> {
        self.post(actions::ADD_ESTIMATE, json!({ "data": form })).await
    }

    async fn update_estimate(&self, update: &EstimateUpdate) -> Result<Estimate, RemoteError> {
        self.post(actions::UPDATE_ESTIMATE, json!({ "data": update }))
            .await
    }

    async fn update_estimate_status(
        &self,
        estimate_id: &str,
        status: EstimateStatus,
    ) -> Result<Estimate, RemoteError> {
        self.post(
            actions::UPDATE_ESTIMATE_STATUS,
            json!({ "estimate_id": estimate_id, "status": status }),
        )
        .await
    }

    async fn convert_estimate_to_invoice(
        &self,
        estimate_id: &str,
    ) -> Result<Conversion, RemoteError> {
        self.post(
            actions::CONVERT_ESTIMATE,
            json!({ "estimate_id": estimate_id }),
        )
        .await
    }

    async fn add_payment(&self, form: &PaymentForm) -> Result<PaymentReceipt, RemoteError> {
        self.post(actions::ADD_PAYMENT, json!({ "data": form })).await
    }

    async fn update_project_status(
        &self,
        project_id: &str,
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Project, RemoteError> {
        let mut params = json!({ "project_id": project_id, "status": status });
        if let Some(notes) = notes {
            params["notes"] = Value::String(notes.to_string());
        }
        self.post(actions::UPDATE_PROJECT_STATUS, params).await
    }

    async fn batch_update_projects(
        &self,
        project_ids: &[String],
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Vec<Project>, RemoteError> {
        let mut params = json!({ "project_ids": project_ids, "status": status });
        if let Some(notes) = notes {
            params["notes"] = Value::String(notes.to_string());
        }
        self.post(actions::BATCH_UPDATE_PROJECTS, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured() {
        assert!(SheetsClient::new(Some("https://script.example.com/exec".to_string())).is_configured());
        assert!(!SheetsClient::new(Some("   ".to_string())).is_configured());
        assert!(!SheetsClient::new(None).is_configured());
    }

    #[tokio::test]
    async fn unconfigured_client_short_circuits() {
        let client = SheetsClient::new(None);
        let err = client.get_all_data().await.unwrap_err();
        assert!(matches!(err, RemoteError::NotConfigured));
    }
}
