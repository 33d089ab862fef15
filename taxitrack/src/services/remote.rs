//! Remote record store abstraction.
//!
//! The spreadsheet sits behind one HTTP endpoint that understands a fixed set
//! of named actions. This trait gives each action a typed method so the state
//! container can be driven by the real client or by anything else that speaks
//! the same contract.

use crate::models::{
    Conversion, ConnectionStatus, Customer, CustomerForm, Estimate, EstimateForm, EstimateStatus,
    EstimateUpdate, PaymentForm, PaymentReceipt, Project, ProjectStatus, Service, ServiceForm,
    SetupResult, Settings, Snapshot, Species, SpeciesForm,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for remote store operations.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("No API URL configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response for action '{0}'")]
    EmptyResponse(String),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::NotConfigured => "not_configured",
            RemoteError::Network(_) => "network",
            RemoteError::Api(_) => "api",
            RemoteError::EmptyResponse(_) => "empty",
            RemoteError::Decode(_) => "decode",
        }
    }
}

/// Response envelope every action answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Unwrap the envelope for `action`.
    pub fn into_result(self, action: &str) -> Result<T, RemoteError> {
        if !self.success {
            return Err(RemoteError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| RemoteError::EmptyResponse(action.to_string()))
    }
}

/// Named actions understood by the endpoint.
pub mod actions {
    pub const TEST_CONNECTION: &str = "testConnection";
    pub const SETUP_DATABASE: &str = "setupDatabase";
    pub const GET_ALL_DATA: &str = "getAllData";
    pub const GET_SETTINGS: &str = "getSettings";
    pub const UPDATE_SETTINGS: &str = "updateSettings";
    pub const ADD_CUSTOMER: &str = "addCustomer";
    pub const UPDATE_CUSTOMER: &str = "updateCustomer";
    pub const ADD_SERVICE: &str = "addService";
    pub const UPDATE_SERVICE: &str = "updateService";
    pub const ADD_SPECIES: &str = "addSpecies";
    pub const ADD_ESTIMATE: &str = "addEstimate";
    pub const UPDATE_ESTIMATE: &str = "updateEstimate";
    pub const UPDATE_ESTIMATE_STATUS: &str = "updateEstimateStatus";
    pub const CONVERT_ESTIMATE: &str = "convertEstimateToInvoice";
    pub const ADD_PAYMENT: &str = "addPayment";
    pub const UPDATE_PROJECT_STATUS: &str = "updateProjectStatus";
    pub const BATCH_UPDATE_PROJECTS: &str = "batchUpdateProjects";
}

/// Typed view of the remote spreadsheet.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn test_connection(&self) -> Result<ConnectionStatus, RemoteError>;

    async fn setup_database(&self) -> Result<SetupResult, RemoteError>;

    async fn get_all_data(&self) -> Result<Snapshot, RemoteError>;

    async fn get_settings(&self) -> Result<Settings, RemoteError>;

    async fn update_settings(&self, settings: &Settings) -> Result<Settings, RemoteError>;

    async fn add_customer(&self, form: &CustomerForm) -> Result<Customer, RemoteError>;

    async fn update_customer(&self, customer: &Customer) -> Result<Customer, RemoteError>;

    async fn add_service(&self, form: &ServiceForm) -> Result<Service, RemoteError>;

    async fn update_service(&self, service: &Service) -> Result<Service, RemoteError>;

    /// Idempotent by category and case-insensitive name.
    async fn add_species(&self, form: &SpeciesForm) -> Result<Species, RemoteError>;

    async fn add_estimate(&self, form: &EstimateForm) -> Result<Estimate, RemoteError>;

    async fn update_estimate(&self, update: &EstimateUpdate) -> Result<Estimate, RemoteError>;

    async fn update_estimate_status(
        &self,
        estimate_id: &str,
        status: EstimateStatus,
    ) -> Result<Estimate, RemoteError>;

    async fn convert_estimate_to_invoice(&self, estimate_id: &str)
        -> Result<Conversion, RemoteError>;

    async fn add_payment(&self, form: &PaymentForm) -> Result<PaymentReceipt, RemoteError>;

    async fn update_project_status(
        &self,
        project_id: &str,
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Project, RemoteError>;

    async fn batch_update_projects(
        &self,
        project_ids: &[String],
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Vec<Project>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_envelope_carries_message() {
        let response: ApiResponse<Settings> =
            serde_json::from_str(r#"{"success": false, "error": "Sheet not found"}"#).unwrap();
        match response.into_result(actions::GET_SETTINGS) {
            Err(RemoteError::Api(msg)) => assert_eq!(msg, "Sheet not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn success_without_data_is_empty_response() {
        let response: ApiResponse<Settings> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        let err = response.into_result(actions::GET_SETTINGS).unwrap_err();
        assert_eq!(err.kind(), "empty");
    }
}
