//! Configuration module for taxitrack.

use std::env;
use taxitrack_core::config as core_config;
use taxitrack_core::error::AppError;
use taxitrack_core::observability::LogFormat;

#[derive(Debug, Clone)]
pub struct TaxitrackConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl TaxitrackConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let log_format = match env::var("LOG_FORMAT") {
            Ok(value) => value
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "taxitrack".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format,
        })
    }

    /// Endpoint in effect: configured URL, else the stored one.
    pub fn endpoint(&self) -> Option<String> {
        self.common.resolve_endpoint()
    }

    pub fn stored_endpoint(&self) -> core_config::StoredEndpoint {
        core_config::StoredEndpoint::new(&self.common.endpoint_path)
    }
}
