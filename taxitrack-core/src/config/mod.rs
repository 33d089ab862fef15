use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Spreadsheet endpoint URL. Takes precedence over the stored endpoint.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Where the local dataset snapshot is written.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Where an endpoint set from the command line is remembered.
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("taxitrack_data_cache.json")
}

fn default_endpoint_path() -> PathBuf {
    PathBuf::from("taxitrack_api_url")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            cache_path: default_cache_path(),
            endpoint_path: default_endpoint_path(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("taxitrack").required(false))
            .add_source(
                config::Environment::with_prefix("TAXITRACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Endpoint to talk to: the configured URL, else the stored one.
    pub fn resolve_endpoint(&self) -> Option<String> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .or_else(|| StoredEndpoint::new(&self.endpoint_path).get())
    }
}

/// Endpoint URL remembered on disk between runs.
#[derive(Debug, Clone)]
pub struct StoredEndpoint {
    path: PathBuf,
}

impl StoredEndpoint {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn get(&self) -> Option<String> {
        let url = std::fs::read_to_string(&self.path).ok()?;
        let url = url.trim();
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }

    pub fn set(&self, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Endpoint URL must not be empty"
            )));
        }
        std::fs::write(&self.path, url)?;
        tracing::info!(path = %self.path.display(), "Stored endpoint updated");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
