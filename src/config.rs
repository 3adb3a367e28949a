// Runtime configuration for the watchgate service

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{GateError, GateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sled,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Directory holding the sled database (catalog, audit trail, users).
    pub data_dir: String,
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    /// One of trace, debug, info, warn, error.
    pub log_level: String,
    /// Origins allowed by the CORS layer. Empty disables cross-origin access.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            backend: StoreBackend::Sled,
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            cors_origins: vec!["http://localhost:4200".to_string()],
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> GateResult<()> {
        if self.backend == StoreBackend::Sled && self.data_dir.trim().is_empty() {
            return Err(GateError::config("data_dir cannot be empty for the sled backend"));
        }
        if self.host.trim().is_empty() {
            return Err(GateError::config("host cannot be empty"));
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> GateResult<tracing::Level> {
        tracing::Level::from_str(self.log_level.trim())
            .map_err(|_| GateError::config(format!("unknown log_level '{}'", self.log_level)))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
