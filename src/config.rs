//! Process-wide configuration.
//!
//! Built once at startup from the host-supplied plugin config (a JSON object),
//! optionally overlaid by CLI flags or environment, then frozen and shared by
//! reference with every handler.

use crate::constants::{network, protocols::ALLOWED_HTTP};
use crate::errors::ToolError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use url::Url;

#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WipConfig {
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,
}

impl WipConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn from_value(value: &Value) -> Result<Self, ToolError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|err| ToolError::invalid_params(format!("Invalid plugin config: {}", err)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ToolError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ToolError::internal(format!(
                "Failed to read config {}: {}",
                path.display(),
                err
            ))
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|err| {
            ToolError::invalid_params(format!(
                "Config {} is not valid JSON: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_value(&value)
    }

    /// Fields set in `other` win.
    pub fn overlay(self, other: WipConfig) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
        }
    }

    /// The credential, or `None` when it is missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn base_url(&self) -> Result<Url, ToolError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(network::DEFAULT_BASE_URL);
        let url = Url::parse(raw)
            .map_err(|_| ToolError::invalid_params(format!("Invalid base_url: {}", raw)))?;
        let scheme = format!("{}:", url.scheme());
        if !ALLOWED_HTTP.contains(&scheme.as_str()) {
            return Err(ToolError::invalid_params(
                "Only http/https base URLs are supported",
            ));
        }
        if url.cannot_be_a_base() {
            return Err(ToolError::invalid_params(format!(
                "base_url cannot carry a path: {}",
                raw
            )));
        }
        Ok(url)
    }
}

impl fmt::Debug for WipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WipConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
