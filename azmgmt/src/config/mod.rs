pub mod manager;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{api, polling};
use crate::http::ApiSettings;

pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub subscription_id: String,
    pub certificate_thumbprint: String,
    /// Certificate store locations, searched in order
    pub certificate_paths: Vec<PathBuf>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub request_timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    api::DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    api::DEFAULT_API_VERSION.to_string()
}

fn default_namespace() -> String {
    api::DEFAULT_NAMESPACE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            namespace: default_namespace(),
            request_timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    pub fn settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            api_version: self.api_version.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_interval_seconds() -> u64 {
    polling::DEFAULT_INTERVAL.as_secs()
}

fn default_timeout_seconds() -> u64 {
    polling::DEFAULT_TIMEOUT.as_secs()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// A hosted service reachable under a short key, e.g. `[services.dev]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub subscription_id: Option<String>,
    /// Role settings applied by `update-config`
    #[serde(default)]
    pub settings: Vec<SettingOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOverride {
    pub name: String,
    pub value: String,
}

impl Config {
    pub fn service(&self, key: &str) -> Result<&ServiceConfig> {
        self.services.get(key).ok_or_else(|| {
            let mut known: Vec<&str> = self.services.keys().map(String::as_str).collect();
            known.sort_unstable();
            anyhow!(
                "Service '{}' is not configured (known: {})",
                key,
                known.join(", ")
            )
        })
    }

    /// Subscription a service lives in, falling back to the default subscription
    pub fn subscription_for<'a>(&'a self, service: &'a ServiceConfig) -> &'a str {
        service
            .subscription_id
            .as_deref()
            .unwrap_or(&self.subscription_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subscription_id.trim().is_empty() {
            return Err(anyhow!("subscription_id must not be empty"));
        }
        if self.certificate_thumbprint.trim().is_empty() {
            return Err(anyhow!("certificate_thumbprint must not be empty"));
        }
        if self.certificate_paths.is_empty() {
            return Err(anyhow!("certificate_paths must list at least one location"));
        }
        if !(self.api.base_url.starts_with("https://") || self.api.base_url.starts_with("http://"))
        {
            return Err(anyhow!(
                "api.base_url must be an absolute http(s) URL, got '{}'",
                self.api.base_url
            ));
        }
        if self.polling.interval_seconds == 0 {
            return Err(anyhow!("polling.interval_seconds must be greater than zero"));
        }
        if self.polling.timeout_seconds == 0 {
            return Err(anyhow!("polling.timeout_seconds must be greater than zero"));
        }
        for (key, service) in &self.services {
            if service.name.trim().is_empty() {
                return Err(anyhow!("services.{}.name must not be empty", key));
            }
        }
        Ok(())
    }
}
