use super::Config;
use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::load_configuration(path.as_ref()).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))?;

        config
            .validate()
            .map_err(|e| anyhow!("Invalid config {}: {}", path.display(), e))?;

        info!(
            "Loaded config for subscription {}: {} services, polling every {}s for up to {}s",
            config.subscription_id,
            config.services.len(),
            config.polling.interval_seconds,
            config.polling.timeout_seconds
        );

        Ok(config)
    }
}
