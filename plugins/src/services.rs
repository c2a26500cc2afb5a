//! ServicesFactory implementation: builds the transport plugins from config for the CLI.
use async_trait::async_trait;
use kanban_core::api::{AppConfig, ClientError, Services, ServicesFactory};

use crate::factory;

pub struct PluginServicesFactory;

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, ClientError> {
        let api = factory::build_api(cfg).map_err(|e| ClientError::Config(format!("{e:#}")))?;
        tracing::debug!(
            target: "kanban.http",
            stage = "services.built",
            base_url = %api.base_url(),
            timeout_ms = cfg.api.timeout_ms
        );
        Ok(Services {
            liveness: api.clone(),
            accounts: api.clone(),
            board: api,
        })
    }
}
