use std::sync::Arc;

use anyhow::{Context, Result};
use kanban_core::api::AppConfig;

use crate::service::ApiServicePlugin;

/// One REST client shared by the liveness, account and board seams.
pub fn build_api(cfg: &AppConfig) -> Result<Arc<ApiServicePlugin>> {
    let base_url = cfg.api.base_url.trim();
    if base_url.is_empty() {
        anyhow::bail!("api.base_url is empty");
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!("api.base_url must start with http:// or https://, got {base_url:?}");
    }
    let plugin = ApiServicePlugin::new(base_url, cfg.api.timeout_ms)
        .with_context(|| format!("failed to build http client for {base_url}"))?;
    Ok(Arc::new(plugin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_trims_trailing_slash() {
        let mut cfg = AppConfig::default();
        cfg.api.base_url = "http://localhost:3000/".to_string();
        let api = build_api(&cfg).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_build_api_rejects_bad_scheme() {
        let mut cfg = AppConfig::default();
        cfg.api.base_url = "localhost:3000".to_string();
        assert!(build_api(&cfg).is_err());

        cfg.api.base_url = "  ".to_string();
        assert!(build_api(&cfg).is_err());
    }
}
