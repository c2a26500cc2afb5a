use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default kanban data directory: ~/.kanban
pub fn get_kanban_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".kanban"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.kanban/config.toml (highest)
    let kanban_dir = get_kanban_data_dir()?;
    let user_config = kanban_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.logging.directory = Some(kanban_dir.join("logs").to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());

    Ok(cfg)
}

/// Apply `KANBAN_*` overrides. Blank or unparsable values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("KANBAN_API_URL") {
        cfg.api.base_url = v.trim().to_string();
    }
    if let Some(v) = get("KANBAN_API_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
        cfg.api.timeout_ms = v;
    }
    if let Some(v) = get("KANBAN_PROBE_MAX_RETRIES").and_then(|v| v.trim().parse().ok()) {
        cfg.probe.max_retries = v;
    }
    if let Some(v) = get("KANBAN_PROBE_RETRY_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
        cfg.probe.retry_delay_ms = v;
    }
    if let Some(v) = get("KANBAN_LOG_LEVEL") {
        cfg.logging.level = v;
    }
}
