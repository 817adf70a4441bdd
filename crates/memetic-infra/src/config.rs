//! Configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.memetic/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed so the server always starts.

use std::path::{Path, PathBuf};

use memetic_types::config::{AppConfig, UpstreamConfig};
use secrecy::SecretString;

/// Resolve the data directory: `MEMETIC_DATA_DIR`, else `~/.memetic`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("MEMETIC_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".memetic")
        }
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparseable file: warn and use defaults.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Read the upstream API key from the environment variable the config names.
///
/// Wrapped in [`SecretString`] so the key never appears in Debug output.
pub fn upstream_api_key(config: &UpstreamConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}
