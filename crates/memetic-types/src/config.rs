//! Application configuration schema.
//!
//! Loaded from `{data_dir}/config.toml`; every field has a default so a
//! missing or partial file still yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Inactivity window after which a new conversation thread is started
    /// instead of continuing the latest one.
    #[serde(default = "default_session_timeout_minutes")]
    pub session_timeout_minutes: u64,

    /// Bound on every external AI call.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            session_timeout_minutes: default_session_timeout_minutes(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

/// Upstream AI provider selection.
///
/// One OpenAI-compatible implementation serves every vendor; this picks the
/// base URL and models at startup instead of branching per vendor in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Provider name: "xai", "openai", or "gemini".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_session_timeout_minutes() -> u64 {
    30
}

fn default_upstream_timeout_secs() -> u64 {
    60
}

fn default_provider() -> String {
    "xai".to_string()
}

fn default_chat_model() -> String {
    "grok-3-latest".to_string()
}

fn default_image_model() -> String {
    "grok-2-image-1212".to_string()
}

fn default_api_key_env() -> String {
    "XAI_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.session_timeout_minutes, 30);
        assert_eq!(config.upstream_timeout_secs, 60);
        assert_eq!(config.upstream.provider, "xai");
        assert_eq!(config.upstream.chat_model, "grok-3-latest");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"session_timeout_minutes": 10}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.session_timeout_minutes, 10);
        assert_eq!(config.upstream_timeout_secs, 60);
        assert_eq!(config.upstream.image_model, "grok-2-image-1212");
    }
}
