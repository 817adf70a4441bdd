//! Upstream AI provider implementations.
//!
//! One OpenAI-compatible implementation serves xAI, OpenAI, and Gemini via
//! configurable base URLs and factory functions. Which provider runs is a
//! startup decision from `[upstream]` config.

pub mod openai_compat;

use memetic_types::config::UpstreamConfig;
use secrecy::SecretString;

use self::openai_compat::{OpenAiCompatChatModel, OpenAiCompatConfig, OpenAiCompatImageModel};

/// Build the configured chat and image models from `[upstream]` config.
///
/// Unknown provider names fall back to xAI defaults with a warning; the
/// `base_url` override still applies either way.
pub fn build_upstream(
    config: &UpstreamConfig,
    api_key: SecretString,
) -> (OpenAiCompatChatModel, OpenAiCompatImageModel) {
    let chat = provider_config(config, api_key.clone(), &config.chat_model);
    let image = provider_config(config, api_key, &config.image_model);
    (
        OpenAiCompatChatModel::new(chat),
        OpenAiCompatImageModel::new(image),
    )
}

fn provider_config(
    config: &UpstreamConfig,
    api_key: SecretString,
    model: &str,
) -> OpenAiCompatConfig {
    let mut compat = match config.provider.as_str() {
        "xai" => openai_compat::xai_defaults(api_key, model),
        "openai" => openai_compat::openai_defaults(api_key, model),
        "gemini" => openai_compat::gemini_defaults(api_key, model),
        other => {
            tracing::warn!("unknown upstream provider '{other}', using xai defaults");
            openai_compat::xai_defaults(api_key, model)
        }
    };

    if let Some(base_url) = &config.base_url {
        compat.base_url = base_url.clone();
    }

    compat
}
