//! OpenAI-compatible chat and image providers.
//!
//! A single pair of implementations serves xAI, OpenAI, and Google Gemini
//! via configurable base URLs and factory functions. Chat uses
//! [`async_openai`] for type-safe request/response handling; image
//! generation posts to `{base_url}/images/generations` directly since the
//! payload is a three-field JSON object.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::Instrument;

use memetic_core::upstream::{ChatModel, ImageModel};
use memetic_observe::genai_attrs;
use memetic_types::error::UpstreamError;

/// Replies are short meme-persona quips; 500 tokens is plenty.
const MAX_COMPLETION_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Configuration for an OpenAI-compatible upstream provider.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "xai", "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.x.ai/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "grok-3-latest", "grok-2-image-1212").
    pub model: String,
}

/// xAI default configuration.
///
/// Base URL: `https://api.x.ai/v1`
pub fn xai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "xai".into(),
        base_url: "https://api.x.ai/v1".into(),
        api_key,
        model: model.into(),
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
    }
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: model.into(),
    }
}

/// Chat completion backend for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatChatModel {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatChatModel {
    /// Create a new chat model from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    fn request_span(&self) -> tracing::Span {
        tracing::info_span!(
            "chat",
            { genai_attrs::GEN_AI_OPERATION_NAME } = genai_attrs::OP_CHAT,
            { genai_attrs::GEN_AI_PROVIDER_NAME } = %self.provider_name,
            { genai_attrs::GEN_AI_REQUEST_MODEL } = %self.model,
            { genai_attrs::GEN_AI_REQUEST_TEMPERATURE } = TEMPERATURE,
            { genai_attrs::GEN_AI_REQUEST_MAX_TOKENS } = MAX_COMPLETION_TOKENS,
        )
    }
}

impl ChatModel for OpenAiCompatChatModel {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, UpstreamError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system_prompt.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                name: None,
            }),
        ];

        let request = CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
            temperature: Some(TEMPERATURE),
            ..Default::default()
        };

        // Spans must be attached to the future, never entered across an
        // await: the guard would stay active on the worker thread during
        // suspension and misattribute other tasks' events.
        async {
            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| UpstreamError::Api(e.to_string()))?;

            response
                .choices
                .first()
                .and_then(|c| c.message.content.clone())
                .filter(|content| !content.is_empty())
                .ok_or(UpstreamError::MalformedResponse)
        }
        .instrument(self.request_span())
        .await
    }
}

/// Image generation backend for any OpenAI-compatible API.
///
/// Posts to `{base_url}/images/generations` and extracts the first image
/// URL from the response. Does NOT derive Debug; the API key lives inside.
pub struct OpenAiCompatImageModel {
    http: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
    model: String,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

impl OpenAiCompatImageModel {
    /// Create a new image model from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider_name: config.provider_name,
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model,
        }
    }

    fn request_span(&self) -> tracing::Span {
        tracing::info_span!(
            "generate_image",
            { genai_attrs::GEN_AI_OPERATION_NAME } = genai_attrs::OP_GENERATE_IMAGE,
            { genai_attrs::GEN_AI_PROVIDER_NAME } = %self.provider_name,
            { genai_attrs::GEN_AI_REQUEST_MODEL } = %self.model,
        )
    }
}

impl ImageModel for OpenAiCompatImageModel {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        async {
            let response = self
                .http
                .post(format!("{}/images/generations", self.base_url))
                .bearer_auth(self.api_key.expose_secret())
                .json(&serde_json::json!({
                    "model": self.model,
                    "prompt": prompt,
                    "n": 1,
                }))
                .send()
                .await
                .map_err(|e| UpstreamError::Api(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(UpstreamError::Api(format!(
                    "image generation failed with status {status}: {body}"
                )));
            }

            let payload: ImageGenerationResponse = response
                .json()
                .await
                .map_err(|e| UpstreamError::Api(e.to_string()))?;

            payload
                .data
                .into_iter()
                .next()
                .and_then(|d| d.url)
                .filter(|url| !url.is_empty())
                .ok_or(UpstreamError::MalformedResponse)
        }
        .instrument(self.request_span())
        .await
    }
}
