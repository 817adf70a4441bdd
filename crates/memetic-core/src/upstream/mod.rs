//! Upstream AI provider traits.
//!
//! One interface per call shape, with interchangeable implementations chosen
//! at startup configuration. Implementations live in memetic-infra; the
//! conversation service wraps every call in a timeout.

use memetic_types::error::UpstreamError;

/// Text completion backend (`chat(prompt, systemPrompt) -> reply`).
///
/// Uses native async fn in traits (RPITIT). Implementations must not
/// persist anything; persistence is the service's job.
pub trait ChatModel: Send + Sync {
    /// Human-readable provider name (e.g., "xai", "openai").
    fn name(&self) -> &str;

    /// Send one prompt under a persona system prompt, returning the reply.
    fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, UpstreamError>> + Send;
}

/// Image generation backend (`generateImage(prompt) -> url`).
pub trait ImageModel: Send + Sync {
    fn name(&self) -> &str;

    /// Generate an image and return its URL.
    ///
    /// Fails with `MalformedResponse` when the vendor payload carries no
    /// extractable URL.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, UpstreamError>> + Send;
}
