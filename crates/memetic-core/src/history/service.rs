//! Conversation service: chat and image generation orchestration.
//!
//! The write path of the system. For each inbound event it validates input,
//! loads the persona from the durable catalog, calls the upstream model
//! under a timeout, and only then resolves the session and appends the
//! exchange. Nothing is persisted when the upstream call fails, so a failed
//! request can be retried idempotently.
//!
//! The upstream call happens before the resolve+append critical section:
//! the per-key lock is never held across network I/O.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use memetic_types::agent::PersonaProfile;
use memetic_types::error::{ConversationError, UpstreamError};
use memetic_types::history::{Exchange, ImageRecord};

use crate::agent::catalog::PersonaCatalog;
use crate::agent::prompt;
use crate::history::repository::HistoryRepository;
use crate::history::resolver::SessionResolver;
use crate::upstream::{ChatModel, ImageModel};

/// Result of a chat call: the appended exchange and its thread.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub conversation_id: Uuid,
    pub reply: String,
    pub exchange: Exchange,
}

/// Result of an image generation call.
#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub conversation_id: Uuid,
    pub image_url: String,
    pub record: ImageRecord,
}

/// Orchestrates the chat and image write paths.
///
/// Generic over the repository, catalog, and model traits so memetic-core
/// never depends on memetic-infra.
pub struct ConversationService<R, P, C, I>
where
    R: HistoryRepository,
    P: PersonaCatalog,
    C: ChatModel,
    I: ImageModel,
{
    repo: R,
    catalog: P,
    chat_model: C,
    image_model: I,
    resolver: SessionResolver,
    upstream_timeout: Duration,
}

impl<R, P, C, I> ConversationService<R, P, C, I>
where
    R: HistoryRepository,
    P: PersonaCatalog,
    C: ChatModel,
    I: ImageModel,
{
    pub fn new(
        repo: R,
        catalog: P,
        chat_model: C,
        image_model: I,
        resolver: SessionResolver,
        upstream_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            catalog,
            chat_model,
            image_model,
            resolver,
            upstream_timeout,
        }
    }

    /// Access the session resolver (shared continuation policy).
    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Access the history repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Handle one chat event: reply via the upstream model, then append the
    /// exchange to the resolved conversation.
    #[instrument(skip(self, prompt_text), fields(model = self.chat_model.name()))]
    pub async fn chat(
        &self,
        user_id: &str,
        agent_id: &str,
        prompt_text: &str,
        now: DateTime<Utc>,
    ) -> Result<ChatOutcome, ConversationError> {
        validate_prompt(prompt_text)?;
        let profile = self.load_profile(user_id, agent_id).await?;

        let system = prompt::system_prompt(&profile);
        let reply = self
            .bounded(self.chat_model.complete(prompt_text, &system))
            .await?;

        let exchange = self
            .append(user_id, agent_id, prompt_text.to_string(), reply.clone(), None, now)
            .await?;

        info!(
            conversation_id = %exchange.conversation_id,
            agent_id,
            "chat exchange appended"
        );

        Ok(ChatOutcome {
            conversation_id: exchange.conversation_id,
            reply,
            exchange,
        })
    }

    /// Handle one image generation event.
    ///
    /// Styles the prompt with the persona, generates the image, records it
    /// durably, then appends an image exchange to the resolved conversation.
    /// A malformed or failed upstream response persists nothing.
    #[instrument(skip(self, prompt_text), fields(model = self.image_model.name()))]
    pub async fn generate_image(
        &self,
        user_id: &str,
        agent_id: &str,
        prompt_text: &str,
        now: DateTime<Utc>,
    ) -> Result<ImageOutcome, ConversationError> {
        validate_prompt(prompt_text)?;
        let profile = self.load_profile(user_id, agent_id).await?;

        let styled = prompt::image_prompt(&profile, prompt_text);
        let image_url = self
            .bounded(self.image_model.generate(&styled))
            .await?;

        let record = ImageRecord {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            agent_id: agent_id.to_string(),
            prompt: styled,
            image_url: image_url.clone(),
            created_at: now,
        };
        self.repo.record_image(&record).await?;

        let exchange = self
            .append(
                user_id,
                agent_id,
                prompt_text.to_string(),
                prompt::image_exchange_reply(prompt_text),
                Some(image_url.clone()),
                now,
            )
            .await?;

        info!(
            conversation_id = %exchange.conversation_id,
            agent_id,
            "image exchange appended"
        );

        Ok(ImageOutcome {
            conversation_id: exchange.conversation_id,
            image_url,
            record,
        })
    }

    async fn load_profile(
        &self,
        user_id: &str,
        agent_id: &str,
    ) -> Result<PersonaProfile, ConversationError> {
        if user_id.trim().is_empty() || agent_id.trim().is_empty() {
            return Err(ConversationError::Validation(
                "user_id and agent_id must not be empty".to_string(),
            ));
        }
        self.catalog
            .get(agent_id)
            .await?
            .ok_or(ConversationError::PersonaNotFound)
    }

    /// Resolve the session and append under the per-key lock.
    async fn append(
        &self,
        user_id: &str,
        agent_id: &str,
        prompt: String,
        reply: String,
        media_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Exchange, ConversationError> {
        let lock = self.resolver.key_lock(user_id, agent_id);
        let _guard = lock.lock().await;

        let thread = self
            .resolver
            .resolve_unlocked(&self.repo, user_id, agent_id, now)
            .await?;

        let exchange = Exchange {
            id: Uuid::now_v7(),
            conversation_id: thread.id,
            prompt,
            reply,
            media_url,
            created_at: now,
        };
        self.repo.append_exchange(&exchange).await?;
        Ok(exchange)
    }

    async fn bounded<F>(&self, call: F) -> Result<String, ConversationError>
    where
        F: std::future::Future<Output = Result<String, UpstreamError>>,
    {
        tokio::time::timeout(self.upstream_timeout, call)
            .await
            .map_err(|_| UpstreamError::Timeout(self.upstream_timeout.as_secs()))?
            .map_err(ConversationError::from)
    }
}

fn validate_prompt(prompt: &str) -> Result<(), ConversationError> {
    if prompt.trim().is_empty() {
        return Err(ConversationError::Validation(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}
