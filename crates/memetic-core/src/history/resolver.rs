//! Session resolver: the conversation continuation policy.
//!
//! Given a (user, agent) pair and the current instant, decides whether the
//! most recent thread is still live or a new one must be started. The
//! decision and the subsequent append must happen under the same per-key
//! lock so concurrent requests cannot fabricate two threads inside one
//! continuation window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use memetic_types::error::ConversationError;
use memetic_types::history::ConversationThread;
use tokio::sync::Mutex;
use tracing::debug;

use crate::history::repository::HistoryRepository;

/// Inactivity window after which a new thread is started. Policy constant;
/// configurable at construction for deployments that override it.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

type SessionKey = (String, String);

/// Resolves inbound events to a conversation thread.
///
/// Holds one `tokio::sync::Mutex` per (user, agent) key. Requests for
/// different keys never contend; requests for the same key serialize their
/// resolve-then-append sequence.
pub struct SessionResolver {
    timeout: Duration,
    locks: DashMap<SessionKey, Arc<Mutex<()>>>,
}

impl SessionResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            locks: DashMap::new(),
        }
    }

    /// The continuation window currently in force.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The lock guarding the resolve-then-append sequence for a key.
    ///
    /// Callers that append after resolving must hold this lock across both
    /// steps and use [`resolve_unlocked`](Self::resolve_unlocked).
    pub fn key_lock(&self, user_id: &str, agent_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((user_id.to_string(), agent_id.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Resolve the active thread for a pair, creating one if needed.
    ///
    /// Idempotent within the continuation window: repeated calls return the
    /// same thread. Store failures propagate; there is no fallback to an
    /// always-new-thread policy.
    pub async fn resolve<R: HistoryRepository>(
        &self,
        repo: &R,
        user_id: &str,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversationThread, ConversationError> {
        validate_key(user_id, agent_id)?;
        let lock = self.key_lock(user_id, agent_id);
        let _guard = lock.lock().await;
        self.resolve_unlocked(repo, user_id, agent_id, now).await
    }

    /// Resolve without taking the per-key lock.
    ///
    /// The caller must already hold the lock from [`key_lock`](Self::key_lock)
    /// for this pair.
    pub async fn resolve_unlocked<R: HistoryRepository>(
        &self,
        repo: &R,
        user_id: &str,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversationThread, ConversationError> {
        validate_key(user_id, agent_id)?;

        if let Some(thread) = repo.latest_thread(user_id, agent_id).await? {
            let idle = now.signed_duration_since(thread.updated_at);
            if idle <= self.timeout {
                debug!(
                    conversation_id = %thread.id,
                    idle_secs = idle.num_seconds(),
                    "continuing conversation"
                );
                return Ok(thread);
            }
        }

        let thread = repo.create_thread(user_id, agent_id, now).await?;
        debug!(conversation_id = %thread.id, user_id, agent_id, "started new conversation");
        Ok(thread)
    }
}

impl Default for SessionResolver {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TIMEOUT_MINUTES))
    }
}

fn validate_key(user_id: &str, agent_id: &str) -> Result<(), ConversationError> {
    if user_id.trim().is_empty() {
        return Err(ConversationError::Validation(
            "user_id must not be empty".to_string(),
        ));
    }
    if agent_id.trim().is_empty() {
        return Err(ConversationError::Validation(
            "agent_id must not be empty".to_string(),
        ));
    }
    Ok(())
}
