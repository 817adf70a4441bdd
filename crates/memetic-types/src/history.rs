//! Conversation history types: threads, exchanges, and image records.
//!
//! A conversation thread is a time-bounded grouping of exchanges between one
//! user and one agent persona. Threads carry metadata only; their exchanges
//! live in a separate table and are hydrated on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation thread between a user and an agent.
///
/// Exactly one thread per (user, agent) pair is "active" at any instant: the
/// one with the greatest `updated_at`. Older threads are closed implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationThread {
    pub id: Uuid,
    pub user_id: String,
    pub agent_id: String,
    /// Number of exchanges appended so far.
    pub message_count: u32,
    pub created_at: DateTime<Utc>,
    /// Advances on every appended exchange. Drives session continuation.
    pub updated_at: DateTime<Utc>,
}

/// One prompt/reply pair within a conversation thread.
///
/// Exchanges are append-only: once written they are never edited or removed.
/// Image-producing exchanges carry the generated URL in `media_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub prompt: String,
    pub reply: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Durable record of a generated image, independent of any thread.
///
/// An image exchange may reference the same URL, but this record exists
/// even when the follow-up chat append fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: Uuid,
    pub user_id: String,
    pub agent_id: String,
    pub prompt: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A thread hydrated with its exchanges, as returned by the read side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    #[serde(flatten)]
    pub thread: ConversationThread,
    pub exchanges: Vec<Exchange>,
}

/// Default page size for history queries.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Hard cap on page size. Unbounded full scans are never allowed.
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Pagination window for history queries.
///
/// Every read query takes a page; there is no "give me everything" path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }.clamped()
    }

    /// Clamp the limit into `1..=MAX_PAGE_LIMIT` and the offset to `>= 0`.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
            offset: self.offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}
