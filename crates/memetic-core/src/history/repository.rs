//! HistoryRepository trait definition.
//!
//! Persistence contract for conversation threads, exchanges, and image
//! records. Implementations live in memetic-infra (e.g.,
//! `SqliteHistoryRepository`). Uses native async fn in traits (RPITIT).

use chrono::{DateTime, Utc};
use memetic_types::error::RepositoryError;
use memetic_types::history::{ConversationThread, Exchange, ImageRecord, Page};
use uuid::Uuid;

/// Repository trait for durable conversation and image history.
///
/// All list queries are paginated and ordered newest-first unless noted.
pub trait HistoryRepository: Send + Sync {
    /// Allocate a new empty thread for a (user, agent) pair.
    ///
    /// `now` is the injected clock; it becomes both `created_at` and
    /// `updated_at` of the fresh thread.
    fn create_thread(
        &self,
        user_id: &str,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<ConversationThread, RepositoryError>> + Send;

    /// The thread with the greatest `updated_at` for the pair, or None.
    fn latest_thread(
        &self,
        user_id: &str,
        agent_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ConversationThread>, RepositoryError>> + Send;

    /// Append an exchange to its thread and advance the thread's
    /// `updated_at` to the exchange's `created_at`.
    ///
    /// Fails with `NotFound` if the thread does not exist. Exchanges are
    /// append-only; there is no update or delete.
    fn append_exchange(
        &self,
        exchange: &Exchange,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All exchanges of a thread in chronological (insertion) order.
    fn exchanges_for_thread(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Exchange>, RepositoryError>> + Send;

    /// Threads owned by a user across all agents, `updated_at` DESC.
    fn threads_by_user(
        &self,
        user_id: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationThread>, RepositoryError>> + Send;

    /// Threads addressed to an agent across all users, `updated_at` DESC.
    fn threads_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationThread>, RepositoryError>> + Send;

    /// Threads for one (user, agent) pair, `updated_at` DESC.
    fn threads_by_user_and_agent(
        &self,
        user_id: &str,
        agent_id: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationThread>, RepositoryError>> + Send;

    /// Durable insert of a generated-image record, independent of threads.
    fn record_image(
        &self,
        record: &ImageRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Images generated by a user, optionally scoped to one agent,
    /// `created_at` DESC.
    fn images_by_user(
        &self,
        user_id: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ImageRecord>, RepositoryError>> + Send;

    /// Images generated for an agent across all users, `created_at` DESC.
    fn images_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ImageRecord>, RepositoryError>> + Send;

    /// Images owned by the user with the given wallet address, resolved via
    /// a join on the users table, optionally scoped to one agent.
    fn images_by_wallet(
        &self,
        wallet_address: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ImageRecord>, RepositoryError>> + Send;

    /// All image records, `created_at` DESC. Always paginated.
    fn all_images(
        &self,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<ImageRecord>, RepositoryError>> + Send;
}
