//! Read-side composition over the history store.
//!
//! Purely compositional: no mutation, and empty result sets come back as
//! empty vectors, never as errors. Every query is bounded by a [`Page`].

use memetic_types::error::RepositoryError;
use memetic_types::history::{ConversationView, ImageRecord, Page};

use crate::history::repository::HistoryRepository;

/// Groups stored exchanges into conversation views and answers the
/// history/filter queries.
pub struct ConversationAggregator<R: HistoryRepository> {
    repo: R,
}

impl<R: HistoryRepository> ConversationAggregator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All threads for a user across all agents, newest first, each
    /// hydrated with its exchanges in chronological order.
    pub async fn combined_history(
        &self,
        user_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationView>, RepositoryError> {
        let threads = self.repo.threads_by_user(user_id, page).await?;
        self.hydrate(threads).await
    }

    /// Threads between one user and one agent, newest first.
    pub async fn history_for_agent(
        &self,
        user_id: &str,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationView>, RepositoryError> {
        let threads = self
            .repo
            .threads_by_user_and_agent(user_id, agent_id, page)
            .await?;
        self.hydrate(threads).await
    }

    /// All threads addressed to an agent across users, newest first.
    pub async fn agent_history(
        &self,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationView>, RepositoryError> {
        let threads = self.repo.threads_by_agent(agent_id, page).await?;
        self.hydrate(threads).await
    }

    /// Images a user generated, optionally scoped to one agent.
    pub async fn images_for_user(
        &self,
        user_id: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        self.repo.images_by_user(user_id, agent_id, page).await
    }

    /// Images matching whichever of the two optional filters are supplied.
    ///
    /// With neither filter this is a full catalog listing, bounded by the
    /// caller's page.
    pub async fn filtered_images(
        &self,
        wallet_address: Option<&str>,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        match (wallet_address, agent_id) {
            (Some(wallet), agent) => self.repo.images_by_wallet(wallet, agent, page).await,
            (None, Some(agent)) => self.repo.images_by_agent(agent, page).await,
            (None, None) => self.repo.all_images(page).await,
        }
    }

    async fn hydrate(
        &self,
        threads: Vec<memetic_types::history::ConversationThread>,
    ) -> Result<Vec<ConversationView>, RepositoryError> {
        let mut views = Vec::with_capacity(threads.len());
        for thread in threads {
            let exchanges = self.repo.exchanges_for_thread(&thread.id).await?;
            views.push(ConversationView { thread, exchanges });
        }
        Ok(views)
    }
}
