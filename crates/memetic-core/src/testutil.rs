//! In-memory fakes shared by unit tests in this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use memetic_types::agent::{PersonaProfile, UpdatePersonaRequest};
use memetic_types::error::{RepositoryError, UpstreamError};
use memetic_types::history::{ConversationThread, Exchange, ImageRecord, Page};

use crate::agent::catalog::PersonaCatalog;
use crate::history::repository::HistoryRepository;
use crate::upstream::{ChatModel, ImageModel};

/// Wallet addresses for the in-memory user "join" used by images_by_wallet.
#[derive(Default)]
struct HistoryState {
    threads: Vec<ConversationThread>,
    exchanges: Vec<Exchange>,
    images: Vec<ImageRecord>,
    wallets: HashMap<String, String>, // user_id -> wallet_address
}

/// In-memory HistoryRepository fake.
pub struct InMemoryHistory {
    state: Mutex<HistoryState>,
    fail_reads: AtomicBool,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HistoryState::default()),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make every read fail with `RepositoryError::Unavailable`.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn set_wallet(&self, user_id: &str, wallet_address: &str) {
        self.state
            .lock()
            .unwrap()
            .wallets
            .insert(user_id.to_string(), wallet_address.to_string());
    }

    pub fn thread_count(&self) -> usize {
        self.state.lock().unwrap().threads.len()
    }

    pub fn exchange_count(&self) -> usize {
        self.state.lock().unwrap().exchanges.len()
    }

    pub fn image_count(&self) -> usize {
        self.state.lock().unwrap().images.len()
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable)
        } else {
            Ok(())
        }
    }
}

fn paged<T: Clone>(items: Vec<T>, page: Page) -> Vec<T> {
    let page = page.clamped();
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

impl HistoryRepository for InMemoryHistory {
    async fn create_thread(
        &self,
        user_id: &str,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversationThread, RepositoryError> {
        let thread = ConversationThread {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            agent_id: agent_id.to_string(),
            message_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().threads.push(thread.clone());
        Ok(thread)
    }

    async fn latest_thread(
        &self,
        user_id: &str,
        agent_id: &str,
    ) -> Result<Option<ConversationThread>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .threads
            .iter()
            .filter(|t| t.user_id == user_id && t.agent_id == agent_id)
            .max_by_key(|t| t.updated_at)
            .cloned())
    }

    async fn append_exchange(&self, exchange: &Exchange) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let thread = state
            .threads
            .iter_mut()
            .find(|t| t.id == exchange.conversation_id)
            .ok_or(RepositoryError::NotFound)?;
        thread.updated_at = exchange.created_at;
        thread.message_count += 1;
        state.exchanges.push(exchange.clone());
        Ok(())
    }

    async fn exchanges_for_thread(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<Exchange>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .exchanges
            .iter()
            .filter(|e| e.conversation_id == *conversation_id)
            .cloned()
            .collect())
    }

    async fn threads_by_user(
        &self,
        user_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut threads: Vec<_> = state
            .threads
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(paged(threads, page))
    }

    async fn threads_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut threads: Vec<_> = state
            .threads
            .iter()
            .filter(|t| t.agent_id == agent_id)
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(paged(threads, page))
    }

    async fn threads_by_user_and_agent(
        &self,
        user_id: &str,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut threads: Vec<_> = state
            .threads
            .iter()
            .filter(|t| t.user_id == user_id && t.agent_id == agent_id)
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(paged(threads, page))
    }

    async fn record_image(&self, record: &ImageRecord) -> Result<(), RepositoryError> {
        self.state.lock().unwrap().images.push(record.clone());
        Ok(())
    }

    async fn images_by_user(
        &self,
        user_id: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut images: Vec<_> = state
            .images
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter(|i| agent_id.is_none_or(|a| i.agent_id == a))
            .cloned()
            .collect();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(images, page))
    }

    async fn images_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut images: Vec<_> = state
            .images
            .iter()
            .filter(|i| i.agent_id == agent_id)
            .cloned()
            .collect();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(images, page))
    }

    async fn images_by_wallet(
        &self,
        wallet_address: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let owner: Option<&String> = state
            .wallets
            .iter()
            .find(|(_, w)| w.as_str() == wallet_address)
            .map(|(u, _)| u);
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        let mut images: Vec<_> = state
            .images
            .iter()
            .filter(|i| i.user_id == *owner)
            .filter(|i| agent_id.is_none_or(|a| i.agent_id == a))
            .cloned()
            .collect();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(images, page))
    }

    async fn all_images(&self, page: Page) -> Result<Vec<ImageRecord>, RepositoryError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut images: Vec<_> = state.images.to_vec();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(images, page))
    }
}

/// In-memory PersonaCatalog fake, pre-seeded via [`InMemoryCatalog::insert`].
pub struct InMemoryCatalog {
    profiles: Mutex<HashMap<String, PersonaProfile>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, profile: PersonaProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }
}

impl PersonaCatalog for InMemoryCatalog {
    async fn create(&self, profile: &PersonaProfile) -> Result<PersonaProfile, RepositoryError> {
        self.insert(profile.clone());
        Ok(profile.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<PersonaProfile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<PersonaProfile>, RepositoryError> {
        let mut profiles: Vec<_> = self.profiles.lock().unwrap().values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(profiles, page))
    }

    async fn list_by_creator(
        &self,
        creator_address: &str,
        page: Page,
    ) -> Result<Vec<PersonaProfile>, RepositoryError> {
        let mut profiles: Vec<_> = self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.creator_address == creator_address)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paged(profiles, page))
    }

    async fn update(
        &self,
        id: &str,
        update: &UpdatePersonaRequest,
    ) -> Result<PersonaProfile, RepositoryError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(description) = &update.description {
            profile.description = description.clone();
        }
        if let Some(personality) = &update.personality {
            profile.personality = personality.clone();
        }
        if let Some(category) = &update.category {
            profile.category = category.clone();
        }
        if let Some(url) = &update.profile_image_url {
            profile.profile_image_url = Some(url.clone());
        }
        if let Some(url) = &update.cover_image_url {
            profile.cover_image_url = Some(url.clone());
        }
        if let Some(links) = &update.social_links {
            profile.social_links = links.clone();
        }
        Ok(profile.clone())
    }

    async fn like(&self, id: &str) -> Result<PersonaProfile, RepositoryError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.likes += 1;
        Ok(profile.clone())
    }
}

/// Builds a catalog profile for tests.
pub fn test_profile(id: &str) -> PersonaProfile {
    PersonaProfile {
        id: id.to_string(),
        name: "Doge".to_string(),
        description: "Much wow, very meme".to_string(),
        personality: "ironic and upbeat".to_string(),
        category: "classic".to_string(),
        token_name: "Dogecoin".to_string(),
        token_symbol: "DOGE".to_string(),
        token_address: "0xd0ge".to_string(),
        creator_address: "0xcafe".to_string(),
        profile_image_url: None,
        cover_image_url: None,
        likes: 0,
        social_links: HashMap::new(),
        created_at: Utc::now(),
    }
}

/// Chat model returning a canned reply, or failing when configured.
pub struct FakeChatModel {
    pub reply: String,
    pub fail: bool,
    /// Artificial latency, for timeout tests with a paused clock.
    pub delay: Option<std::time::Duration>,
}

impl FakeChatModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            delay: None,
        }
    }
}

impl ChatModel for FakeChatModel {
    fn name(&self) -> &str {
        "fake-chat"
    }

    async fn complete(&self, _prompt: &str, _system_prompt: &str) -> Result<String, UpstreamError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(UpstreamError::Api("vendor exploded".to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// Image model returning a canned URL, a malformed payload, or an API error.
pub struct FakeImageModel {
    pub url: Option<String>,
    pub fail: bool,
}

impl FakeImageModel {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            fail: false,
        }
    }

    /// Vendor responded but no URL was extractable.
    pub fn malformed() -> Self {
        Self {
            url: None,
            fail: false,
        }
    }
}

impl ImageModel for FakeImageModel {
    fn name(&self) -> &str {
        "fake-image"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Api("vendor exploded".to_string()));
        }
        self.url.clone().ok_or(UpstreamError::MalformedResponse)
    }
}
