//! Application state wiring all services together.
//!
//! Core services are generic over repository/catalog/model traits; AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use memetic_core::agent::directory::AgentDirectory;
use memetic_core::history::aggregator::ConversationAggregator;
use memetic_core::history::resolver::SessionResolver;
use memetic_core::history::service::ConversationService;
use memetic_infra::config::{load_config, resolve_data_dir, upstream_api_key};
use memetic_infra::sqlite::catalog::SqlitePersonaCatalog;
use memetic_infra::sqlite::history::SqliteHistoryRepository;
use memetic_infra::sqlite::pool::DatabasePool;
use memetic_infra::upstream::build_upstream;
use memetic_infra::upstream::openai_compat::{OpenAiCompatChatModel, OpenAiCompatImageModel};
use memetic_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteConversationService = ConversationService<
    SqliteHistoryRepository,
    SqlitePersonaCatalog,
    OpenAiCompatChatModel,
    OpenAiCompatImageModel,
>;

pub type ConcreteAggregator = ConversationAggregator<SqliteHistoryRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConcreteConversationService>,
    pub aggregator: Arc<ConcreteAggregator>,
    pub catalog: Arc<SqlitePersonaCatalog>,
    pub directory: Arc<AgentDirectory>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("memetic.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Upstream AI providers
        let api_key = upstream_api_key(&config.upstream).with_context(|| {
            format!(
                "missing upstream API key: set the {} environment variable",
                config.upstream.api_key_env
            )
        })?;
        let (chat_model, image_model) = build_upstream(&config.upstream, api_key);

        // Session continuation window
        let resolver = SessionResolver::new(chrono::Duration::minutes(
            config.session_timeout_minutes as i64,
        ));

        let conversation_service = ConversationService::new(
            SqliteHistoryRepository::new(db_pool.clone()),
            SqlitePersonaCatalog::new(db_pool.clone()),
            chat_model,
            image_model,
            resolver,
            Duration::from_secs(config.upstream_timeout_secs),
        );

        // Read side gets its own repository handle over the shared pool
        let aggregator = ConversationAggregator::new(SqliteHistoryRepository::new(db_pool.clone()));

        Ok(Self {
            conversation_service: Arc::new(conversation_service),
            aggregator: Arc::new(aggregator),
            catalog: Arc::new(SqlitePersonaCatalog::new(db_pool.clone())),
            directory: Arc::new(AgentDirectory::new()),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
