//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Persona catalog (durable)
        .route("/personas", post(handlers::persona::create_persona))
        .route("/personas", get(handlers::persona::list_personas))
        .route("/personas/{id}", get(handlers::persona::get_persona))
        .route("/personas/{id}", put(handlers::persona::update_persona))
        .route("/personas/{id}/like", post(handlers::persona::like_persona))
        // Agent directory (volatile)
        .route("/agents", post(handlers::agent::create_agent))
        .route("/agents", get(handlers::agent::list_agents))
        .route("/agents/{id}", get(handlers::agent::get_agent))
        .route("/agents/{id}", put(handlers::agent::update_agent))
        .route("/agents/{id}", delete(handlers::agent::delete_agent))
        // Conversation write paths
        .route("/agents/{id}/chat", post(handlers::chat::chat))
        .route("/images/generate", post(handlers::image::generate_image))
        // History reads
        .route("/history/chat", get(handlers::history::combined_history))
        .route("/history/images", get(handlers::history::user_images))
        .route(
            "/history/agents/{id}/chat",
            get(handlers::history::agent_chat_history),
        )
        .route(
            "/history/agents/{id}/images",
            get(handlers::history::agent_images),
        )
        .route(
            "/history/users/{address}/images",
            get(handlers::history::wallet_images),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
