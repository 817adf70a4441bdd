//! History read handlers.
//!
//! All reads go through the conversation aggregator; every listing is
//! paginated and empty results come back as empty arrays, never errors.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::{ImageListQuery, PageQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/history/chat - The caller's threads across all agents.
pub async fn combined_history(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let views = state
        .aggregator
        .combined_history(&user.id, query.page())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&views).unwrap(), request_id, elapsed)
        .with_link("self", "/api/v1/history/chat");

    Ok(Json(resp))
}

/// GET /api/v1/history/agents/{id}/chat - The caller's threads with one agent.
pub async fn agent_chat_history(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(agent_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let views = state
        .aggregator
        .history_for_agent(&user.id, &agent_id, query.page())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&views).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/history/agents/{agent_id}/chat"));

    Ok(Json(resp))
}

/// GET /api/v1/history/images - The caller's generated images.
pub async fn user_images(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let images = state
        .aggregator
        .images_for_user(&user.id, query.agent_id.as_deref(), query.page())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&images).unwrap(), request_id, elapsed)
        .with_link("self", "/api/v1/history/images");

    Ok(Json(resp))
}

/// GET /api/v1/history/agents/{id}/images - Images generated for one agent
/// across all users.
pub async fn agent_images(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(agent_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let images = state
        .aggregator
        .filtered_images(None, Some(&agent_id), query.page())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&images).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/history/agents/{agent_id}/images"));

    Ok(Json(resp))
}

/// GET /api/v1/history/users/{address}/images - Images owned by a wallet
/// address, optionally scoped to one agent.
pub async fn wallet_images(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(address): Path<String>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let images = state
        .aggregator
        .filtered_images(Some(&address), query.agent_id.as_deref(), query.page())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&images).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/history/users/{address}/images"));

    Ok(Json(resp))
}
