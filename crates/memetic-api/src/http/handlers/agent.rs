//! Agent directory CRUD handlers.
//!
//! These operate on the volatile in-process directory, not the durable
//! persona catalog (see `persona.rs` for that).

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use memetic_types::agent::{CreateAgentRequest, UpdateAgentRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/agents - Register a directory persona.
pub async fn create_agent(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateAgentRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let persona = state.directory.create(body)?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&persona).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/agents/{}", persona.id))
        .with_link("chat", &format!("/api/v1/agents/{}/chat", persona.id));

    Ok(Json(resp))
}

/// GET /api/v1/agents - List all directory personas.
pub async fn list_agents(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agents = state.directory.list();
    let elapsed = start.elapsed().as_millis() as u64;

    let agents_json: Vec<serde_json::Value> = agents
        .iter()
        .map(|a| serde_json::to_value(a).unwrap())
        .collect();

    let resp =
        ApiResponse::success(agents_json, request_id, elapsed).with_link("self", "/api/v1/agents");

    Ok(Json(resp))
}

/// GET /api/v1/agents/{id} - Fetch one directory persona.
pub async fn get_agent(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let persona = state.directory.get(&id)?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&persona).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/agents/{}", persona.id));

    Ok(Json(resp))
}

/// PUT /api/v1/agents/{id} - Merge-update a directory persona.
pub async fn update_agent(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateAgentRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let persona = state.directory.update(&id, body)?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&persona).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/agents/{}", persona.id));

    Ok(Json(resp))
}

/// DELETE /api/v1/agents/{id} - Remove a directory persona.
pub async fn delete_agent(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.directory.delete(&id)?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )
    .with_link("agents", "/api/v1/agents");

    Ok(Json(resp))
}
