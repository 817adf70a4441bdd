//! Persona catalog handlers.
//!
//! The durable catalog that chat and image prompts are built from. Creation
//! requires a token address; the creator is attributed from the
//! authenticated user's wallet.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;

use memetic_core::agent::catalog::{build_profile, PersonaCatalog};
use memetic_types::agent::{CreatePersonaRequest, UpdatePersonaRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::PersonaListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/personas - Create a catalog persona.
pub async fn create_persona(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(body): Json<CreatePersonaRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let profile = build_profile(body, &user.wallet_address, chrono::Utc::now())?;
    let created = state.catalog.create(&profile).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&created).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/personas/{}", created.id))
        .with_link("chat", &format!("/api/v1/agents/{}/chat", created.id));

    Ok(Json(resp))
}

/// GET /api/v1/personas - List catalog personas, optionally by creator.
pub async fn list_personas(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<PersonaListQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let page = query.page();
    let personas = match &query.creator {
        Some(creator) => state.catalog.list_by_creator(creator, page).await?,
        None => state.catalog.list(page).await?,
    };
    let elapsed = start.elapsed().as_millis() as u64;

    let personas_json: Vec<serde_json::Value> = personas
        .iter()
        .map(|p| serde_json::to_value(p).unwrap())
        .collect();

    let resp = ApiResponse::success(personas_json, request_id, elapsed)
        .with_link("self", "/api/v1/personas");

    Ok(Json(resp))
}

/// GET /api/v1/personas/{id} - Fetch one catalog persona.
pub async fn get_persona(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let persona = state
        .catalog
        .get(&id)
        .await?
        .ok_or(AppError::Repository(
            memetic_types::error::RepositoryError::NotFound,
        ))?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&persona).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/personas/{}", persona.id));

    Ok(Json(resp))
}

/// POST /api/v1/personas/{id}/like - Bump the like counter.
pub async fn like_persona(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let liked = state.catalog.like(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&liked).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/personas/{}", liked.id));

    Ok(Json(resp))
}

/// PUT /api/v1/personas/{id} - Merge-update a catalog persona.
pub async fn update_persona(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdatePersonaRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let updated = state.catalog.update(&id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(serde_json::to_value(&updated).unwrap(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/personas/{}", updated.id));

    Ok(Json(resp))
}
