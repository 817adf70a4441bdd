//! Image generation handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use memetic_core::agent::directory::DEFAULT_AGENT_ID;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    /// Persona to style the image after; defaults to the bootstrap agent.
    pub agent_id: Option<String>,
}

/// POST /api/v1/images/generate - Generate a persona-styled image.
///
/// Records the image durably and appends an image exchange to the resolved
/// conversation thread. A failed or malformed upstream response persists
/// nothing and can be retried.
pub async fn generate_image(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(body): Json<GenerateImageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent_id = body.agent_id.as_deref().unwrap_or(DEFAULT_AGENT_ID);

    let outcome = state
        .conversation_service
        .generate_image(&user.id, agent_id, &body.prompt, chrono::Utc::now())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "conversation_id": outcome.conversation_id,
        "image_url": outcome.image_url,
        "record": outcome.record,
    });

    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("images", "/api/v1/history/images");

    Ok(Json(resp))
}
