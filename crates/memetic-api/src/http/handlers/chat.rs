//! Chat handler: the write path for text conversations.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

/// POST /api/v1/agents/{id}/chat - Send one prompt to an agent persona.
///
/// The reply is appended to the resolved conversation thread (continuing
/// the latest one when the user returns within the idle window).
pub async fn chat(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(agent_id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state
        .conversation_service
        .chat(&user.id, &agent_id, &body.prompt, chrono::Utc::now())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "conversation_id": outcome.conversation_id,
        "reply": outcome.reply,
        "exchange": outcome.exchange,
    });

    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("history", &format!("/api/v1/history/agents/{agent_id}/chat"));

    Ok(Json(resp))
}
