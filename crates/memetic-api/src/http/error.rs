//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Everything is recovered at the request boundary: an upstream failure
//! becomes a 5xx response, a validation error a 400, and nothing crashes
//! the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use memetic_types::error::{AgentError, ConversationError, RepositoryError, UpstreamError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat/image orchestration errors.
    Conversation(ConversationError),
    /// History store errors from the read side.
    Repository(RepositoryError),
    /// Agent directory errors.
    Agent(AgentError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl AppError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Conversation(ConversationError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Conversation(ConversationError::PersonaNotFound) => (
                StatusCode::NOT_FOUND,
                "PERSONA_NOT_FOUND",
                "Persona not found".to_string(),
            ),
            AppError::Conversation(ConversationError::Upstream(e)) => return map_upstream(e),
            AppError::Conversation(ConversationError::Store(e)) => return map_repository(e),
            AppError::Repository(e) => return map_repository(e),
            AppError::Agent(AgentError::NotFound) => (
                StatusCode::NOT_FOUND,
                "AGENT_NOT_FOUND",
                "Agent not found".to_string(),
            ),
            AppError::Agent(AgentError::Invalid(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

fn map_upstream(e: &UpstreamError) -> (StatusCode, &'static str, String) {
    match e {
        UpstreamError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", e.to_string()),
        UpstreamError::Api(_) | UpstreamError::MalformedResponse => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
        }
    }
}

fn map_repository(e: &RepositoryError) -> (StatusCode, &'static str, String) {
    match e {
        RepositoryError::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            e.to_string(),
        ),
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", e.to_string()),
        RepositoryError::Query(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "QUERY_ERROR",
            e.to_string(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
