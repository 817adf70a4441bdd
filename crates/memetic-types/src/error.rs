use thiserror::Error;

/// Errors from history store operations (trait definitions live in memetic-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The durable store could not be reached. Fatal to the current request;
    /// callers must not fall back to an always-new-thread policy.
    #[error("history store unavailable")]
    Unavailable,

    #[error("query error: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from external AI calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream call failed: {0}")]
    Api(String),

    #[error("upstream call timed out after {0}s")]
    Timeout(u64),

    /// The vendor payload contained no extractable result (e.g., no image URL).
    #[error("upstream response contained no usable payload")]
    MalformedResponse,
}

/// Errors from the in-process agent directory.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not found")]
    NotFound,

    #[error("invalid agent: {0}")]
    Invalid(String),
}

/// Errors from the chat/image orchestration path.
///
/// Everything here is recovered at the request boundary; nothing crashes
/// the process. On any error no partial exchange has been persisted.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("persona not found")]
    PersonaNotFound,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
        assert_eq!(
            RepositoryError::Unavailable.to_string(),
            "history store unavailable"
        );
    }

    #[test]
    fn test_upstream_error_display() {
        assert_eq!(
            UpstreamError::Timeout(30).to_string(),
            "upstream call timed out after 30s"
        );
    }

    #[test]
    fn test_conversation_error_wraps_upstream() {
        let err: ConversationError = UpstreamError::MalformedResponse.into();
        assert!(matches!(
            err,
            ConversationError::Upstream(UpstreamError::MalformedResponse)
        ));
    }
}
