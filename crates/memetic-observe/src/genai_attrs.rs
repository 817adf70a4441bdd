//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! These follow the OTel GenAI Semantic Conventions specification for
//! consistent instrumentation of upstream AI calls. All constants are string
//! slices usable in `tracing::span!` and `tracing::info_span!` field names.
//!
//! Span naming convention: `"{operation} {model}"` (e.g., `"chat grok-3-latest"`)

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat", "generate_image").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "xai", "openai").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested (e.g., "grok-3-latest").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

// --- Agent-specific attributes ---

/// The unique identifier of the agent persona.
pub const GEN_AI_AGENT_ID: &str = "gen_ai.agent.id";

/// The display name of the agent persona.
pub const GEN_AI_AGENT_NAME: &str = "gen_ai.agent.name";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// Image generation operation.
pub const OP_GENERATE_IMAGE: &str = "generate_image";
