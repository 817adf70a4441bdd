//! Observability for Memetic: tracing subscriber setup and the OpenTelemetry
//! GenAI semantic-convention constants used when instrumenting upstream calls.

pub mod genai_attrs;
pub mod tracing_setup;
