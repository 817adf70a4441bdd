//! REST API layer: router, envelope responses, error mapping, auth.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
