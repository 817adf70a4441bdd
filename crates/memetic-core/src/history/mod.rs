//! Conversation history: storage trait, session policy, read-side views.

pub mod aggregator;
pub mod repository;
pub mod resolver;
pub mod service;
