//! Shared domain types for Memetic.
//!
//! This crate has no I/O and no framework dependencies. It defines the
//! entities persisted by the history store, the agent/persona types, the
//! error taxonomy, and the configuration schema.

pub mod agent;
pub mod config;
pub mod error;
pub mod history;
pub mod user;
