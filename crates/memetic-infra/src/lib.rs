//! Infrastructure implementations for Memetic.
//!
//! SQLite-backed repositories (history store, persona catalog), the
//! OpenAI-compatible upstream providers, and the configuration loader.

pub mod config;
pub mod sqlite;
pub mod upstream;
