//! Business logic for Memetic.
//!
//! Defines the repository and upstream-provider traits (implementations live
//! in memetic-infra) plus the pieces with actual behavior: the session
//! resolver, the conversation aggregator, the agent directory, and the
//! conversation service orchestrating chat and image generation.
//!
//! This crate never depends on memetic-infra.

pub mod agent;
pub mod history;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testutil;
