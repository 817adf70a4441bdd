//! Agent personas: the volatile directory, the durable catalog contract,
//! and prompt rendering.

pub mod catalog;
pub mod directory;
pub mod prompt;
