//! REST API request handlers.

pub mod agent;
pub mod chat;
pub mod history;
pub mod image;
pub mod persona;
