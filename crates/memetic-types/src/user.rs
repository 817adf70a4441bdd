//! User identity types.
//!
//! The core never verifies credentials. The API layer resolves an API key
//! to an [`AuthUser`] and hands verified identifiers down; wallet addresses
//! are a denormalized attribute used by image history lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user who owns conversation and image history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

/// The verified identity attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub wallet_address: String,
}
