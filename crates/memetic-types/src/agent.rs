//! Agent persona types.
//!
//! Two distinct registries exist:
//!
//! - [`AgentPersona`] lives in the volatile in-process agent directory.
//!   No persistence guarantee beyond process uptime.
//! - [`PersonaProfile`] is the durable persona catalog record (name,
//!   personality, token identity) used to build the AI system prompt.
//!
//! The directory is a non-authoritative cache; the catalog is what the
//! chat and image paths consult.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persona held by the in-process agent directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPersona {
    pub id: String,
    pub name: String,
    pub description: String,
    pub personality: String,
    pub category: String,
    /// Platform name -> URL, keys unique.
    #[serde(default)]
    pub social_links: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a directory persona. `name` and `description` required.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub description: String,
    pub personality: Option<String>,
    pub category: Option<String>,
    pub social_links: Option<HashMap<String, String>>,
}

/// Partial update: only provided fields overwrite the existing persona.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub category: Option<String>,
    pub social_links: Option<HashMap<String, String>>,
}

/// Durable persona catalog record.
///
/// Carries the token identity and creator attribution missing from the
/// volatile directory. System prompts are rendered from this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub personality: String,
    pub category: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_address: String,
    pub creator_address: String,
    pub profile_image_url: Option<String>,
    pub cover_image_url: Option<String>,
    /// Like counter, bumped via the like endpoint.
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub social_links: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Token identity attached to a catalog persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetails {
    pub name: String,
    pub symbol: String,
    /// Required: a persona cannot exist without a deployed token.
    pub address: String,
}

/// Request to create a catalog persona.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePersonaRequest {
    pub name: String,
    pub description: String,
    pub personality: Option<String>,
    pub category: Option<String>,
    pub token: TokenDetails,
    pub profile_image_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub social_links: Option<HashMap<String, String>>,
}

/// Partial update for a catalog persona.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePersonaRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub category: Option<String>,
    pub profile_image_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub social_links: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_persona_serde_defaults_social_links() {
        let json = r#"{
            "id": "agent-1",
            "name": "Doge",
            "description": "Much wow",
            "personality": "ironic",
            "category": "classic",
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let persona: AgentPersona = serde_json::from_str(json).unwrap();
        assert!(persona.social_links.is_empty());
    }

    #[test]
    fn test_create_persona_request_requires_token() {
        let json = r#"{"name": "Pepe", "description": "Rare"}"#;
        let result: Result<CreatePersonaRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
