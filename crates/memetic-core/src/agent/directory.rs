//! In-process agent directory.
//!
//! A volatile registry of agent personas with process-lifetime storage.
//! It is an explicitly owned instance passed into request handlers, never a
//! global. Not authoritative: the durable persona catalog is what chat
//! prompts are built from.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use memetic_types::agent::{AgentPersona, CreateAgentRequest, UpdateAgentRequest};
use memetic_types::error::AgentError;

/// Id of the persona bootstrapped at construction.
pub const DEFAULT_AGENT_ID: &str = "default";

/// Volatile CRUD registry of agent personas, keyed by id.
pub struct AgentDirectory {
    agents: DashMap<String, AgentPersona>,
}

impl AgentDirectory {
    /// Create a directory seeded with the default bootstrap persona.
    pub fn new() -> Self {
        let directory = Self {
            agents: DashMap::new(),
        };
        directory.agents.insert(
            DEFAULT_AGENT_ID.to_string(),
            AgentPersona {
                id: DEFAULT_AGENT_ID.to_string(),
                name: "Default Agent".to_string(),
                description: "A helpful AI assistant".to_string(),
                personality: "Friendly and professional".to_string(),
                category: "General".to_string(),
                social_links: Default::default(),
                created_at: Utc::now(),
            },
        );
        directory
    }

    /// Create a persona with a freshly generated id.
    pub fn create(&self, request: CreateAgentRequest) -> Result<AgentPersona, AgentError> {
        if request.name.trim().is_empty() {
            return Err(AgentError::Invalid("name must not be empty".to_string()));
        }
        if request.description.trim().is_empty() {
            return Err(AgentError::Invalid(
                "description must not be empty".to_string(),
            ));
        }

        let persona = AgentPersona {
            id: Uuid::now_v7().to_string(),
            name: request.name,
            description: request.description,
            personality: request.personality.unwrap_or_default(),
            category: request.category.unwrap_or_else(|| "General".to_string()),
            social_links: request.social_links.unwrap_or_default(),
            created_at: Utc::now(),
        };
        self.agents.insert(persona.id.clone(), persona.clone());
        Ok(persona)
    }

    pub fn get(&self, id: &str) -> Result<AgentPersona, AgentError> {
        self.agents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(AgentError::NotFound)
    }

    /// Merge only the provided fields over the existing persona.
    pub fn update(&self, id: &str, update: UpdateAgentRequest) -> Result<AgentPersona, AgentError> {
        let mut entry = self.agents.get_mut(id).ok_or(AgentError::NotFound)?;
        let persona = entry.value_mut();
        if let Some(name) = update.name {
            persona.name = name;
        }
        if let Some(description) = update.description {
            persona.description = description;
        }
        if let Some(personality) = update.personality {
            persona.personality = personality;
        }
        if let Some(category) = update.category {
            persona.category = category;
        }
        if let Some(links) = update.social_links {
            persona.social_links = links;
        }
        Ok(persona.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), AgentError> {
        self.agents
            .remove(id)
            .map(|_| ())
            .ok_or(AgentError::NotFound)
    }

    /// All held personas, unordered.
    pub fn list(&self) -> Vec<AgentPersona> {
        self.agents
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str) -> CreateAgentRequest {
        CreateAgentRequest {
            name: name.to_string(),
            description: "a meme agent".to_string(),
            personality: Some("chaotic".to_string()),
            category: None,
            social_links: None,
        }
    }

    #[test]
    fn test_bootstraps_default_agent() {
        let directory = AgentDirectory::new();
        let default = directory.get(DEFAULT_AGENT_ID).unwrap();
        assert_eq!(default.name, "Default Agent");
    }

    #[test]
    fn test_create_and_get() {
        let directory = AgentDirectory::new();
        let created = directory.create(create_request("Doge")).unwrap();
        let fetched = directory.get(&created.id).unwrap();
        assert_eq!(fetched.name, "Doge");
        assert_eq!(fetched.category, "General");
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let directory = AgentDirectory::new();
        let mut request = create_request("");
        request.name = "   ".to_string();
        assert!(matches!(
            directory.create(request),
            Err(AgentError::Invalid(_))
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let directory = AgentDirectory::new();
        let a = directory.create(create_request("A")).unwrap();
        let b = directory.create(create_request("B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_partial_update_preserves_other_fields() {
        let directory = AgentDirectory::new();
        let created = directory.create(create_request("Doge")).unwrap();

        let updated = directory
            .update(
                &created.id,
                UpdateAgentRequest {
                    personality: Some("calm".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Doge");
        assert_eq!(updated.personality, "calm");
        assert_eq!(updated.description, "a meme agent");
    }

    #[test]
    fn test_update_missing_agent_fails() {
        let directory = AgentDirectory::new();
        assert!(matches!(
            directory.update("nope", UpdateAgentRequest::default()),
            Err(AgentError::NotFound)
        ));
    }

    #[test]
    fn test_delete() {
        let directory = AgentDirectory::new();
        let created = directory.create(create_request("Doge")).unwrap();
        directory.delete(&created.id).unwrap();
        assert!(matches!(directory.get(&created.id), Err(AgentError::NotFound)));
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let directory = AgentDirectory::new();
        assert!(matches!(
            directory.delete("never-created"),
            Err(AgentError::NotFound)
        ));
    }

    #[test]
    fn test_list_includes_created() {
        let directory = AgentDirectory::new();
        directory.create(create_request("Doge")).unwrap();
        // default + created
        assert_eq!(directory.list().len(), 2);
    }
}
