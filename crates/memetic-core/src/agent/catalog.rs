//! PersonaCatalog trait definition.
//!
//! The durable persona catalog holds the attributes chat and image prompts
//! are built from: name, personality, token identity, creator attribution.
//! Implementations live in memetic-infra (`SqlitePersonaCatalog`).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use memetic_types::agent::{CreatePersonaRequest, PersonaProfile, UpdatePersonaRequest};
use memetic_types::error::{AgentError, RepositoryError};
use memetic_types::history::Page;

/// Repository trait for the durable persona catalog.
pub trait PersonaCatalog: Send + Sync {
    fn create(
        &self,
        profile: &PersonaProfile,
    ) -> impl std::future::Future<Output = Result<PersonaProfile, RepositoryError>> + Send;

    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<PersonaProfile>, RepositoryError>> + Send;

    /// All personas, newest first.
    fn list(
        &self,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<PersonaProfile>, RepositoryError>> + Send;

    /// Personas created by one wallet address, newest first.
    fn list_by_creator(
        &self,
        creator_address: &str,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<PersonaProfile>, RepositoryError>> + Send;

    /// Merge only the provided fields; fails with `NotFound` if absent.
    fn update(
        &self,
        id: &str,
        update: &UpdatePersonaRequest,
    ) -> impl std::future::Future<Output = Result<PersonaProfile, RepositoryError>> + Send;

    /// Increment the like counter and return the updated profile.
    fn like(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<PersonaProfile, RepositoryError>> + Send;
}

/// Validate a creation request and build the profile to persist.
///
/// A persona cannot exist without a token address; the token must be
/// deployed (or at least known) before the persona is cataloged.
pub fn build_profile(
    request: CreatePersonaRequest,
    creator_address: &str,
    now: DateTime<Utc>,
) -> Result<PersonaProfile, AgentError> {
    if request.name.trim().is_empty() {
        return Err(AgentError::Invalid("name must not be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AgentError::Invalid(
            "description must not be empty".to_string(),
        ));
    }
    if request.token.address.trim().is_empty() {
        return Err(AgentError::Invalid(
            "token address is required; deploy a token first or provide an existing address"
                .to_string(),
        ));
    }

    Ok(PersonaProfile {
        id: Uuid::now_v7().to_string(),
        name: request.name,
        description: request.description,
        personality: request.personality.unwrap_or_default(),
        category: request.category.unwrap_or_else(|| "general".to_string()),
        token_name: request.token.name,
        token_symbol: request.token.symbol,
        token_address: request.token.address,
        creator_address: creator_address.to_string(),
        profile_image_url: request.profile_image_url,
        cover_image_url: request.cover_image_url,
        likes: 0,
        social_links: request.social_links.unwrap_or_default(),
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use memetic_types::agent::TokenDetails;

    fn request() -> CreatePersonaRequest {
        CreatePersonaRequest {
            name: "Pepe".to_string(),
            description: "Rare frog".to_string(),
            personality: Some("smug".to_string()),
            category: None,
            token: TokenDetails {
                name: "Pepecoin".to_string(),
                symbol: "PEPE".to_string(),
                address: "0xfe9e".to_string(),
            },
            profile_image_url: Some("https://img.test/pepe.png".to_string()),
            cover_image_url: None,
            social_links: None,
        }
    }

    #[test]
    fn test_build_profile() {
        let profile = build_profile(request(), "0xcafe", Utc::now()).unwrap();
        assert_eq!(profile.name, "Pepe");
        assert_eq!(profile.category, "general");
        assert_eq!(profile.creator_address, "0xcafe");
        assert_eq!(
            profile.profile_image_url.as_deref(),
            Some("https://img.test/pepe.png")
        );
        assert_eq!(profile.likes, 0);
        assert!(!profile.id.is_empty());
    }

    #[test]
    fn test_build_profile_rejects_missing_token_address() {
        let mut req = request();
        req.token.address = "  ".to_string();
        let err = build_profile(req, "0xcafe", Utc::now()).unwrap_err();
        assert!(matches!(err, AgentError::Invalid(_)));
    }

    #[test]
    fn test_build_profile_rejects_empty_name() {
        let mut req = request();
        req.name = String::new();
        assert!(build_profile(req, "0xcafe", Utc::now()).is_err());
    }
}
