//! SQLite persona catalog implementation.
//!
//! Implements `PersonaCatalog` from `memetic-core`. Social links are stored
//! as a JSON text column; everything else maps column-per-field.

use std::collections::HashMap;

use memetic_core::agent::catalog::PersonaCatalog;
use memetic_types::agent::{PersonaProfile, UpdatePersonaRequest};
use memetic_types::error::RepositoryError;
use memetic_types::history::Page;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_err, parse_datetime};

/// SQLite-backed implementation of `PersonaCatalog`.
pub struct SqlitePersonaCatalog {
    pool: DatabasePool,
}

impl SqlitePersonaCatalog {
    /// Create a new catalog backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain PersonaProfile.
struct PersonaRow {
    id: String,
    name: String,
    description: String,
    personality: String,
    category: String,
    token_name: String,
    token_symbol: String,
    token_address: String,
    creator_address: String,
    profile_image_url: Option<String>,
    cover_image_url: Option<String>,
    likes: i64,
    social_links: String,
    created_at: String,
}

impl PersonaRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            personality: row.try_get("personality")?,
            category: row.try_get("category")?,
            token_name: row.try_get("token_name")?,
            token_symbol: row.try_get("token_symbol")?,
            token_address: row.try_get("token_address")?,
            creator_address: row.try_get("creator_address")?,
            profile_image_url: row.try_get("profile_image_url")?,
            cover_image_url: row.try_get("cover_image_url")?,
            likes: row.try_get("likes")?,
            social_links: row.try_get("social_links")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_profile(self) -> Result<PersonaProfile, RepositoryError> {
        let social_links: HashMap<String, String> = serde_json::from_str(&self.social_links)
            .map_err(|e| RepositoryError::Query(format!("invalid social_links: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(PersonaProfile {
            id: self.id,
            name: self.name,
            description: self.description,
            personality: self.personality,
            category: self.category,
            token_name: self.token_name,
            token_symbol: self.token_symbol,
            token_address: self.token_address,
            creator_address: self.creator_address,
            profile_image_url: self.profile_image_url,
            cover_image_url: self.cover_image_url,
            likes: self.likes as u32,
            social_links,
            created_at,
        })
    }
}

fn encode_social_links(links: &HashMap<String, String>) -> Result<String, RepositoryError> {
    serde_json::to_string(links)
        .map_err(|e| RepositoryError::Query(format!("invalid social_links: {e}")))
}

impl PersonaCatalog for SqlitePersonaCatalog {
    async fn create(&self, profile: &PersonaProfile) -> Result<PersonaProfile, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO personas (id, name, description, personality, category, token_name, token_symbol, token_address, creator_address, profile_image_url, cover_image_url, likes, social_links, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.personality)
        .bind(&profile.category)
        .bind(&profile.token_name)
        .bind(&profile.token_symbol)
        .bind(&profile.token_address)
        .bind(&profile.creator_address)
        .bind(&profile.profile_image_url)
        .bind(&profile.cover_image_url)
        .bind(profile.likes as i64)
        .bind(encode_social_links(&profile.social_links)?)
        .bind(format_datetime(&profile.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(profile.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<PersonaProfile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM personas WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_err)?;

        match row {
            Some(row) => {
                let persona_row = PersonaRow::from_row(&row).map_err(map_sqlx_err)?;
                Ok(Some(persona_row.into_profile()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, page: Page) -> Result<Vec<PersonaProfile>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            "SELECT * FROM personas ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in &rows {
            let persona_row = PersonaRow::from_row(row).map_err(map_sqlx_err)?;
            profiles.push(persona_row.into_profile()?);
        }

        Ok(profiles)
    }

    async fn list_by_creator(
        &self,
        creator_address: &str,
        page: Page,
    ) -> Result<Vec<PersonaProfile>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM personas
               WHERE creator_address = ?
               ORDER BY created_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(creator_address)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in &rows {
            let persona_row = PersonaRow::from_row(row).map_err(map_sqlx_err)?;
            profiles.push(persona_row.into_profile()?);
        }

        Ok(profiles)
    }

    async fn update(
        &self,
        id: &str,
        update: &UpdatePersonaRequest,
    ) -> Result<PersonaProfile, RepositoryError> {
        // Fetch, merge in memory, write back. Partial UPDATE statements per
        // field combination are not worth it at this scale.
        let existing = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let merged = PersonaProfile {
            name: update.name.clone().unwrap_or(existing.name),
            description: update.description.clone().unwrap_or(existing.description),
            personality: update.personality.clone().unwrap_or(existing.personality),
            category: update.category.clone().unwrap_or(existing.category),
            profile_image_url: update
                .profile_image_url
                .clone()
                .or(existing.profile_image_url),
            cover_image_url: update.cover_image_url.clone().or(existing.cover_image_url),
            social_links: update
                .social_links
                .clone()
                .unwrap_or(existing.social_links),
            ..existing
        };

        let result = sqlx::query(
            r#"UPDATE personas
               SET name = ?, description = ?, personality = ?, category = ?, profile_image_url = ?, cover_image_url = ?, social_links = ?
               WHERE id = ?"#,
        )
        .bind(&merged.name)
        .bind(&merged.description)
        .bind(&merged.personality)
        .bind(&merged.category)
        .bind(&merged.profile_image_url)
        .bind(&merged.cover_image_url)
        .bind(encode_social_links(&merged.social_links)?)
        .bind(id)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(merged)
    }

    async fn like(&self, id: &str) -> Result<PersonaProfile, RepositoryError> {
        let result = sqlx::query("UPDATE personas SET likes = likes + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }
}
