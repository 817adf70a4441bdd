//! SQLite history store implementation.
//!
//! Implements `HistoryRepository` from `memetic-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads on the reader
//! pool and writes on the serialized writer.

use chrono::{DateTime, Utc};
use memetic_core::history::repository::HistoryRepository;
use memetic_types::error::RepositoryError;
use memetic_types::history::{ConversationThread, Exchange, ImageRecord, Page};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_err, parse_datetime};

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain ConversationThread.
struct ThreadRow {
    id: String,
    user_id: String,
    agent_id: String,
    message_count: i64,
    created_at: String,
    updated_at: String,
}

impl ThreadRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            agent_id: row.try_get("agent_id")?,
            message_count: row.try_get("message_count")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_thread(self) -> Result<ConversationThread, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid thread id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(ConversationThread {
            id,
            user_id: self.user_id,
            agent_id: self.agent_id,
            message_count: self.message_count as u32,
            created_at,
            updated_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Exchange.
struct ExchangeRow {
    id: String,
    conversation_id: String,
    prompt: String,
    reply: String,
    media_url: Option<String>,
    created_at: String,
}

impl ExchangeRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            prompt: row.try_get("prompt")?,
            reply: row.try_get("reply")?,
            media_url: row.try_get("media_url")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_exchange(self) -> Result<Exchange, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid exchange id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Exchange {
            id,
            conversation_id,
            prompt: self.prompt,
            reply: self.reply,
            media_url: self.media_url,
            created_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ImageRecord.
struct ImageRow {
    id: String,
    user_id: String,
    agent_id: String,
    prompt: String,
    image_url: String,
    created_at: String,
}

impl ImageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            agent_id: row.try_get("agent_id")?,
            prompt: row.try_get("prompt")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<ImageRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid image id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ImageRecord {
            id,
            user_id: self.user_id,
            agent_id: self.agent_id,
            prompt: self.prompt,
            image_url: self.image_url,
            created_at,
        })
    }
}

fn collect_threads(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<ConversationThread>, RepositoryError> {
    let mut threads = Vec::with_capacity(rows.len());
    for row in rows {
        let thread_row = ThreadRow::from_row(row).map_err(map_sqlx_err)?;
        threads.push(thread_row.into_thread()?);
    }
    Ok(threads)
}

fn collect_images(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ImageRecord>, RepositoryError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let image_row = ImageRow::from_row(row).map_err(map_sqlx_err)?;
        records.push(image_row.into_record()?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// HistoryRepository implementation
// ---------------------------------------------------------------------------

impl HistoryRepository for SqliteHistoryRepository {
    async fn create_thread(
        &self,
        user_id: &str,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversationThread, RepositoryError> {
        let thread = ConversationThread {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            agent_id: agent_id.to_string(),
            message_count: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO conversation_threads (id, user_id, agent_id, message_count, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(thread.id.to_string())
        .bind(&thread.user_id)
        .bind(&thread.agent_id)
        .bind(thread.message_count as i64)
        .bind(format_datetime(&thread.created_at))
        .bind(format_datetime(&thread.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(thread)
    }

    async fn latest_thread(
        &self,
        user_id: &str,
        agent_id: &str,
    ) -> Result<Option<ConversationThread>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM conversation_threads
               WHERE user_id = ? AND agent_id = ?
               ORDER BY updated_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(user_id)
        .bind(agent_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        match row {
            Some(row) => {
                let thread_row = ThreadRow::from_row(&row).map_err(map_sqlx_err)?;
                Ok(Some(thread_row.into_thread()?))
            }
            None => Ok(None),
        }
    }

    async fn append_exchange(&self, exchange: &Exchange) -> Result<(), RepositoryError> {
        // Thread bump and exchange insert commit together: a failed insert
        // must not leave updated_at advanced, or the session window would be
        // extended by an exchange that was never persisted.
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_err)?;

        let result = sqlx::query(
            r#"UPDATE conversation_threads
               SET message_count = message_count + 1, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(format_datetime(&exchange.created_at))
        .bind(exchange.conversation_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            // Dropping tx rolls back the no-op update.
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r#"INSERT INTO exchanges (id, conversation_id, prompt, reply, media_url, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(exchange.id.to_string())
        .bind(exchange.conversation_id.to_string())
        .bind(&exchange.prompt)
        .bind(&exchange.reply)
        .bind(&exchange.media_url)
        .bind(format_datetime(&exchange.created_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn exchanges_for_thread(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<Exchange>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM exchanges WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        let mut exchanges = Vec::with_capacity(rows.len());
        for row in &rows {
            let exchange_row = ExchangeRow::from_row(row).map_err(map_sqlx_err)?;
            exchanges.push(exchange_row.into_exchange()?);
        }

        Ok(exchanges)
    }

    async fn threads_by_user(
        &self,
        user_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM conversation_threads
               WHERE user_id = ?
               ORDER BY updated_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        collect_threads(&rows)
    }

    async fn threads_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM conversation_threads
               WHERE agent_id = ?
               ORDER BY updated_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(agent_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        collect_threads(&rows)
    }

    async fn threads_by_user_and_agent(
        &self,
        user_id: &str,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ConversationThread>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM conversation_threads
               WHERE user_id = ? AND agent_id = ?
               ORDER BY updated_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(user_id)
        .bind(agent_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        collect_threads(&rows)
    }

    async fn record_image(&self, record: &ImageRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO image_records (id, user_id, agent_id, prompt, image_url, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(&record.agent_id)
        .bind(&record.prompt)
        .bind(&record.image_url)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn images_by_user(
        &self,
        user_id: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        let page = page.clamped();
        let rows = match agent_id {
            Some(agent_id) => {
                sqlx::query(
                    r#"SELECT * FROM image_records
                       WHERE user_id = ? AND agent_id = ?
                       ORDER BY created_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(user_id)
                .bind(agent_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query(
                    r#"SELECT * FROM image_records
                       WHERE user_id = ?
                       ORDER BY created_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(user_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(map_sqlx_err)?;

        collect_images(&rows)
    }

    async fn images_by_agent(
        &self,
        agent_id: &str,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM image_records
               WHERE agent_id = ?
               ORDER BY created_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(agent_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        collect_images(&rows)
    }

    async fn images_by_wallet(
        &self,
        wallet_address: &str,
        agent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<ImageRecord>, RepositoryError> {
        let page = page.clamped();
        let rows = match agent_id {
            Some(agent_id) => {
                sqlx::query(
                    r#"SELECT i.* FROM image_records i
                       JOIN users u ON u.id = i.user_id
                       WHERE u.wallet_address = ? AND i.agent_id = ?
                       ORDER BY i.created_at DESC, i.id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(wallet_address)
                .bind(agent_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query(
                    r#"SELECT i.* FROM image_records i
                       JOIN users u ON u.id = i.user_id
                       WHERE u.wallet_address = ?
                       ORDER BY i.created_at DESC, i.id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(wallet_address)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(map_sqlx_err)?;

        collect_images(&rows)
    }

    async fn all_images(&self, page: Page) -> Result<Vec<ImageRecord>, RepositoryError> {
        let page = page.clamped();
        let rows = sqlx::query(
            r#"SELECT * FROM image_records
               ORDER BY created_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        collect_images(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_repo() -> SqliteHistoryRepository {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        let pool = DatabasePool::new(&url).await.unwrap();
        SqliteHistoryRepository::new(pool)
    }

    async fn insert_user(repo: &SqliteHistoryRepository, user_id: &str, wallet: &str) {
        sqlx::query("INSERT INTO users (id, wallet_address, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(wallet)
            .bind(Utc::now().to_rfc3339())
            .execute(&repo.pool.writer)
            .await
            .unwrap();
    }

    fn exchange_for(thread: &ConversationThread, prompt: &str, at: DateTime<Utc>) -> Exchange {
        Exchange {
            id: Uuid::now_v7(),
            conversation_id: thread.id,
            prompt: prompt.to_string(),
            reply: format!("re: {prompt}"),
            media_url: None,
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_latest_thread() {
        let repo = test_repo().await;
        let now = Utc::now();

        let created = repo.create_thread("u1", "a1", now).await.unwrap();
        let latest = repo.latest_thread("u1", "a1").await.unwrap().unwrap();

        assert_eq!(latest.id, created.id);
        assert_eq!(latest.message_count, 0);
        assert_eq!(latest.user_id, "u1");
        assert_eq!(latest.agent_id, "a1");
    }

    #[tokio::test]
    async fn test_latest_thread_none_for_unknown_pair() {
        let repo = test_repo().await;
        assert!(repo.latest_thread("u1", "a1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_thread_picks_most_recently_updated() {
        let repo = test_repo().await;
        let now = Utc::now();

        let old = repo.create_thread("u1", "a1", now - Duration::hours(2)).await.unwrap();
        let new = repo.create_thread("u1", "a1", now).await.unwrap();

        let latest = repo.latest_thread("u1", "a1").await.unwrap().unwrap();
        assert_eq!(latest.id, new.id);

        // Appending to the old thread makes it the latest again.
        repo.append_exchange(&exchange_for(&old, "hi", now + Duration::minutes(1)))
            .await
            .unwrap();
        let latest = repo.latest_thread("u1", "a1").await.unwrap().unwrap();
        assert_eq!(latest.id, old.id);
    }

    #[tokio::test]
    async fn test_append_exchange_advances_thread() {
        let repo = test_repo().await;
        let now = Utc::now();
        let thread = repo.create_thread("u1", "a1", now).await.unwrap();

        let later = now + Duration::minutes(5);
        repo.append_exchange(&exchange_for(&thread, "first", later))
            .await
            .unwrap();

        let latest = repo.latest_thread("u1", "a1").await.unwrap().unwrap();
        assert_eq!(latest.message_count, 1);
        assert_eq!(latest.updated_at.to_rfc3339(), later.to_rfc3339());

        let exchanges = repo.exchanges_for_thread(&thread.id).await.unwrap();
        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].prompt, "first");
    }

    #[tokio::test]
    async fn test_append_exchange_missing_thread_not_found() {
        let repo = test_repo().await;
        let orphan = Exchange {
            id: Uuid::now_v7(),
            conversation_id: Uuid::now_v7(),
            prompt: "hi".to_string(),
            reply: "yo".to_string(),
            media_url: None,
            created_at: Utc::now(),
        };

        let err = repo.append_exchange(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_thread_untouched() {
        let repo = test_repo().await;
        let now = Utc::now();
        let thread = repo.create_thread("u1", "a1", now).await.unwrap();

        let first_at = now + Duration::minutes(1);
        let exchange = exchange_for(&thread, "first", first_at);
        repo.append_exchange(&exchange).await.unwrap();

        // Re-appending the same exchange id violates the primary key after
        // the thread bump succeeds; the whole transaction must roll back.
        let duplicate = Exchange {
            created_at: now + Duration::minutes(10),
            ..exchange
        };
        repo.append_exchange(&duplicate).await.unwrap_err();

        let latest = repo.latest_thread("u1", "a1").await.unwrap().unwrap();
        assert_eq!(latest.message_count, 1);
        assert_eq!(latest.updated_at.to_rfc3339(), first_at.to_rfc3339());
        assert_eq!(repo.exchanges_for_thread(&thread.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exchanges_in_chronological_order() {
        let repo = test_repo().await;
        let now = Utc::now();
        let thread = repo.create_thread("u1", "a1", now).await.unwrap();

        for i in 0..3 {
            repo.append_exchange(&exchange_for(
                &thread,
                &format!("p{i}"),
                now + Duration::minutes(i),
            ))
            .await
            .unwrap();
        }

        let exchanges = repo.exchanges_for_thread(&thread.id).await.unwrap();
        let prompts: Vec<&str> = exchanges.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["p0", "p1", "p2"]);
    }

    #[tokio::test]
    async fn test_thread_listings_newest_first_and_paginated() {
        let repo = test_repo().await;
        let now = Utc::now();

        for i in 0..3 {
            repo.create_thread("u1", "a1", now + Duration::minutes(i))
                .await
                .unwrap();
        }
        repo.create_thread("u2", "a1", now).await.unwrap();
        repo.create_thread("u1", "a2", now).await.unwrap();

        let by_user = repo.threads_by_user("u1", Page::default()).await.unwrap();
        assert_eq!(by_user.len(), 4);
        assert!(by_user.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));

        let by_agent = repo.threads_by_agent("a1", Page::default()).await.unwrap();
        assert_eq!(by_agent.len(), 4);

        let by_pair = repo
            .threads_by_user_and_agent("u1", "a1", Page::default())
            .await
            .unwrap();
        assert_eq!(by_pair.len(), 3);

        let page = repo
            .threads_by_user_and_agent("u1", "a1", Page::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_image_records_and_filters() {
        let repo = test_repo().await;
        let now = Utc::now();

        let records = [
            ("u1", "a1"),
            ("u1", "a2"),
            ("u2", "a1"),
        ];
        for (i, (user, agent)) in records.iter().enumerate() {
            repo.record_image(&ImageRecord {
                id: Uuid::now_v7(),
                user_id: user.to_string(),
                agent_id: agent.to_string(),
                prompt: format!("img {i}"),
                image_url: format!("https://img.test/{i}.png"),
                created_at: now + Duration::seconds(i as i64),
            })
            .await
            .unwrap();
        }

        let all = repo.all_images(Page::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let u1 = repo.images_by_user("u1", None, Page::default()).await.unwrap();
        assert_eq!(u1.len(), 2);

        let u1_a1 = repo
            .images_by_user("u1", Some("a1"), Page::default())
            .await
            .unwrap();
        assert_eq!(u1_a1.len(), 1);
        assert_eq!(u1_a1[0].prompt, "img 0");

        let a1 = repo.images_by_agent("a1", Page::default()).await.unwrap();
        assert_eq!(a1.len(), 2);
    }

    #[tokio::test]
    async fn test_images_by_wallet_joins_users() {
        let repo = test_repo().await;
        let now = Utc::now();

        insert_user(&repo, "u1", "0xabc").await;
        insert_user(&repo, "u2", "0xdef").await;

        for (user, agent) in [("u1", "a1"), ("u1", "a2"), ("u2", "a1")] {
            repo.record_image(&ImageRecord {
                id: Uuid::now_v7(),
                user_id: user.to_string(),
                agent_id: agent.to_string(),
                prompt: "img".to_string(),
                image_url: "https://img.test/x.png".to_string(),
                created_at: now,
            })
            .await
            .unwrap();
        }

        let by_wallet = repo
            .images_by_wallet("0xabc", None, Page::default())
            .await
            .unwrap();
        assert_eq!(by_wallet.len(), 2);
        assert!(by_wallet.iter().all(|r| r.user_id == "u1"));

        let scoped = repo
            .images_by_wallet("0xabc", Some("a1"), Page::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);

        let unknown = repo
            .images_by_wallet("0x000", None, Page::default())
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }
}
