//! SQLite adapter for the MessageStore port
//!
//! Timestamps are stored as RFC 3339 text, statuses as their wire names.

use application::{StoreError, ports::MessageStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, Message, MessageId, MessageStatus};
use sqlx::SqlitePool;

use super::error::map_sqlx_error;

/// SQLite implementation of the message store
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Create a new SQLite message store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn save(&self, message: &Message) -> Result<Message, StoreError> {
        let result = sqlx::query(
            "INSERT INTO message (text, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&message.text)
        .bind(message.status.as_str())
        .bind(message.created_at.to_rfc3339())
        .bind(message.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut saved = message.clone();
        saved.id = Some(MessageId::new(result.last_insert_rowid()));
        Ok(saved)
    }

    async fn update(&self, message: &Message) -> Result<Message, StoreError> {
        let id = message.id.ok_or(StoreError::NotFound)?;

        let result = sqlx::query(
            "UPDATE message
             SET text = $1, status = $2, updated_at = $3
             WHERE id = $4",
        )
        .bind(&message.text)
        .bind(message.status.as_str())
        .bind(message.updated_at.to_rfc3339())
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(message.clone())
    }

    async fn get(&self, id: MessageId) -> Result<Message, StoreError> {
        let row: MessageRow = sqlx::query_as(
            "SELECT id, text, status, created_at, updated_at
             FROM message WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.into_message().map_err(StoreError::backend)
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    text: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl MessageRow {
    fn into_message(self) -> Result<Message, DomainError> {
        Ok(Message {
            id: Some(MessageId::new(self.id)),
            text: self.text,
            status: self.status.parse::<MessageStatus>()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::InvalidDateTime(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn setup() -> (AsyncDatabase, SqliteMessageStore) {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let store = SqliteMessageStore::new(db.pool().clone());
        (db, store)
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let (_db, store) = setup().await;

        let first = store.save(&Message::new("one")).await.unwrap();
        let second = store.save(&Message::new("two")).await.unwrap();

        let (a, b) = (first.id.unwrap(), second.id.unwrap());
        assert!(b > a);
    }

    #[tokio::test]
    async fn save_and_get_roundtrip() {
        let (_db, store) = setup().await;

        let saved = store.save(&Message::new("hello")).await.unwrap();
        let loaded = store.get(saved.id.unwrap()).await.unwrap();

        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.text, "hello");
        assert_eq!(loaded.status, MessageStatus::Created);
        assert_eq!(
            loaded.created_at.timestamp_micros(),
            saved.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_db, store) = setup().await;

        let err = store.get(MessageId::new(999)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_persists_changes() {
        let (_db, store) = setup().await;

        let mut message = store.save(&Message::new("A")).await.unwrap();
        message.apply_text("B");
        message.mark_deleted();
        store.update(&message).await.unwrap();

        let loaded = store.get(message.id.unwrap()).await.unwrap();
        assert_eq!(loaded.text, "B");
        assert_eq!(loaded.status, MessageStatus::Deleted);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let (_db, store) = setup().await;

        let mut message = Message::new("ghost");
        message.id = Some(MessageId::new(42));

        let err = store.update(&message).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_without_id_is_not_found() {
        let (_db, store) = setup().await;

        let err = store.update(&Message::new("new")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn corrupt_timestamp_is_backend_error() {
        let (db, store) = setup().await;

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO message (id, text, status, created_at, updated_at)
             VALUES (7, 'x', 'CREATED', $1, 'not-a-date')",
        )
        .bind(&now)
        .execute(db.pool())
        .await
        .unwrap();

        let err = store.get(MessageId::new(7)).await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn closed_pool_is_backend_error() {
        let (db, store) = setup().await;
        db.close().await;

        let err = store.get(MessageId::new(1)).await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
