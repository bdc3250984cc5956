//! SQLite-backed state store: one JSON row per conversation.
//!
//! External: SQLite via sqlx. Records survive restarts, so a conversation left in delegate mode
//! by a crash is still delegate-owned when the process comes back.

use async_trait::async_trait;
use chrono::Utc;
use storebot_core::ConversationState;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use crate::store::ConversationStateStore;

#[derive(Clone)]
pub struct SqliteStateStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteStateStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating conversation_state table if not exists");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversation_state (
                conversation_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ConversationStateStore for SqliteStateStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM conversation_state WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;

        row.map(|(json,)| {
            serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
                key: conversation_id.to_string(),
                source,
            })
        })
        .transpose()
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_state (conversation_id, state, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(conversation_id) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(conversation_id)
        .bind(&json)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(conversation_id = %conversation_id, "Saved conversation state");
        Ok(())
    }
}
