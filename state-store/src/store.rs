//! Conversation state store abstraction.

use async_trait::async_trait;
use storebot_core::ConversationState;

use crate::error::StorageError;

/// Key-value store of [`ConversationState`], keyed by conversation id.
///
/// Eviction and retention belong to the implementation; records are never deleted by the bot.
#[async_trait]
pub trait ConversationStateStore: Send + Sync {
    /// Returns the stored record, or `None` if the conversation has never been saved.
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StorageError>;

    /// Inserts or replaces the record for the conversation.
    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StorageError>;

    /// Lazy creation: the stored record, or a fresh default one on first access.
    async fn load_or_create(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationState, StorageError> {
        Ok(self.load(conversation_id).await?.unwrap_or_default())
    }
}
