//! Process-local state store. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storebot_core::ConversationState;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::ConversationStateStore;

#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a saved record.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStateStore for InMemoryStateStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StorageError> {
        Ok(self.states.read().await.get(conversation_id).cloned())
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StorageError> {
        self.states
            .write()
            .await
            .insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}
