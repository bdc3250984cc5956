use std::sync::Arc;

use async_trait::async_trait;
use state_store::ConversationStateStore;
use storebot_core::{HandlerError, HandlerResponse, Middleware, Result, TurnContext};
use tracing::{error, info, instrument};

/// Attaches the conversation's state record to the turn before the handlers run and saves it
/// after they finish.
///
/// State is loaded fresh on every turn. A load failure aborts the turn with `StateUnavailable`;
/// since the chain skips after() on error, a failed turn never persists partial changes.
#[derive(Clone)]
pub struct ConversationStateMiddleware {
    store: Arc<dyn ConversationStateStore>,
}

impl ConversationStateMiddleware {
    pub fn new(store: Arc<dyn ConversationStateStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Middleware for ConversationStateMiddleware {
    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id()))]
    async fn before(&self, turn: &TurnContext) -> Result<bool> {
        let conversation_id = turn.conversation_id();
        let state = self.store.load_or_create(conversation_id).await.map_err(|e| {
            error!(error = %e, "Failed to load conversation state");
            HandlerError::StateUnavailable(conversation_id.to_string())
        })?;

        info!(
            using_delegate = state.using_delegate,
            store_open = state.store_open,
            "step: conversation state loaded"
        );
        turn.attach_state(state);
        Ok(true)
    }

    #[instrument(skip(self, turn, _response), fields(conversation_id = %turn.conversation_id()))]
    async fn after(&self, turn: &TurnContext, _response: &HandlerResponse) -> Result<()> {
        let Some(state) = turn.state_snapshot() else {
            return Err(HandlerError::StateUnavailable(turn.conversation_id().to_string()).into());
        };

        self.store
            .save(turn.conversation_id(), &state)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save conversation state");
                e
            })?;

        info!(
            using_delegate = state.using_delegate,
            store_open = state.store_open,
            "step: conversation state saved"
        );
        Ok(())
    }
}
