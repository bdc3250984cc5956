//! Session hooks moving state between the conversation record and engine memory.
//!
//! Start copies `store_open` into memory and never writes the record. End clears
//! `using_delegate` before anything that can fail, then on completion acknowledges and records
//! the purchase.

use async_trait::async_trait;
use dialogue_engine::{
    EngineMemory, SessionEndState, SessionHooks, PURCHASED_ITEM_SLOT, STORE_OPEN_SLOT,
};
use storebot_core::{Result, SessionError, TurnContext};
use tracing::{error, info, instrument};

use crate::commands::CLOSING_ACK;

#[derive(Debug, Default, Clone, Copy)]
pub struct StoreSessionHooks;

impl StoreSessionHooks {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionHooks for StoreSessionHooks {
    #[instrument(skip(self, turn, memory), fields(conversation_id = %turn.conversation_id()))]
    async fn on_session_start(&self, turn: &TurnContext, memory: &mut EngineMemory) -> Result<()> {
        let store_open = turn
            .with_state(|state| state.store_open)
            .map_err(|e| SessionError::StartFailure(e.to_string()))?;

        memory.set_bool(STORE_OPEN_SLOT, store_open);
        info!(store_open, "step: session memory seeded");
        Ok(())
    }

    #[instrument(skip(self, turn, memory, payload), fields(conversation_id = %turn.conversation_id()))]
    async fn on_session_end(
        &self,
        turn: &TurnContext,
        memory: &EngineMemory,
        end_state: SessionEndState,
        payload: Option<&str>,
    ) -> Result<()> {
        turn.with_state(|state| state.using_delegate = false)
            .map_err(|e| {
                error!(error = %e, end_state = ?end_state, "No state record at session end");
                SessionError::EndFailure(e.to_string())
            })?;

        if end_state != SessionEndState::Completed {
            info!(end_state = ?end_state, "step: delegate released");
            return Ok(());
        }

        turn.send_text(CLOSING_ACK).await;

        let purchased = memory
            .get_text(PURCHASED_ITEM_SLOT)
            .or(payload)
            .map(str::to_string);
        if let Some(item) = purchased {
            info!(purchased_item = %item, "step: purchase recorded");
            turn.with_state(|state| state.purchased_item = Some(item))
                .map_err(|e| SessionError::EndFailure(e.to_string()))?;
        }
        Ok(())
    }
}
