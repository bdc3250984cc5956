//! Lifecycle hooks the engine calls at session boundaries.
//!
//! Hooks are the only place state crosses between the conversation's durable record and engine
//! memory: start copies store → memory, end copies memory → store. Both reach the durable record
//! only through the turn they are given.

use async_trait::async_trait;
use storebot_core::{Result, TurnContext};

use crate::memory::EngineMemory;
use crate::session::SessionEndState;

#[async_trait]
pub trait SessionHooks: Send + Sync {
    /// Called exactly once before a session is established. An error aborts the session.
    async fn on_session_start(&self, turn: &TurnContext, memory: &mut EngineMemory) -> Result<()>;

    /// Called exactly once after a session has terminated, whatever the end state.
    async fn on_session_end(
        &self,
        turn: &TurnContext,
        memory: &EngineMemory,
        end_state: SessionEndState,
        payload: Option<&str>,
    ) -> Result<()>;
}
