//! Dialogue engine contract consumed by the turn router.

use async_trait::async_trait;
use storebot_core::{Result, TurnContext};

use crate::session::SessionEndState;

/// One step the engine decided on for a turn, executed in order by `send_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Send a text reply.
    Say(String),
    /// Write a text slot into session memory.
    Remember { slot: String, value: String },
    /// Terminate the session; runs the session-end hook.
    EndSession {
        end_state: SessionEndState,
        payload: Option<String>,
    },
}

/// Output of `recognize`: what the engine will do for this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    pub conversation_id: String,
    pub actions: Vec<EngineAction>,
}

impl EngineResult {
    pub fn ends_session(&self) -> bool {
        self.actions
            .iter()
            .any(|a| matches!(a, EngineAction::EndSession { .. }))
    }
}

#[async_trait]
pub trait DialogueEngine: Send + Sync {
    /// True when the turn comes from the privileged training surface.
    fn is_training_surface(&self, turn: &TurnContext) -> bool;

    /// Starts a session for the turn's conversation, running the session-start hook first.
    /// A session already active for the conversation is ended as abandoned beforehand.
    async fn start_session(&self, turn: &TurnContext) -> Result<()>;

    /// Decides what to do with the turn. `None` when there is nothing to do.
    async fn recognize(&self, turn: &TurnContext) -> Result<Option<EngineResult>>;

    /// Executes a result produced by `recognize` for the same turn.
    async fn send_result(&self, turn: &TurnContext, result: EngineResult) -> Result<()>;
}
