//! Turn router: decides whether the dialogue engine or local commands own a turn.
//!
//! First match wins:
//! 1. training-surface turn → engine;
//! 2. conversation in delegate mode (`using_delegate`) → engine;
//! 3. non-message activity → ignored;
//! 4. local command by exact text, anything else → help.

use std::sync::Arc;

use async_trait::async_trait;
use dialogue_engine::DialogueEngine;
use storebot_core::{Handler, HandlerResponse, Result, TurnContext};
use tracing::{debug, info, instrument};

use crate::commands::{
    history_reply, LocalCommand, HELP_REPLY, SHOP_REPLY, STORE_CLOSED_REPLY, STORE_OPENED_REPLY,
};

pub struct TurnRouter {
    engine: Arc<dyn DialogueEngine>,
}

impl TurnRouter {
    pub fn new(engine: Arc<dyn DialogueEngine>) -> Self {
        Self { engine }
    }

    async fn delegate(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        match self.engine.recognize(turn).await? {
            Some(result) => {
                debug!(ends_session = result.ends_session(), "step: engine result produced");
                self.engine.send_result(turn, result).await?;
            }
            None => debug!("step: engine produced no result"),
        }
        Ok(HandlerResponse::Stop)
    }

    async fn dispatch_local(&self, turn: &TurnContext, text: &str) -> Result<HandlerResponse> {
        let Some(command) = LocalCommand::parse(text) else {
            info!(route = "help", "step: unknown text, sending help");
            turn.send_text(HELP_REPLY).await;
            return Ok(HandlerResponse::Stop);
        };

        info!(route = "local", command = ?command, "step: local command");
        match command {
            LocalCommand::OpenStore => {
                turn.with_state(|state| state.store_open = true)?;
                turn.send_text(STORE_OPENED_REPLY).await;
            }
            LocalCommand::CloseStore => {
                turn.with_state(|state| state.store_open = false)?;
                turn.send_text(STORE_CLOSED_REPLY).await;
            }
            LocalCommand::Shop => {
                // Ending a leftover session clears the flag, so set it only once the new one is up.
                self.engine.start_session(turn).await?;
                turn.with_state(|state| state.using_delegate = true)?;
                turn.send_text(SHOP_REPLY).await;
            }
            LocalCommand::History => {
                let purchased = turn.with_state(|state| state.purchased_item.clone())?;
                turn.send_text(&history_reply(purchased.as_deref())).await;
            }
        }
        Ok(HandlerResponse::Stop)
    }
}

#[async_trait]
impl Handler for TurnRouter {
    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id()))]
    async fn handle(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        if self.engine.is_training_surface(turn) {
            info!(route = "engine", reason = "training_surface", "step: routed");
            return self.delegate(turn).await;
        }

        if turn.with_state(|state| state.using_delegate)? {
            info!(route = "engine", reason = "using_delegate", "step: routed");
            return self.delegate(turn).await;
        }

        let Some(text) = turn.activity().message_text() else {
            debug!(activity_type = ?turn.activity().activity_type, "step: non-message activity ignored");
            return Ok(HandlerResponse::Ignore);
        };

        self.dispatch_local(turn, text).await
    }
}
