//! Scripted store engine: a small in-process [`DialogueEngine`] that runs one purchase per session.
//!
//! While a session is active every message is an order: `cancel` abandons the session, a closed
//! store refuses and abandons, an item the `inventory` callback knows completes the session with
//! that item, anything else gets the inventory listed back and the session stays open.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storebot_core::{BotError, Result, SessionError, TurnContext};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::callback::{ApiCallback, CallbackRegistry};
use crate::engine::{DialogueEngine, EngineAction, EngineResult};
use crate::hooks::SessionHooks;
use crate::memory::EngineMemory;
use crate::session::{Session, SessionEndState, SessionInfo};

/// Memory slot seeded from the conversation's open/closed flag at session start.
pub const STORE_OPEN_SLOT: &str = "storeIsOpen";
/// Memory slot holding the item bought in this session.
pub const PURCHASED_ITEM_SLOT: &str = "purchasedItem";
/// Callback returning the items matching its argument, or every item when called without one.
pub const INVENTORY_CALLBACK: &str = "inventory";
/// `channelData` flag marking a turn as coming from the training surface.
pub const TRAINING_SURFACE_FLAG: &str = "trainingSurface";

pub const CANCEL_TEXT: &str = "cancel";
pub const CANCELLED_REPLY: &str = "Okay, maybe next time.";
pub const STORE_CLOSED_REPLY: &str = "Sorry, the store is closed right now.";

pub struct ScriptedEngine {
    hooks: Arc<dyn SessionHooks>,
    callbacks: CallbackRegistry,
    sessions: Mutex<HashMap<String, Session>>,
    training_channel_id: String,
}

impl ScriptedEngine {
    /// Creates an engine with the hooks it calls at session boundaries.
    pub fn new(hooks: Arc<dyn SessionHooks>, training_channel_id: impl Into<String>) -> Self {
        Self {
            hooks,
            callbacks: CallbackRegistry::new(),
            sessions: Mutex::new(HashMap::new()),
            training_channel_id: training_channel_id.into(),
        }
    }

    /// Registers a named callback the engine can invoke mid-session.
    pub fn with_callback(mut self, name: &str, callback: Arc<dyn ApiCallback>) -> Self {
        self.callbacks.register(name, callback);
        self
    }

    pub fn callback_names(&self) -> Vec<String> {
        self.callbacks.names()
    }

    pub async fn has_session(&self, conversation_id: &str) -> bool {
        self.sessions.lock().await.contains_key(conversation_id)
    }

    /// Snapshot of every active session, ordered by conversation id.
    pub async fn active_sessions(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.lock().await;
        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .map(|(conversation_id, session)| SessionInfo {
                conversation_id: conversation_id.clone(),
                started_at: session.started_at,
                turns: session.turns,
                memory: session.memory.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.conversation_id.cmp(&b.conversation_id));
        infos
    }

    /// Terminates the turn's session and runs the session-end hook once.
    ///
    /// A failing hook is logged and goes no further; the session is gone either way. Returns
    /// false when the conversation had no active session.
    #[instrument(skip(self, turn, payload), fields(conversation_id = %turn.conversation_id()))]
    pub async fn end_session(
        &self,
        turn: &TurnContext,
        end_state: SessionEndState,
        payload: Option<&str>,
    ) -> bool {
        let removed = self.sessions.lock().await.remove(turn.conversation_id());
        let Some(session) = removed else {
            warn!(end_state = ?end_state, "No active session to end");
            return false;
        };

        info!(end_state = ?end_state, turns = session.turns, "step: session ended");

        if let Err(e) = self
            .hooks
            .on_session_end(turn, &session.memory, end_state, payload)
            .await
        {
            error!(error = %e, end_state = ?end_state, "Session end hook failed");
        }
        true
    }

    async fn decide(&self, memory: &EngineMemory, text: &str) -> Result<Vec<EngineAction>> {
        if text.eq_ignore_ascii_case(CANCEL_TEXT) {
            return Ok(vec![
                EngineAction::Say(CANCELLED_REPLY.to_string()),
                EngineAction::EndSession {
                    end_state: SessionEndState::Abandoned,
                    payload: None,
                },
            ]);
        }

        if memory.get_bool(STORE_OPEN_SLOT) != Some(true) {
            return Ok(vec![
                EngineAction::Say(STORE_CLOSED_REPLY.to_string()),
                EngineAction::EndSession {
                    end_state: SessionEndState::Abandoned,
                    payload: None,
                },
            ]);
        }

        let matches = self
            .callbacks
            .invoke(INVENTORY_CALLBACK, memory, &[text])
            .await?;

        match matches.into_iter().next() {
            Some(item) => Ok(vec![
                EngineAction::Remember {
                    slot: PURCHASED_ITEM_SLOT.to_string(),
                    value: item.clone(),
                },
                EngineAction::Say(format!("You bought {}.", item)),
                EngineAction::EndSession {
                    end_state: SessionEndState::Completed,
                    payload: Some(item),
                },
            ]),
            None => {
                let all = self.callbacks.invoke(INVENTORY_CALLBACK, memory, &[]).await?;
                Ok(vec![EngineAction::Say(format!(
                    "Sorry, we don't carry \"{}\". We have: {}. Say \"{}\" to leave the store.",
                    text,
                    all.join(", "),
                    CANCEL_TEXT
                ))])
            }
        }
    }
}

#[async_trait]
impl DialogueEngine for ScriptedEngine {
    fn is_training_surface(&self, turn: &TurnContext) -> bool {
        let activity = turn.activity();
        activity.channel_id == self.training_channel_id
            || activity
                .channel_data
                .as_ref()
                .and_then(|data| data.get(TRAINING_SURFACE_FLAG))
                .and_then(|flag| flag.as_bool())
                .unwrap_or(false)
    }

    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id()))]
    async fn start_session(&self, turn: &TurnContext) -> Result<()> {
        let conversation_id = turn.conversation_id();
        if self.has_session(conversation_id).await {
            warn!("Session already active, abandoning it before starting a new one");
            self.end_session(turn, SessionEndState::Abandoned, None).await;
        }

        let mut memory = EngineMemory::new();
        self.hooks
            .on_session_start(turn, &mut memory)
            .await
            .map_err(|e| {
                error!(error = %e, "Session start hook failed, session not established");
                match e {
                    BotError::Session(SessionError::StartFailure(_)) => e,
                    other => SessionError::StartFailure(other.to_string()).into(),
                }
            })?;

        self.sessions
            .lock()
            .await
            .insert(conversation_id.to_string(), Session::new(memory));
        info!("step: session started");
        Ok(())
    }

    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id()))]
    async fn recognize(&self, turn: &TurnContext) -> Result<Option<EngineResult>> {
        let Some(text) = turn.activity().message_text() else {
            debug!("Non-message activity, nothing to recognize");
            return Ok(None);
        };

        let conversation_id = turn.conversation_id().to_string();
        if !self.has_session(&conversation_id).await {
            info!("No active session for engine-owned turn, starting one");
            self.start_session(turn).await?;
        }

        let memory = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.get_mut(&conversation_id).ok_or_else(|| {
                BotError::Engine(format!("session vanished for {}", conversation_id))
            })?;
            session.turns += 1;
            session.memory.clone()
        };

        let actions = self.decide(&memory, text.trim()).await?;
        debug!(actions = ?actions, "step: recognized");

        Ok(Some(EngineResult {
            conversation_id,
            actions,
        }))
    }

    #[instrument(skip(self, turn, result), fields(conversation_id = %turn.conversation_id()))]
    async fn send_result(&self, turn: &TurnContext, result: EngineResult) -> Result<()> {
        let EngineResult {
            conversation_id,
            actions,
        } = result;

        for action in actions {
            match action {
                EngineAction::Say(text) => turn.send_text(&text).await,
                EngineAction::Remember { slot, value } => {
                    let mut sessions = self.sessions.lock().await;
                    match sessions.get_mut(&conversation_id) {
                        Some(session) => session.memory.set_text(&slot, value),
                        None => warn!(slot = %slot, "No active session to remember into"),
                    }
                }
                EngineAction::EndSession { end_state, payload } => {
                    self.end_session(turn, end_state, payload.as_deref()).await;
                }
            }
        }
        Ok(())
    }
}
