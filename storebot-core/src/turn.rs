//! Per-turn context: the inbound activity, the channel adapter used for replies, and the
//! conversation state record loaded for this turn only.
//!
//! State is never cached across turns. Middleware attaches a freshly loaded record before the
//! handlers run and persists it afterwards.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error};

use crate::channel::ChannelAdapter;
use crate::error::{HandlerError, Result};
use crate::types::{Activity, ConversationState};

/// One inbound activity plus the opportunity to reply, scoped to one conversation.
pub struct TurnContext {
    activity: Activity,
    adapter: Arc<dyn ChannelAdapter>,
    state: Mutex<Option<ConversationState>>,
}

impl TurnContext {
    /// Creates a turn with no state attached yet.
    pub fn new(activity: Activity, adapter: Arc<dyn ChannelAdapter>) -> Self {
        Self {
            activity,
            adapter,
            state: Mutex::new(None),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn conversation_id(&self) -> &str {
        self.activity.conversation_id()
    }

    /// Sends a text reply. Fire-and-forget: delivery failures are logged, never returned.
    pub async fn send_text(&self, text: &str) {
        let reply = self.activity.reply_text(text);
        match self.adapter.send_activity(&reply).await {
            Ok(()) => debug!(
                conversation_id = %self.conversation_id(),
                reply_len = text.len(),
                "step: reply sent"
            ),
            Err(e) => error!(
                conversation_id = %self.conversation_id(),
                error = %e,
                "Failed to deliver reply"
            ),
        }
    }

    /// Attaches the state record loaded for this turn, replacing any previous one.
    pub fn attach_state(&self, state: ConversationState) {
        *self.lock_state() = Some(state);
    }

    /// Copy of the attached record, if any.
    pub fn state_snapshot(&self) -> Option<ConversationState> {
        self.lock_state().clone()
    }

    /// Runs `f` against the attached record. Fails with `StateUnavailable` when none is attached.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ConversationState) -> R) -> Result<R> {
        let mut guard = self.lock_state();
        match guard.as_mut() {
            Some(state) => Ok(f(state)),
            None => {
                Err(HandlerError::StateUnavailable(self.conversation_id().to_string()).into())
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, Option<ConversationState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use async_trait::async_trait;

    struct RecordingAdapter {
        sent: Mutex<Vec<Activity>>,
        fail: bool,
    }

    #[async_trait]
    impl ChannelAdapter for RecordingAdapter {
        async fn send_activity(&self, activity: &Activity) -> Result<()> {
            if self.fail {
                return Err(BotError::Channel("unreachable".to_string()));
            }
            self.sent.lock().unwrap().push(activity.clone());
            Ok(())
        }
    }

    fn turn(fail: bool) -> (TurnContext, Arc<RecordingAdapter>) {
        let adapter = Arc::new(RecordingAdapter {
            sent: Mutex::new(Vec::new()),
            fail,
        });
        let turn = TurnContext::new(Activity::message("test", "conv-1", "hi"), adapter.clone());
        (turn, adapter)
    }

    #[test]
    fn test_with_state_without_record_is_state_unavailable() {
        let (turn, _) = turn(false);
        let err = turn.with_state(|s| s.store_open).unwrap_err();
        assert!(matches!(
            err,
            BotError::Handler(HandlerError::StateUnavailable(ref id)) if id == "conv-1"
        ));
    }

    #[test]
    fn test_with_state_mutates_in_place() {
        let (turn, _) = turn(false);
        turn.attach_state(ConversationState::default());

        turn.with_state(|s| s.store_open = true).unwrap();

        assert!(turn.state_snapshot().unwrap().store_open);
    }

    #[tokio::test]
    async fn test_send_text_replies_to_conversation() {
        let (turn, adapter) = turn(false);
        turn.send_text("hello").await;

        let sent = adapter.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text.as_deref(), Some("hello"));
        assert_eq!(sent[0].conversation.id, "conv-1");
    }

    #[tokio::test]
    async fn test_send_text_swallows_delivery_failure() {
        let (turn, adapter) = turn(true);
        turn.send_text("hello").await;
        assert!(adapter.sent.lock().unwrap().is_empty());
    }
}
