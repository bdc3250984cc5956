//! Integration tests for [`dialogue_engine::ScriptedEngine`].
//!
//! Covers: training-surface detection, start hook run exactly once and its failure aborting the
//! session, the purchase flow through the inventory callback, cancel and closed-store abandonment,
//! and end hook failures not escaping the engine.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dialogue_engine::{
    ApiCallback, DialogueEngine, EngineAction, EngineMemory, ScriptedEngine, SessionEndState,
    SessionHooks, CANCELLED_REPLY, INVENTORY_CALLBACK, PURCHASED_ITEM_SLOT, STORE_CLOSED_REPLY,
    STORE_OPEN_SLOT,
};
use storebot_core::{Activity, BotError, ChannelAdapter, SessionError, TurnContext};

#[derive(Default)]
struct RecordingChannel {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ChannelAdapter for RecordingChannel {
    async fn send_activity(&self, activity: &Activity) -> storebot_core::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(activity.text.clone().unwrap_or_default());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct EndRecord {
    end_state: SessionEndState,
    payload: Option<String>,
    purchased: Option<String>,
}

struct RecordingHooks {
    store_open: bool,
    fail_start: bool,
    fail_end: bool,
    starts: Mutex<u32>,
    ends: Mutex<Vec<EndRecord>>,
}

impl RecordingHooks {
    fn new(store_open: bool) -> Self {
        Self {
            store_open,
            fail_start: false,
            fail_end: false,
            starts: Mutex::new(0),
            ends: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionHooks for RecordingHooks {
    async fn on_session_start(
        &self,
        _turn: &TurnContext,
        memory: &mut EngineMemory,
    ) -> storebot_core::Result<()> {
        *self.starts.lock().unwrap() += 1;
        if self.fail_start {
            return Err(BotError::Storage("store offline".to_string()));
        }
        memory.set_bool(STORE_OPEN_SLOT, self.store_open);
        Ok(())
    }

    async fn on_session_end(
        &self,
        _turn: &TurnContext,
        memory: &EngineMemory,
        end_state: SessionEndState,
        payload: Option<&str>,
    ) -> storebot_core::Result<()> {
        self.ends.lock().unwrap().push(EndRecord {
            end_state,
            payload: payload.map(str::to_string),
            purchased: memory.get_text(PURCHASED_ITEM_SLOT).map(str::to_string),
        });
        if self.fail_end {
            return Err(SessionError::EndFailure("no state".to_string()).into());
        }
        Ok(())
    }
}

struct FixedInventory(Vec<&'static str>);

#[async_trait]
impl ApiCallback for FixedInventory {
    async fn invoke(&self, _memory: &EngineMemory, args: &[&str]) -> storebot_core::Result<Vec<String>> {
        Ok(self
            .0
            .iter()
            .filter(|item| args.first().map_or(true, |wanted| item.eq_ignore_ascii_case(wanted)))
            .map(|item| item.to_string())
            .collect())
    }
}

fn engine(hooks: Arc<RecordingHooks>) -> ScriptedEngine {
    ScriptedEngine::new(hooks, "training")
        .with_callback(INVENTORY_CALLBACK, Arc::new(FixedInventory(vec!["milk", "bread"])))
}

fn turn(channel_id: &str, text: &str, channel: Arc<RecordingChannel>) -> TurnContext {
    TurnContext::new(Activity::message(channel_id, "conv-1", text), channel)
}

async fn run_turn(engine: &ScriptedEngine, turn: &TurnContext) {
    if let Some(result) = engine.recognize(turn).await.unwrap() {
        engine.send_result(turn, result).await.unwrap();
    }
}

#[test]
fn test_training_surface_by_channel_or_flag() {
    let engine = engine(Arc::new(RecordingHooks::new(true)));
    let channel = Arc::new(RecordingChannel::default());

    assert!(engine.is_training_surface(&turn("training", "hi", channel.clone())));
    assert!(!engine.is_training_surface(&turn("webchat", "hi", channel.clone())));

    let mut activity = Activity::message("webchat", "conv-1", "hi");
    activity.channel_data = Some(serde_json::json!({ "trainingSurface": true }));
    assert!(engine.is_training_surface(&TurnContext::new(activity, channel)));
}

#[tokio::test]
async fn test_start_session_runs_hook_once() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let t = turn("webchat", "shop", Arc::new(RecordingChannel::default()));

    engine.start_session(&t).await.unwrap();

    assert_eq!(*hooks.starts.lock().unwrap(), 1);
    assert!(hooks.ends.lock().unwrap().is_empty());
    assert!(engine.has_session("conv-1").await);
}

#[tokio::test]
async fn test_start_session_replaces_active_session() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    let t = turn("webchat", "shop", channel.clone());
    engine.start_session(&t).await.unwrap();
    run_turn(&engine, &turn("webchat", "caviar", channel.clone())).await;

    engine.start_session(&t).await.unwrap();

    assert_eq!(*hooks.starts.lock().unwrap(), 2);
    assert_eq!(
        *hooks.ends.lock().unwrap(),
        vec![EndRecord {
            end_state: SessionEndState::Abandoned,
            payload: None,
            purchased: None,
        }]
    );
    let sessions = engine.active_sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].turns, 0);
}

#[tokio::test]
async fn test_start_hook_failure_aborts_session() {
    let mut hooks = RecordingHooks::new(true);
    hooks.fail_start = true;
    let engine = engine(Arc::new(hooks));
    let t = turn("webchat", "shop", Arc::new(RecordingChannel::default()));

    let err = engine.start_session(&t).await.unwrap_err();

    assert!(matches!(err, BotError::Session(SessionError::StartFailure(_))));
    assert!(!engine.has_session("conv-1").await);
}

#[tokio::test]
async fn test_known_item_completes_session() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    engine
        .start_session(&turn("webchat", "shop", channel.clone()))
        .await
        .unwrap();

    let t = turn("webchat", "Milk", channel.clone());
    let result = engine.recognize(&t).await.unwrap().unwrap();
    assert!(result.ends_session());
    assert_eq!(
        result.actions[0],
        EngineAction::Remember {
            slot: PURCHASED_ITEM_SLOT.to_string(),
            value: "milk".to_string()
        }
    );
    engine.send_result(&t, result).await.unwrap();

    assert_eq!(*channel.sent.lock().unwrap(), vec!["You bought milk."]);
    assert_eq!(
        *hooks.ends.lock().unwrap(),
        vec![EndRecord {
            end_state: SessionEndState::Completed,
            payload: Some("milk".to_string()),
            purchased: Some("milk".to_string()),
        }]
    );
    assert!(!engine.has_session("conv-1").await);
}

#[tokio::test]
async fn test_unknown_item_keeps_session_open() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    engine
        .start_session(&turn("webchat", "shop", channel.clone()))
        .await
        .unwrap();

    run_turn(&engine, &turn("webchat", "caviar", channel.clone())).await;

    let sent = channel.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("caviar"));
    assert!(sent[0].contains("milk, bread"));
    assert!(hooks.ends.lock().unwrap().is_empty());
    drop(sent);
    assert!(engine.has_session("conv-1").await);
    assert_eq!(engine.active_sessions().await[0].turns, 1);
}

#[tokio::test]
async fn test_cancel_abandons_session() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    engine
        .start_session(&turn("webchat", "shop", channel.clone()))
        .await
        .unwrap();

    run_turn(&engine, &turn("webchat", "cancel", channel.clone())).await;

    assert_eq!(*channel.sent.lock().unwrap(), vec![CANCELLED_REPLY]);
    let ends = hooks.ends.lock().unwrap();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].end_state, SessionEndState::Abandoned);
    assert_eq!(ends[0].payload, None);
}

#[tokio::test]
async fn test_closed_store_abandons_session() {
    let hooks = Arc::new(RecordingHooks::new(false));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    engine
        .start_session(&turn("webchat", "shop", channel.clone()))
        .await
        .unwrap();

    run_turn(&engine, &turn("webchat", "milk", channel.clone())).await;

    assert_eq!(*channel.sent.lock().unwrap(), vec![STORE_CLOSED_REPLY]);
    assert_eq!(hooks.ends.lock().unwrap()[0].end_state, SessionEndState::Abandoned);
}

#[tokio::test]
async fn test_recognize_without_session_starts_one() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());

    run_turn(&engine, &turn("training", "bread", channel.clone())).await;

    assert_eq!(*hooks.starts.lock().unwrap(), 1);
    assert_eq!(*channel.sent.lock().unwrap(), vec!["You bought bread."]);
}

#[tokio::test]
async fn test_recognize_ignores_non_message_activity() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = engine(hooks.clone());
    let mut activity = Activity::message("webchat", "conv-1", "milk");
    activity.activity_type = storebot_core::ActivityType::ConversationUpdate;
    let t = TurnContext::new(activity, Arc::new(RecordingChannel::default()));

    assert!(engine.recognize(&t).await.unwrap().is_none());
    assert_eq!(*hooks.starts.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_end_hook_failure_is_contained() {
    let mut hooks = RecordingHooks::new(true);
    hooks.fail_end = true;
    let hooks = Arc::new(hooks);
    let engine = engine(hooks.clone());
    let channel = Arc::new(RecordingChannel::default());
    let t = turn("webchat", "shop", channel.clone());
    engine.start_session(&t).await.unwrap();

    assert!(engine.end_session(&t, SessionEndState::Abandoned, None).await);
    assert!(!engine.end_session(&t, SessionEndState::Abandoned, None).await);

    assert_eq!(hooks.ends.lock().unwrap().len(), 1);
    assert!(!engine.has_session("conv-1").await);
}

#[tokio::test]
async fn test_missing_inventory_callback_is_engine_error() {
    let hooks = Arc::new(RecordingHooks::new(true));
    let engine = ScriptedEngine::new(hooks, "training");
    let channel = Arc::new(RecordingChannel::default());
    engine
        .start_session(&turn("webchat", "shop", channel.clone()))
        .await
        .unwrap();

    let err = engine
        .recognize(&turn("webchat", "milk", channel))
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Engine(_)));
}
