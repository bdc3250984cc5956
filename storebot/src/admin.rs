//! Engine management API, mounted under `/sdk` in development wiring.
//!
//! `DELETE /sessions/{conversation_id}` tears a session down from outside any user turn: it takes
//! the conversation's turn lock, loads the state record into a detached turn, runs the end hook
//! with `Abandoned`, and saves the record back.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use dialogue_engine::{ScriptedEngine, SessionEndState, SessionInfo};
use serde_json::{json, Value};
use state_store::ConversationStateStore;
use storebot_channel::{ApiError, BufferedChannelAdapter, ConversationLocks};
use storebot_core::{Activity, ActivityType, BotError, TurnContext};
use tracing::{info, instrument, warn};

/// Channel id stamped on detached turns created by the management API.
pub const ADMIN_CHANNEL_ID: &str = "sdk";

#[derive(Clone)]
struct AdminState {
    engine: Arc<ScriptedEngine>,
    store: Arc<dyn ConversationStateStore>,
    locks: ConversationLocks,
}

pub fn admin_router(
    engine: Arc<ScriptedEngine>,
    store: Arc<dyn ConversationStateStore>,
    locks: ConversationLocks,
) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{conversation_id}", delete(abandon_session))
        .route("/callbacks", get(list_callbacks))
        .with_state(AdminState {
            engine,
            store,
            locks,
        })
}

async fn status(State(state): State<AdminState>) -> Json<Value> {
    Json(json!({
        "engine": "scripted",
        "activeSessions": state.engine.active_sessions().await.len(),
        "callbacks": state.engine.callback_names(),
    }))
}

async fn list_sessions(State(state): State<AdminState>) -> Json<Vec<SessionInfo>> {
    Json(state.engine.active_sessions().await)
}

async fn list_callbacks(State(state): State<AdminState>) -> Json<Vec<String>> {
    Json(state.engine.callback_names())
}

#[instrument(skip(state))]
async fn abandon_session(
    State(state): State<AdminState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let _turn_guard = state.locks.acquire(&conversation_id).await;

    if !state.engine.has_session(&conversation_id).await {
        return Err(ApiError::NotFound(format!(
            "no active session for conversation {}",
            conversation_id
        )));
    }

    let mut activity = Activity::message(ADMIN_CHANNEL_ID, &conversation_id, "");
    activity.activity_type = ActivityType::Event;
    activity.text = None;
    let turn = TurnContext::new(activity, Arc::new(BufferedChannelAdapter::new()));

    match state
        .store
        .load(&conversation_id)
        .await
        .map_err(BotError::from)?
    {
        Some(record) => turn.attach_state(record),
        None => warn!("No state record for session being abandoned"),
    }

    state
        .engine
        .end_session(&turn, SessionEndState::Abandoned, None)
        .await;

    if let Some(record) = turn.state_snapshot() {
        state
            .store
            .save(&conversation_id, &record)
            .await
            .map_err(BotError::from)?;
    }

    info!("step: session abandoned via management API");
    Ok(Json(json!({
        "conversationId": conversation_id,
        "endState": SessionEndState::Abandoned,
    })))
}
