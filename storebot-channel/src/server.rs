//! HTTP server: turns each POSTed activity into a [`TurnContext`] and runs it through the
//! [`HandlerChain`], one turn at a time per conversation.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use handler_chain::HandlerChain;
use serde_json::json;
use storebot_core::TurnContext;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::config::ChannelConfig;
use crate::emulator::BufferedChannelAdapter;
use crate::error::ApiError;
use crate::http_adapter::HttpChannelAdapter;
use crate::locks::ConversationLocks;
use crate::payload::parse_activity;

/// How replies leave the bot.
#[derive(Clone)]
pub enum Transport {
    /// Production: replies are posted to the activity's serviceUrl; the response body is empty.
    Http(Arc<HttpChannelAdapter>),
    /// Development: replies are buffered and returned as `{"activities": [...]}`.
    Emulator,
}

impl Transport {
    /// Emulator in dev mode, HTTP otherwise.
    pub fn for_config(config: &ChannelConfig) -> Self {
        if config.dev_mode {
            Transport::Emulator
        } else {
            Transport::Http(Arc::new(HttpChannelAdapter::new()))
        }
    }
}

#[derive(Clone)]
struct ServerState {
    chain: HandlerChain,
    transport: Transport,
    locks: ConversationLocks,
}

/// Builds the router: `POST /api/messages`, `GET /health`, and `admin` nested under `/sdk` when
/// given.
pub fn build_router(chain: HandlerChain, transport: Transport, admin: Option<Router>) -> Router {
    build_router_with_locks(chain, transport, ConversationLocks::new(), admin)
}

/// Same as [`build_router`], sharing `locks` with code outside the router (the management API
/// takes the same per-conversation lock before touching a session).
pub fn build_router_with_locks(
    chain: HandlerChain,
    transport: Transport,
    locks: ConversationLocks,
    admin: Option<Router>,
) -> Router {
    let state = ServerState {
        chain,
        transport,
        locks,
    };

    let mut router = Router::new()
        .route("/api/messages", post(receive_activity))
        .route("/health", get(health))
        .with_state(state);

    if let Some(admin) = admin {
        router = router.nest("/sdk", admin);
    }

    router.layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip(state, body))]
async fn receive_activity(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let activity = parse_activity(&body).map_err(|e| {
        warn!(error = %e, "Rejected inbound payload");
        e
    })?;
    let conversation_id = activity.conversation_id().to_string();

    let _turn_guard = state.locks.acquire(&conversation_id).await;
    info!(conversation_id = %conversation_id, "step: processing activity (handler chain started)");

    match &state.transport {
        Transport::Http(adapter) => {
            let turn = TurnContext::new(activity, adapter.clone());
            run_turn(&state.chain, &turn).await?;
            Ok(StatusCode::OK.into_response())
        }
        Transport::Emulator => {
            let buffer = Arc::new(BufferedChannelAdapter::new());
            let turn = TurnContext::new(activity, buffer.clone());
            run_turn(&state.chain, &turn).await?;
            Ok(Json(json!({ "activities": buffer.drain() })).into_response())
        }
    }
}

async fn run_turn(chain: &HandlerChain, turn: &TurnContext) -> Result<(), ApiError> {
    chain.handle(turn).await.map_err(|e| {
        error!(error = %e, conversation_id = %turn.conversation_id(), "Handler chain failed");
        ApiError::from(e)
    })?;
    Ok(())
}

/// Binds the configured address and serves until Ctrl-C / SIGTERM.
pub async fn serve(config: &ChannelConfig, router: Router) -> anyhow::Result<()> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, dev_mode = config.dev_mode, "Listening for activities");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
