//! Component factory: builds the store, engine and handler chain from config. Keeps assembly out
//! of the runner.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use dialogue_engine::{DialogueEngine, ScriptedEngine, INVENTORY_CALLBACK};
use handler_chain::HandlerChain;
use middleware::{ConversationStateMiddleware, LoggingMiddleware};
use state_store::{ConversationStateStore, InMemoryStateStore, SqliteStateStore};
use storebot_channel::ConversationLocks;
use tracing::{error, info, instrument};

use crate::config::{BotConfig, StateStoreType};
use crate::hooks::StoreSessionHooks;
use crate::inventory::InventoryCallback;
use crate::router::TurnRouter;

/// Everything the server and the management API share.
#[derive(Clone)]
pub struct BotComponents {
    pub store: Arc<dyn ConversationStateStore>,
    pub engine: Arc<ScriptedEngine>,
    pub handler_chain: HandlerChain,
    pub locks: ConversationLocks,
}

/// Creates the conversation state store selected by STATE_STORE_TYPE.
#[instrument(skip(config))]
pub async fn build_state_store(config: &BotConfig) -> Result<Arc<dyn ConversationStateStore>> {
    match config.store_type() {
        StateStoreType::Sqlite => {
            ensure_parent_dir(&config.database_url)?;
            info!(database_url = %config.database_url, "Using SQLite state store");
            let store = SqliteStateStore::new(&config.database_url)
                .await
                .map_err(|e| {
                    error!(
                        error = %e,
                        database_url = %config.database_url,
                        "Failed to initialize state store"
                    );
                    anyhow::anyhow!("Failed to initialize state store: {}", e)
                })?;
            Ok(Arc::new(store))
        }
        StateStoreType::Memory => {
            info!("Using in-memory state store");
            Ok(Arc::new(InMemoryStateStore::new()))
        }
    }
}

/// Creates the scripted engine with the store's session hooks and the `inventory` callback.
pub fn build_engine(config: &BotConfig) -> Arc<ScriptedEngine> {
    info!(
        training_channel_id = %config.training_channel_id,
        inventory = ?config.inventory,
        "Building dialogue engine"
    );
    Arc::new(
        ScriptedEngine::new(
            Arc::new(StoreSessionHooks::new()),
            config.training_channel_id.clone(),
        )
        .with_callback(
            INVENTORY_CALLBACK,
            Arc::new(InventoryCallback::new(config.inventory.clone())),
        ),
    )
}

/// Logging, then state load/persist, around the turn router.
pub fn build_handler_chain(
    store: Arc<dyn ConversationStateStore>,
    engine: Arc<dyn DialogueEngine>,
) -> HandlerChain {
    HandlerChain::new()
        .add_middleware(Arc::new(LoggingMiddleware))
        .add_middleware(Arc::new(ConversationStateMiddleware::new(store)))
        .add_handler(Arc::new(TurnRouter::new(engine)))
}

#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let store = build_state_store(config).await?;
    let engine = build_engine(config);
    let handler_chain = build_handler_chain(store.clone(), engine.clone());
    Ok(BotComponents {
        store,
        engine,
        handler_chain,
        locks: ConversationLocks::new(),
    })
}

/// Creates the directory holding a file database; URLs and in-memory databases are left alone.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    if database_url.starts_with("sqlite:") || database_url.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
