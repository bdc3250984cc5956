use anyhow::Result;
use storebot_channel::{build_router_with_locks, serve, Transport};
use storebot_core::init_tracing;
use tracing::{info, instrument};

use crate::admin::admin_router;
use crate::components::{build_bot_components, BotComponents};
use crate::config::BotConfig;

/// Builds the full HTTP app for `config`: activity endpoint, health, and the management API in
/// dev mode. Used by [`run_bot`] and by tests that drive the router in-process.
pub fn build_app(config: &BotConfig, components: &BotComponents) -> axum::Router {
    let admin = config.channel.dev_mode.then(|| {
        admin_router(
            components.engine.clone(),
            components.store.clone(),
            components.locks.clone(),
        )
    });

    build_router_with_locks(
        components.handler_chain.clone(),
        Transport::for_config(&config.channel),
        components.locks.clone(),
        admin,
    )
}

/// Main entry: validate config, init logging, build components, then serve until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file.as_deref())?;

    info!(
        addr = %config.channel.addr(),
        dev_mode = config.channel.dev_mode,
        state_store_type = config.store_type().as_str(),
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let app = build_app(&config, &components);

    info!("Bot started successfully");
    serve(&config.channel, app).await
}
