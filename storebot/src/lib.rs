//! # storebot
//!
//! The store demo bot: the turn router deciding between local commands and the dialogue engine,
//! the session hooks moving state across session boundaries, the `inventory` callback, and the
//! wiring that puts them behind the HTTP activity endpoint.

pub mod admin;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod hooks;
pub mod inventory;
pub mod router;
pub mod runner;

pub use admin::admin_router;
pub use cli::{load_config, Cli, Commands};
pub use commands::LocalCommand;
pub use components::{
    build_bot_components, build_engine, build_handler_chain, build_state_store, BotComponents,
};
pub use config::{BotConfig, StateStoreType};
pub use hooks::StoreSessionHooks;
pub use inventory::InventoryCallback;
pub use router::TurnRouter;
pub use runner::{build_app, run_bot};
