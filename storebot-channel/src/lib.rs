//! # storebot-channel
//!
//! HTTP activity channel: payload parsing, [`storebot_core::ChannelAdapter`] implementations
//! (reqwest reply poster and the buffering emulator), minimal config, and the axum server that
//! runs the handler chain once per inbound activity.
//! Handles only channel connectivity and turn execution; no state, engine or command logic.

mod config;
mod emulator;
mod error;
mod http_adapter;
mod locks;
mod payload;
mod server;

pub use config::{ChannelConfig, DEFAULT_PORT};
pub use emulator::BufferedChannelAdapter;
pub use error::ApiError;
pub use http_adapter::{reply_url, HttpChannelAdapter};
pub use locks::ConversationLocks;
pub use payload::parse_activity;
pub use server::{build_router, build_router_with_locks, serve, Transport};
