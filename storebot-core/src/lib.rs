//! # storebot-core
//!
//! Core types and traits for storebot: [`Activity`], [`TurnContext`], [`ConversationState`],
//! [`Handler`], [`Middleware`], [`ChannelAdapter`], the error taxonomy and tracing initialization.
//! Transport-agnostic; used by every other crate in the workspace.

pub mod channel;
pub mod error;
pub mod logger;
pub mod turn;
pub mod types;

pub use channel::ChannelAdapter;
pub use error::{BotError, HandlerError, Result, SessionError};
pub use logger::init_tracing;
pub use turn::TurnContext;
pub use types::{
    Activity, ActivityType, ChannelAccount, ConversationAccount, ConversationState, Handler,
    HandlerResponse, Middleware,
};
