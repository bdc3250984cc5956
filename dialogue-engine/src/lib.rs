//! # dialogue-engine
//!
//! The dialogue engine contract the turn router delegates to ([`DialogueEngine`]), the lifecycle
//! hooks it calls at session boundaries ([`SessionHooks`]), named mid-session callbacks
//! ([`ApiCallback`]) and [`ScriptedEngine`], the in-process engine the bot ships with.

mod callback;
mod engine;
mod hooks;
mod memory;
mod scripted;
mod session;

pub use callback::{ApiCallback, CallbackRegistry};
pub use engine::{DialogueEngine, EngineAction, EngineResult};
pub use hooks::SessionHooks;
pub use memory::{EngineMemory, MemoryValue};
pub use scripted::{
    ScriptedEngine, CANCELLED_REPLY, CANCEL_TEXT, INVENTORY_CALLBACK, PURCHASED_ITEM_SLOT,
    STORE_CLOSED_REPLY, STORE_OPEN_SLOT, TRAINING_SURFACE_FLAG,
};
pub use session::{SessionEndState, SessionInfo};
