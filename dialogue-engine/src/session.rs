//! Session lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::EngineMemory;

/// Terminal classification of a delegated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndState {
    Completed,
    /// Cancelled, refused, or torn down from outside (e.g. the management API).
    Abandoned,
}

/// Live session held by the engine for one conversation.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub memory: EngineMemory,
    pub started_at: DateTime<Utc>,
    pub turns: u32,
}

impl Session {
    pub fn new(memory: EngineMemory) -> Self {
        Self {
            memory,
            started_at: Utc::now(),
            turns: 0,
        }
    }
}

/// Read-only view of an active session, for the management API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub conversation_id: String,
    pub started_at: DateTime<Utc>,
    pub turns: u32,
    pub memory: EngineMemory,
}
