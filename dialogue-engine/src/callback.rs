//! Named callbacks the engine invokes mid-session to fetch external data.
//!
//! A callback sees engine memory and its arguments, nothing else. It has no route to the
//! conversation state store, so engine memory and the durable record cannot drift mid-session.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use storebot_core::{BotError, Result};

use crate::memory::EngineMemory;

#[async_trait]
pub trait ApiCallback: Send + Sync {
    /// Returns zero or more values; meaning is defined per callback.
    async fn invoke(&self, memory: &EngineMemory, args: &[&str]) -> Result<Vec<String>>;
}

/// Callbacks by name.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    callbacks: BTreeMap<String, Arc<dyn ApiCallback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, callback: Arc<dyn ApiCallback>) {
        self.callbacks.insert(name.to_string(), callback);
    }

    pub fn names(&self) -> Vec<String> {
        self.callbacks.keys().cloned().collect()
    }

    /// Invokes a registered callback; unknown names are an engine error.
    pub async fn invoke(
        &self,
        name: &str,
        memory: &EngineMemory,
        args: &[&str],
    ) -> Result<Vec<String>> {
        let callback = self
            .callbacks
            .get(name)
            .ok_or_else(|| BotError::Engine(format!("callback not registered: {}", name)))?;
        callback.invoke(memory, args).await
    }
}
