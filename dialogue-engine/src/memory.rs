//! Engine working memory: named slots the engine reads while a session runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value held in a memory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryValue {
    Bool(bool),
    Text(String),
}

/// Per-session slot map. Owned by the engine; hooks copy values in at session start and out at
/// session end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineMemory {
    slots: BTreeMap<String, MemoryValue>,
}

impl EngineMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: &str, value: MemoryValue) {
        self.slots.insert(slot.to_string(), value);
    }

    pub fn set_bool(&mut self, slot: &str, value: bool) {
        self.set(slot, MemoryValue::Bool(value));
    }

    pub fn set_text(&mut self, slot: &str, value: impl Into<String>) {
        self.set(slot, MemoryValue::Text(value.into()));
    }

    pub fn get(&self, slot: &str) -> Option<&MemoryValue> {
        self.slots.get(slot)
    }

    /// `None` when the slot is missing or holds text.
    pub fn get_bool(&self, slot: &str) -> Option<bool> {
        match self.slots.get(slot) {
            Some(MemoryValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// `None` when the slot is missing or holds a bool.
    pub fn get_text(&self, slot: &str) -> Option<&str> {
        match self.slots.get(slot) {
            Some(MemoryValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}
