use async_trait::async_trait;
use dialogue_engine::{ApiCallback, EngineMemory};
use storebot_core::Result;

/// The `inventory` callback: items matching the first argument (case-insensitive), or every
/// item when called without one. Reads nothing but its own list.
#[derive(Debug, Clone)]
pub struct InventoryCallback {
    items: Vec<String>,
}

impl InventoryCallback {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ApiCallback for InventoryCallback {
    async fn invoke(&self, _memory: &EngineMemory, args: &[&str]) -> Result<Vec<String>> {
        let wanted = args.first().map(|s| s.trim());
        Ok(self
            .items
            .iter()
            .filter(|item| wanted.map_or(true, |w| item.eq_ignore_ascii_case(w)))
            .cloned()
            .collect())
    }
}
