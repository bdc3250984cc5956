//! State store crate: per-conversation [`storebot_core::ConversationState`] persistence.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`store`] – ConversationStateStore trait (lazy creation via `load_or_create`)
//! - [`memory_store`] – InMemoryStateStore
//! - [`sqlite_store`] – SqliteStateStore
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod memory_store;
mod sqlite_pool;
mod sqlite_store;
mod store;

pub use error::StorageError;
pub use memory_store::InMemoryStateStore;
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteStateStore;
pub use store::ConversationStateStore;
