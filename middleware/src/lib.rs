//! # middleware
//!
//! Framework-level middleware for the handler chain:
//!
//! - [`ConversationStateMiddleware`] – loads (or lazily creates) the conversation state before the
//!   handlers run and persists it after they finish.
//! - [`LoggingMiddleware`] – logs each inbound activity and the chain's response.

mod logging;
mod state_middleware;

#[cfg(test)]
mod test;

pub use logging::LoggingMiddleware;
pub use state_middleware::ConversationStateMiddleware;
