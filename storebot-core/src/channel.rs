//! Channel abstraction for delivering outbound activities.
//!
//! [`ChannelAdapter`] is transport-agnostic; storebot-channel implements it over HTTP and for the
//! local emulator, tests substitute a recording implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Activity;

/// Delivers outbound activities to the channel a turn arrived on.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Sends one activity (usually a reply built with [`Activity::reply_text`]).
    async fn send_activity(&self, activity: &Activity) -> Result<()>;
}
