//! Emulator transport: replies are buffered per request and returned inline in the HTTP
//! response instead of being posted back to a channel service.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use storebot_core::{Activity, ChannelAdapter, Result};

#[derive(Default)]
pub struct BufferedChannelAdapter {
    sent: Mutex<Vec<Activity>>,
}

impl BufferedChannelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every buffered activity, oldest first.
    pub fn drain(&self) -> Vec<Activity> {
        std::mem::take(&mut *self.sent.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChannelAdapter for BufferedChannelAdapter {
    async fn send_activity(&self, activity: &Activity) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(activity.clone());
        Ok(())
    }
}
