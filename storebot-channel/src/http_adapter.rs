//! Posts reply activities back to the channel service named in the inbound activity.

use async_trait::async_trait;
use reqwest::Url;
use storebot_core::{Activity, BotError, ChannelAdapter, Result};
use tracing::debug;

/// Production [`ChannelAdapter`]: `POST {serviceUrl}/v3/conversations/{id}/activities[/{replyToId}]`.
#[derive(Clone, Default)]
pub struct HttpChannelAdapter {
    client: reqwest::Client,
}

impl HttpChannelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Builds the endpoint an outbound activity is posted to. Path segments are percent-encoded.
pub fn reply_url(activity: &Activity) -> Result<Url> {
    let service_url = activity
        .service_url
        .as_deref()
        .ok_or_else(|| BotError::Channel("activity has no serviceUrl".to_string()))?;

    let mut url = Url::parse(service_url)
        .map_err(|e| BotError::Channel(format!("invalid serviceUrl {}: {}", service_url, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| BotError::Channel(format!("serviceUrl cannot be a base: {}", service_url)))?;
        segments
            .pop_if_empty()
            .extend(["v3", "conversations", activity.conversation_id(), "activities"]);
        if let Some(reply_to_id) = &activity.reply_to_id {
            segments.push(reply_to_id);
        }
    }
    Ok(url)
}

#[async_trait]
impl ChannelAdapter for HttpChannelAdapter {
    async fn send_activity(&self, activity: &Activity) -> Result<()> {
        let url = reply_url(activity)?;
        debug!(url = %url, "Posting activity to channel");

        self.client
            .post(url)
            .json(activity)
            .send()
            .await
            .map_err(|e| BotError::Channel(e.to_string()))?
            .error_for_status()
            .map_err(|e| BotError::Channel(e.to_string()))?;
        Ok(())
    }
}
