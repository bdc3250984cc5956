//! Core types: channel accounts, activities, per-conversation state, and the Handler / Middleware traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::turn::TurnContext;

/// Account on a channel (user or bot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Conversation an activity belongs to. `id` is the state store key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

/// Activity kind. Anything the bot does not know about deserializes to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Message,
    ConversationUpdate,
    Event,
    Typing,
    #[serde(other)]
    Other,
}

/// One inbound or outbound channel activity (camelCase JSON on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub recipient: ChannelAccount,
    pub conversation: ConversationAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<serde_json::Value>,
}

impl Activity {
    /// Builds an inbound text message for the given channel and conversation.
    pub fn message(channel_id: &str, conversation_id: &str, text: &str) -> Self {
        Self {
            activity_type: ActivityType::Message,
            id: None,
            timestamp: Some(Utc::now()),
            channel_id: channel_id.to_string(),
            service_url: None,
            from: ChannelAccount {
                id: "user".to_string(),
                name: None,
                role: Some("user".to_string()),
            },
            recipient: ChannelAccount {
                id: "bot".to_string(),
                name: None,
                role: Some("bot".to_string()),
            },
            conversation: ConversationAccount {
                id: conversation_id.to_string(),
                name: None,
                is_group: None,
            },
            text: Some(text.to_string()),
            reply_to_id: None,
            channel_data: None,
        }
    }

    /// Conversation id; the key for per-conversation state.
    pub fn conversation_id(&self) -> &str {
        &self.conversation.id
    }

    /// Text of a message activity; `None` for every other activity type.
    pub fn message_text(&self) -> Option<&str> {
        match self.activity_type {
            ActivityType::Message => self.text.as_deref(),
            _ => None,
        }
    }

    /// Builds a text reply addressed back to the sender of this activity.
    pub fn reply_text(&self, text: &str) -> Activity {
        Activity {
            activity_type: ActivityType::Message,
            id: None,
            timestamp: Some(Utc::now()),
            channel_id: self.channel_id.clone(),
            service_url: self.service_url.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: self.conversation.clone(),
            text: Some(text.to_string()),
            reply_to_id: self.id.clone(),
            channel_data: None,
        }
    }
}

/// Durable per-conversation record. Created lazily by the state store on first access.
///
/// `using_delegate` is true only between a successful session start and the session-end
/// notification; while it is set the dialogue engine owns every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    #[serde(default)]
    pub using_delegate: bool,
    #[serde(default)]
    pub store_open: bool,
    #[serde(default)]
    pub purchased_item: Option<String>,
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Turn handled; stop the handler phase.
    Stop,
    /// Not for this handler, try next.
    Ignore,
}

/// Single handler concept: optional before / handle / after around one turn.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _turn: &TurnContext) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the turn. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _turn: &TurnContext) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase with the final response.
    async fn after(
        &self,
        _turn: &TurnContext,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Framework-level hook around the whole handler phase (state load/persist, logging).
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Runs before any handler. Return false to stop the chain.
    async fn before(&self, turn: &TurnContext) -> crate::error::Result<bool>;
    /// Runs after the handler phase, in reverse registration order.
    async fn after(
        &self,
        turn: &TurnContext,
        response: &HandlerResponse,
    ) -> crate::error::Result<()>;
}
