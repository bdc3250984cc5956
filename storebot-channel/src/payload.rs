//! Inbound payload parsing: channel JSON → core [`Activity`].

use storebot_core::{Activity, HandlerError};

/// Parses a POSTed activity. Rejects malformed JSON and activities without a conversation id,
/// since the conversation id is the state key.
pub fn parse_activity(body: &[u8]) -> Result<Activity, HandlerError> {
    let activity: Activity = serde_json::from_slice(body)
        .map_err(|e| HandlerError::InvalidActivity(e.to_string()))?;

    if activity.conversation_id().trim().is_empty() {
        return Err(HandlerError::InvalidActivity(
            "missing conversation id".to_string(),
        ));
    }

    Ok(activity)
}
