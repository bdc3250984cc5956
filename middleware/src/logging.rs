use async_trait::async_trait;
use storebot_core::{HandlerResponse, Middleware, Result, TurnContext};
use tracing::{debug, info, instrument};

/// Logs each inbound activity in before() and the response in after(); always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, turn))]
    async fn before(&self, turn: &TurnContext) -> Result<bool> {
        let activity = turn.activity();
        info!(
            conversation_id = %turn.conversation_id(),
            channel_id = %activity.channel_id,
            from = %activity.from.id,
            activity_type = ?activity.activity_type,
            text = %activity.text.as_deref().unwrap_or(""),
            "Received activity"
        );
        Ok(true)
    }

    #[instrument(skip(self, turn, response))]
    async fn after(&self, turn: &TurnContext, response: &HandlerResponse) -> Result<()> {
        debug!(
            conversation_id = %turn.conversation_id(),
            activity_id = ?turn.activity().id,
            response = ?response,
            "Processed activity"
        );
        Ok(())
    }
}
