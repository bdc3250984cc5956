//! # Handler chain
//!
//! Runs a sequence of middleware (before/after) and handlers for each turn. Middleware can stop
//! the chain; the first handler that returns Stop ends handler execution; middleware after runs in
//! reverse order. A failing before or handle returns the error immediately and skips every after,
//! so nothing a failed turn touched gets persisted.

use std::sync::Arc;
use storebot_core::{Handler, HandlerResponse, Middleware, Result, TurnContext};
use tracing::{debug, info, instrument};

/// Chain of middleware and handlers for one turn.
#[derive(Clone, Default)]
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware (before in order, after in reverse).
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler (runs in order; first Stop ends the handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs middleware before, handler before/handle/after, then middleware after in reverse.
    /// Returns Stop if any before declined or a handler stopped, otherwise Continue.
    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id()))]
    pub async fn handle(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        let activity_id = turn.activity().id.as_deref().unwrap_or("-");
        info!(activity_id = %activity_id, "step: handler_chain started");

        for mw in &self.middleware {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            if !mw.before(turn).await? {
                info!(middleware = %mw_name, "step: middleware before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
            debug!(middleware = %mw_name, "step: middleware before done");
        }

        let mut final_response = HandlerResponse::Continue;

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(turn).await? {
                info!(handler = %handler_name, "step: handler before returned false, chain stopped");
                final_response = HandlerResponse::Stop;
                break;
            }
        }

        if final_response == HandlerResponse::Continue {
            for handler in &self.handlers {
                let handler_name = std::any::type_name_of_val(handler.as_ref());
                let response = handler.handle(turn).await?;
                info!(handler = %handler_name, response = ?response, "step: handler done");
                if response == HandlerResponse::Stop {
                    final_response = response;
                    break;
                }
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(turn, &final_response).await?;
        }

        for mw in self.middleware.iter().rev() {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            mw.after(turn, &final_response).await?;
            debug!(middleware = %mw_name, "step: middleware after done");
        }

        info!(activity_id = %activity_id, response = ?final_response, "step: handler_chain finished");

        Ok(final_response)
    }
}

// Tests live in tests/handler_chain_test.rs
