//! # Handler chain
//!
//! Runs every handler against one message in three phases:
//!
//! 1. `before`, in order. The first `false` ends processing with [`HandlerResponse::Stop`].
//! 2. `handle`, in order, until a handler answers Stop or Reply. Continue and Ignore fall through.
//! 3. `after`, in reverse order, each seeing the final response.
//!
//! Errors from any phase are returned immediately; later phases do not run.

use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers sharing one message. Cheap to clone (handlers are `Arc`s).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

fn name_of(handler: &Arc<dyn Handler>) -> &'static str {
    std::any::type_name_of_val(handler.as_ref())
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler; builder style.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the three phases and returns the first Stop or Reply, or Continue.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id, message_id = %message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            if !handler.before(message).await? {
                info!(handler = name_of(handler), "step: before rejected message");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut outcome = HandlerResponse::Continue;
        for handler in &self.handlers {
            let response = handler.handle(message).await?;
            debug!(handler = name_of(handler), response = ?response, "step: handled");
            if matches!(response, HandlerResponse::Stop | HandlerResponse::Reply(_)) {
                outcome = response;
                break;
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(message, &outcome).await?;
        }

        info!(outcome = ?outcome, "step: handler chain finished");
        Ok(outcome)
    }
}
