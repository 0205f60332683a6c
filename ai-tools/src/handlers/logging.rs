use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

/// Logs each message in before() and the final response in after(); never stops the chain.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            content_len = message.content.chars().count(),
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let (response_type, reply_len) = match response {
            HandlerResponse::Continue => ("Continue", None),
            HandlerResponse::Stop => ("Stop", None),
            HandlerResponse::Ignore => ("Ignore", None),
            HandlerResponse::Reply(text) => ("Reply", Some(text.chars().count())),
        };
        debug!(
            message_id = %message.id,
            response_type = %response_type,
            reply_len = ?reply_len,
            "Processed message"
        );
        Ok(())
    }
}
