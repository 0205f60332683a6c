//! Command handler: parses `/ask`, `/retouch` and the model overrides, checks authority, runs the
//! service and delivers the reply through the [`Bot`].
//!
//! Service errors are not recovered here: the handler logs the cause chain, sends a generic
//! failure message, and returns the error to the chain.

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result, User};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::authority::AuthorityPolicy;
use crate::command::Command;
use crate::format::{format_reply, inline_reply, FormattedReply};
use crate::service::AiTools;

pub const MSG_REQUEST_FAILED: &str =
    "Sorry, something went wrong processing your request. Please try again later.";
pub const MSG_PERMISSION_DENIED: &str = "Permission denied.";

/// Shown as the responder of forward envelopes when the bot's identity is not known yet.
fn fallback_responder() -> User {
    User {
        id: 0,
        username: None,
        first_name: Some("AI".to_string()),
        last_name: None,
    }
}

pub struct AiCommandHandler {
    service: Arc<AiTools>,
    bot: Arc<dyn Bot>,
    policy: AuthorityPolicy,
    /// The bot's own identity, filled by the runner after get_me.
    bot_user: Arc<RwLock<Option<User>>>,
}

impl AiCommandHandler {
    pub fn new(
        service: Arc<AiTools>,
        bot: Arc<dyn Bot>,
        policy: AuthorityPolicy,
        bot_user: Arc<RwLock<Option<User>>>,
    ) -> Self {
        Self {
            service,
            bot,
            policy,
            bot_user,
        }
    }

    /// Runs `command` and sends its reply. Returns the reply body.
    async fn run(&self, message: &Message, command: Command, responder: User) -> Result<String> {
        match command {
            Command::Ask(text) => {
                let reply = self.service.ask(&text).await?;
                match format_reply(message, &reply, self.service.zip(), &responder) {
                    FormattedReply::Inline(inline) => self.bot.reply_to(message, &inline).await?,
                    FormattedReply::Forward(nodes) => {
                        self.bot.send_forward(&message.chat, &nodes).await?
                    }
                }
                Ok(reply)
            }
            Command::Retouch(text) => {
                let reply = self.service.retouch::<&str>(&text, &[]).await?;
                self.bot
                    .reply_to(message, &inline_reply(&message.user, &reply))
                    .await?;
                Ok(reply)
            }
            Command::SetAskModel(model) => {
                let confirmation = self.service.set_ask_model(&model)?;
                self.bot.reply_to(message, &confirmation).await?;
                Ok(confirmation)
            }
            Command::SetRetouchModel(model) => {
                let confirmation = self.service.set_retouch_model(&model)?;
                self.bot.reply_to(message, &confirmation).await?;
                Ok(confirmation)
            }
        }
    }
}

#[async_trait]
impl Handler for AiCommandHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let bot_user = self.bot_user.read().await.clone();
        let bot_username = bot_user.as_ref().and_then(|u| u.username.as_deref());

        let command = match Command::parse(&message.content, bot_username) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(HandlerResponse::Continue),
            Err(e) => {
                info!(error = %e, "malformed command");
                self.bot.reply_to(message, &e.to_string()).await?;
                return Ok(HandlerResponse::Stop);
            }
        };

        let required = command.required_authority();
        if !self.policy.permits(message.user.id, required) {
            warn!(
                command = command.name(),
                required,
                level = self.policy.level_of(message.user.id),
                "insufficient authority"
            );
            self.bot.reply_to(message, MSG_PERMISSION_DENIED).await?;
            return Ok(HandlerResponse::Stop);
        }

        let name = command.name();
        info!(command = name, "step: running command");
        let responder = bot_user.unwrap_or_else(fallback_responder);
        match self.run(message, command, responder).await {
            Ok(reply) => Ok(HandlerResponse::Reply(reply)),
            Err(e) => {
                error!(command = name, error = %e, "command failed");
                // Best effort; the original error is returned either way.
                if let Err(send_err) = self.bot.reply_to(message, MSG_REQUEST_FAILED).await {
                    error!(error = %send_err, "failed to send failure notice");
                }
                Err(e)
            }
        }
    }
}
