//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use dbot_core::{ToCoreMessage, ToCoreUser, User};
use handler_chain::HandlerChain;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use super::adapters::{TelegramMessageWrapper, TelegramUserWrapper};

/// Starts the long-polling REPL.
///
/// Calls get_me() first and stores the bot's own identity in `bot_user` (handlers use it as the
/// responder of forward envelopes and to strip `@botname` from commands). Each text message is
/// converted to core::Message and run through the chain in its own task; chain errors are logged.
#[instrument(skip(bot, handler_chain, bot_user))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_user: Arc<RwLock<Option<User>>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            let user = TelegramUserWrapper(&me.user).to_core();
            info!(bot_id = user.id, username = ?user.username, "Bot identity set before repl");
            *bot_user.write().await = Some(user);
        }
        Err(e) => warn!(error = %e, "get_me failed; bot identity unknown"),
    }

    let chain = handler_chain;
    teloxide::repl(
        bot,
        move |_bot: Bot, msg: teloxide::types::Message| {
            let chain = chain.clone();

            async move {
                if msg.text().is_none() {
                    return respond(());
                }
                let core_msg = TelegramMessageWrapper(&msg).to_core();

                tokio::spawn(async move {
                    if let Err(e) = chain.handle(&core_msg).await {
                        error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                    }
                });

                respond(())
            }
        },
    )
    .await;

    Ok(())
}
