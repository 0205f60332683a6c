//! Wires the service, handlers and Telegram transport together and runs the REPL.

use anyhow::Result;
use dbot_core::{init_tracing, Bot, User};
use dbot_telegram::{run_repl, TelegramBotAdapter, TelegramConfig};
use handler_chain::HandlerChain;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::authority::AuthorityPolicy;
use crate::config::AiToolsConfig;
use crate::handlers::{AiCommandHandler, LoggingHandler};
use crate::service::AiTools;

/// Logging first, then the command handler.
pub fn build_handler_chain(
    service: Arc<AiTools>,
    bot: Arc<dyn Bot>,
    policy: AuthorityPolicy,
    bot_user: Arc<RwLock<Option<User>>>,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AiCommandHandler::new(service, bot, policy, bot_user)))
}

/// Validates config, initializes tracing, opens the service, runs the REPL until shutdown, then
/// closes the service.
#[instrument(skip(telegram, config))]
pub async fn run_bot(telegram: TelegramConfig, config: AiToolsConfig) -> Result<()> {
    telegram.validate()?;
    config.validate()?;
    init_tracing(&telegram.log_file)?;

    let service = Arc::new(AiTools::new(&config));
    service.open();

    let teloxide_bot = telegram.build_bot()?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let bot_user = Arc::new(RwLock::new(None));
    let chain = build_handler_chain(
        service.clone(),
        bot,
        AuthorityPolicy::from_config(&config),
        bot_user.clone(),
    );

    info!(handlers = chain.len(), "Bot started successfully");
    let result = run_repl(teloxide_bot, chain, bot_user).await;

    service.close();
    result
}
