//! # dbot-telegram
//!
//! Telegram transport layer: adapters, [`dbot_core::Bot`] implementation, minimal config, REPL runner.
//! Handles only Telegram connectivity and handler-chain execution; no LLM logic.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{render_forward, split_text, TelegramBotAdapter, MESSAGE_LIMIT};
pub use config::TelegramConfig;
pub use runner::run_repl;
