//! # dbot-core
//!
//! Core types and traits for the bot: [`Bot`], [`Handler`], message, user and forward-envelope types,
//! and tracing initialization. Transport-agnostic; used by dbot-telegram, handler-chain and ai-tools.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{Chat, ForwardNode, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
