//! Bot abstraction for sending replies.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it via teloxide.

use crate::error::Result;
use crate::types::{Chat, ForwardNode, Message};
use async_trait::async_trait;

/// Abstraction for sending messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends a forwarded-message envelope: each node is shown attributed to its author.
    async fn send_forward(&self, chat: &Chat, nodes: &[ForwardNode]) -> Result<()>;
}
