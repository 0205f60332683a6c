//! Wraps teloxide::Bot and implements [`dbot_core::Bot`].
//!
//! Telegram cannot fabricate forwards from arbitrary authors, so a forward envelope is rendered as
//! HTML: each node is the author's name in bold followed by its content in an expandable
//! blockquote. Telegram rejects messages longer than [`MESSAGE_LIMIT`] UTF-16 units, so envelopes
//! and plain texts are split into several messages when needed.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, DbotError, ForwardNode, Message, Result};
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId, ParseMode, ReplyParameters},
    utils::html,
};

/// Maximum length of one Telegram message, in UTF-16 code units.
pub const MESSAGE_LIMIT: usize = 4096;

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Splits `text` into pieces of at most `limit` UTF-16 units without breaking characters.
/// `escape` maps each character to its output form before measuring.
fn split_escaped(text: &str, limit: usize, escape: impl Fn(&str) -> String) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_len = 0;
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let out = escape(&*ch.encode_utf8(&mut buf));
        let out_len = utf16_len(&out);
        if piece_len + out_len > limit && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_len = 0;
        }
        piece.push_str(&out);
        piece_len += out_len;
    }
    if !piece.is_empty() || pieces.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Splits plain text into messages of at most `limit` UTF-16 units.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    split_escaped(text, limit, str::to_string)
}

/// Renders forward nodes as Telegram HTML messages, each at most `limit` UTF-16 units.
///
/// Nodes are joined with a newline while they fit; a node too long for one message is continued
/// in further blockquotes under the same author. Author names and contents are escaped.
pub fn render_forward(nodes: &[ForwardNode], limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();
    for node in nodes {
        let open = format!(
            "<b>{}</b>\n<blockquote expandable>",
            html::escape(&node.author.display_name())
        );
        let close = "</blockquote>";
        let budget = limit.saturating_sub(utf16_len(&open) + utf16_len(close)).max(1);
        for piece in split_escaped(&node.content, budget, html::escape) {
            let block = format!("{}{}{}", open, piece, close);
            if current.is_empty() {
                current = block;
            } else if utf16_len(&current) + 1 + utf16_len(&block) <= limit {
                current.push('\n');
                current.push_str(&block);
            } else {
                messages.push(std::mem::replace(&mut current, block));
            }
        }
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        for chunk in split_text(text, MESSAGE_LIMIT) {
            self.bot
                .send_message(ChatId(chat.id), chunk)
                .await
                .map_err(|e| DbotError::Bot(e.to_string()))?;
        }
        Ok(())
    }

    /// Quotes the original message with the first chunk when its id is numeric; the rest go to
    /// the same chat.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let Ok(id) = message.id.parse::<i32>() else {
            return self.send_message(&message.chat, text).await;
        };
        let mut chunks = split_text(text, MESSAGE_LIMIT).into_iter();
        if let Some(first) = chunks.next() {
            self.bot
                .send_message(ChatId(message.chat.id), first)
                .reply_parameters(ReplyParameters::new(MessageId(id)))
                .await
                .map_err(|e| DbotError::Bot(e.to_string()))?;
        }
        for chunk in chunks {
            self.bot
                .send_message(ChatId(message.chat.id), chunk)
                .await
                .map_err(|e| DbotError::Bot(e.to_string()))?;
        }
        Ok(())
    }

    async fn send_forward(&self, chat: &Chat, nodes: &[ForwardNode]) -> Result<()> {
        for rendered in render_forward(nodes, MESSAGE_LIMIT) {
            self.bot
                .send_message(ChatId(chat.id), rendered)
                .parse_mode(ParseMode::Html)
                .await
                .map_err(|e| DbotError::Bot(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbot_core::User;

    fn user(id: i64, first_name: &str) -> User {
        User {
            id,
            username: None,
            first_name: Some(first_name.to_string()),
            last_name: None,
        }
    }

    #[test]
    fn test_render_forward_attributes_each_node() {
        let nodes = vec![
            ForwardNode::new(user(1, "Alice"), "/ask tell me a story"),
            ForwardNode::new(user(2, "Relay"), "Once upon a time"),
        ];

        let rendered = render_forward(&nodes, MESSAGE_LIMIT);

        assert_eq!(
            rendered,
            vec!["<b>Alice</b>\n<blockquote expandable>/ask tell me a story</blockquote>\n\
                  <b>Relay</b>\n<blockquote expandable>Once upon a time</blockquote>"
                .to_string()]
        );
    }

    #[test]
    fn test_render_forward_escapes_html() {
        let nodes = vec![ForwardNode::new(user(1, "<Eve>"), "a < b && c > d")];

        let rendered = render_forward(&nodes, MESSAGE_LIMIT);

        assert!(rendered[0].contains("&lt;Eve&gt;"));
        assert!(rendered[0].contains("a &lt; b &amp;&amp; c &gt; d"));
    }

    #[test]
    fn test_render_forward_empty() {
        assert!(render_forward(&[], MESSAGE_LIMIT).is_empty());
    }

    #[test]
    fn test_render_forward_splits_long_reply_under_limit() {
        let reply = "&".repeat(5000);
        let nodes = vec![
            ForwardNode::new(user(1, "Alice"), "/ask long please"),
            ForwardNode::new(user(2, "Relay"), reply.as_str()),
        ];

        let rendered = render_forward(&nodes, MESSAGE_LIMIT);

        assert!(rendered.len() >= 2);
        assert!(rendered.iter().all(|m| utf16_len(m) <= MESSAGE_LIMIT));
        let escaped_total: usize = rendered.iter().map(|m| m.matches("&amp;").count()).sum();
        assert_eq!(escaped_total, 5000);
        assert!(rendered[0].starts_with("<b>Alice</b>"));
        assert!(rendered.iter().skip(1).all(|m| m.starts_with("<b>Relay</b>")));
    }

    #[test]
    fn test_render_forward_never_splits_an_escape_sequence() {
        let nodes = vec![ForwardNode::new(user(1, "A"), "<".repeat(100))];

        let rendered = render_forward(&nodes, 120);

        assert!(rendered.len() > 1);
        for message in &rendered {
            assert!(utf16_len(message) <= 120);
            let inner = message
                .trim_start_matches("<b>A</b>\n<blockquote expandable>")
                .trim_end_matches("</blockquote>");
            assert_eq!(inner.replace("&lt;", ""), "");
        }
    }

    #[test]
    fn test_split_text_respects_limit_and_characters() {
        let text = "喵".repeat(10);

        let chunks = split_text(&text, 4);

        assert_eq!(chunks, vec!["喵喵喵喵", "喵喵喵喵", "喵喵"]);
        assert_eq!(split_text("", 4), vec![String::new()]);
    }
}
