//! Presentation of an `ask` reply: inline mention or forwarded-message envelope, chosen by length.

use dbot_core::{ForwardNode, Message, User};

/// How a reply is delivered to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedReply {
    /// Plain text, already prefixed with a mention of the requester.
    Inline(String),
    /// Requester's message followed by the reply, each attributed to its author.
    Forward(Vec<ForwardNode>),
}

/// `"{mention} {reply}"`.
pub fn inline_reply(requester: &User, reply: &str) -> String {
    format!("{} {}", requester.mention(), reply)
}

/// Chooses the presentation for `reply`: longer than `zip` characters → forward envelope
/// (requester's message, then the reply from `responder`); otherwise inline.
pub fn format_reply(request: &Message, reply: &str, zip: usize, responder: &User) -> FormattedReply {
    if reply.chars().count() > zip {
        FormattedReply::Forward(vec![
            ForwardNode::new(request.user.clone(), request.content.clone()),
            ForwardNode::new(responder.clone(), reply),
        ])
    } else {
        FormattedReply::Inline(inline_reply(&request.user, reply))
    }
}
