//! Conversions from teloxide types to dbot_core types.

use dbot_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        let user = self.0;
        User {
            id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        }
    }
}

/// Identity for messages sent on behalf of a chat (anonymous group admins, channel posts).
fn chat_as_user(chat: &teloxide::types::Chat) -> User {
    User {
        id: chat.id.0,
        username: chat.username().map(String::from),
        first_name: chat.title().map(String::from),
        last_name: None,
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_group() {
        "group"
    } else if chat.is_supergroup() {
        "supergroup"
    } else {
        "channel"
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
///
/// The author is the sending user, else the sending chat, else an anonymous user with id 0.
/// Non-text messages convert with empty content.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let user = match (&msg.from, &msg.sender_chat) {
            (Some(from), _) => TelegramUserWrapper(from).to_core(),
            (None, Some(sender_chat)) => chat_as_user(sender_chat),
            (None, None) => User {
                id: 0,
                username: None,
                first_name: None,
                last_name: None,
            },
        };
        Message {
            id: msg.id.0.to_string(),
            user,
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat).to_string(),
            },
            content: msg.text().unwrap_or_default().to_string(),
            created_at: msg.date,
        }
    }
}
