//! # Prompt
//!
//! Message types for chat-completion requests and the two-message conversation every relay call
//! sends: the mode's system prompt followed by the user's raw text.
//!
//! ## External interactions
//!
//! - **AI models**: the messages are converted to OpenAI-compatible `messages` entries by `llm-client`.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Builds `[system(system_prompt), user(text)]`.
///
/// `text` is passed through untouched: it may be empty and is not length-checked here; the
/// endpoint decides what it accepts.
pub fn conversation(system_prompt: &str, text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(text)]
}
