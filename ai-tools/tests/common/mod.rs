//! Test doubles shared by the ai-tools integration tests: a scripted [`LlmClient`] and a
//! recording [`Bot`].

#![allow(dead_code)]

use ai_tools::{AiTools, AiToolsConfig, ModeConfig};
use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, DbotError, ForwardNode, Message, Result, User};
use llm_client::{ChatCompletion, LlmClient};
use prompt::ChatMessage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One recorded `complete(model, messages)` call.
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// LlmClient that answers from a script and records every request.
/// When the script is empty it answers with `fallback`.
pub struct MockLlmClient {
    script: Mutex<VecDeque<anyhow::Result<String>>>,
    fallback: String,
    total_tokens: u32,
    calls: Mutex<Vec<CompletionCall>>,
}

impl MockLlmClient {
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: content.to_string(),
            total_tokens: 12,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Fails the next call with `message`.
    pub fn failing(message: &str) -> Arc<Self> {
        let client = Self::replying("");
        client
            .script
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
        client
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> anyhow::Result<ChatCompletion> {
        self.calls.lock().unwrap().push(CompletionCall {
            model: model.to_string(),
            messages,
        });
        let next = self.script.lock().unwrap().pop_front();
        let content = match next {
            Some(result) => result?,
            None => self.fallback.clone(),
        };
        Ok(ChatCompletion {
            content,
            model: model.to_string(),
            total_tokens: self.total_tokens,
        })
    }
}

/// What a [`MockBot`] was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message { chat_id: i64, text: String },
    Reply { message_id: String, text: String },
    Forward { chat_id: i64, nodes: Vec<ForwardNode> },
}

/// Bot that records every successful outbound call.
///
/// With a limit, any send whose text (or total forward content) is longer than `limit`
/// characters fails like an oversized Telegram message and is not recorded.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    limit: Option<usize>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_limit(limit: usize) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            limit: Some(limit),
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn check_len(&self, len: usize) -> Result<()> {
        match self.limit {
            Some(limit) if len > limit => Err(DbotError::Bot(format!(
                "Bad Request: message is too long ({} > {})",
                len, limit
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.check_len(text.chars().count())?;
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.check_len(text.chars().count())?;
        self.sent.lock().unwrap().push(Sent::Reply {
            message_id: message.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_forward(&self, chat: &Chat, nodes: &[ForwardNode]) -> Result<()> {
        self.check_len(nodes.iter().map(|n| n.content.chars().count()).sum())?;
        self.sent.lock().unwrap().push(Sent::Forward {
            chat_id: chat.id,
            nodes: nodes.to_vec(),
        });
        Ok(())
    }
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: Some(username.to_string()),
        first_name: Some(username.to_string()),
        last_name: None,
    }
}

pub fn bot_user() -> User {
    user(999, "relay_bot")
}

pub fn message(from: User, content: &str) -> Message {
    Message {
        id: "42".to_string(),
        user: from,
        chat: Chat {
            id: -1001,
            chat_type: "supergroup".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Config with short distinct prompts and no cleanup.
pub fn test_config() -> AiToolsConfig {
    AiToolsConfig {
        url: "http://127.0.0.1:1/v1".to_string(),
        token: "sk-test".to_string(),
        zip: 30,
        ask: ModeConfig::new("ask-model", "ASK PROMPT", ""),
        retouch: ModeConfig::new("retouch-model", "RETOUCH PROMPT", ""),
        ..AiToolsConfig::default()
    }
}

/// Service opened with `client`.
pub fn open_service(config: &AiToolsConfig, client: Arc<MockLlmClient>) -> Arc<AiTools> {
    let service = Arc::new(AiTools::new(config));
    service.open_with_client(client);
    service
}
