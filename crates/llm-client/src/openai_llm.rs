//! OpenAI-compatible [`LlmClient`]: converts messages and delegates to openai-client.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};
use tracing::instrument;

use super::{ChatCompletion, LlmClient};

/// Maps one [`ChatMessage`] to the request type of its role.
fn to_request_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let text = msg.content.as_str();
    Ok(match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(text)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?
            .into(),
    })
}

/// [`LlmClient`] backed by [`openai_client::OpenAIClient`]. Cheap to clone; clones share the HTTP client.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<ChatCompletion> {
        let request = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;
        self.client.chat_completion(model, request).await
    }
}
