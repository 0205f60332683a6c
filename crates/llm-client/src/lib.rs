//! # LLM client abstraction
//!
//! [`LlmClient`] is the seam between the relay service and the completion endpoint. The service
//! holds an `Arc<dyn LlmClient>`; production uses [`OpenAILlmClient`], tests a scripted client.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;

mod openai_llm;

pub use openai_client::{mask_token, ChatCompletion};
pub use openai_llm::OpenAILlmClient;

/// One non-streaming completion for a list of messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `messages` to `model` and returns the first choice's text plus reported usage.
    /// Exactly one request per call; failures are returned, never retried.
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<ChatCompletion>;
}
