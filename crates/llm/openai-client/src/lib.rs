//! # OpenAI API client
//!
//! One non-streaming chat completion against an OpenAI-compatible endpoint.
//!
//! The request is built with [async-openai] types so it serializes exactly like the official
//! client. The response is read into a minimal local shape: only `choices[0].message.content` and
//! `usage.total_tokens` are required, so lean servers (Ollama, proxies) that omit ids, roles or
//! token breakdowns are accepted. `model` is used when echoed, else the requested id.
//!
//! One call, one request: nothing is retried.

use anyhow::{bail, Context};
use async_openai::types::CreateChatCompletionRequestArgs;
use serde::Deserialize;

pub use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Result of one chat completion: first choice's text plus what the endpoint reported about the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    /// Model name as echoed by the endpoint, or the requested id when the endpoint omits it.
    pub model: String,
    pub total_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionBody {
    model: Option<String>,
    choices: Vec<ChoiceBody>,
    usage: Option<UsageBody>,
}

#[derive(Deserialize)]
struct ChoiceBody {
    message: MessageBody,
}

#[derive(Deserialize)]
struct MessageBody {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    total_tokens: u32,
}

/// OpenAI-compatible chat client bound to one base URL and API key.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAIClient {
    /// Builds a client for the given base URL (e.g. `https://api.openai.com/v1` or a local Ollama `http://localhost:11434/v1`).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    /// Sends a non-streaming chat completion request.
    ///
    /// Transport failures, non-2xx responses and bodies that do not deserialize are errors. A
    /// response without `choices[0].message.content` or without `usage` is also an error.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<ChatCompletion> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %mask_token(&self.api_key),
            "OpenAI chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .stream(false)
            .build()?;
        let json = serde_json::to_string(&request)?;
        tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .await
            .context("chat completion request failed")?;
        let status = response.status();
        let text = response
            .text()
            .await
            .context("chat completion response body could not be read")?;
        if !status.is_success() {
            bail!("chat completion endpoint returned {}: {}", status, text);
        }

        let body: CompletionBody =
            serde_json::from_str(&text).context("chat completion response is malformed")?;
        let usage = body.usage.context("chat completion response has no usage")?;
        let content = body
            .choices
            .into_iter()
            .next()
            .context("chat completion response has no choices")?
            .message
            .content
            .context("chat completion choice has no message content")?;
        let model = body.model.unwrap_or_else(|| model.to_string());
        tracing::info!(
            model = %model,
            total_tokens = usage.total_tokens,
            "OpenAI chat_completion usage"
        );

        Ok(ChatCompletion {
            content,
            model,
            total_tokens: usage.total_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::mask_token;

    #[test]
    fn test_mask_token_hides_short_tokens_entirely() {
        for token in ["", "ollama", "sk-proj-12"] {
            assert_eq!(mask_token(token), "***");
        }
    }

    #[test]
    fn test_mask_token_keeps_head_and_tail() {
        assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    }

    #[test]
    fn test_mask_token_multibyte_does_not_split_chars() {
        assert_eq!(mask_token("令牌令牌令牌令牌"), "***");
    }
}
