//! Tests for [`openai_client::OpenAIClient::chat_completion`] against a mockito HTTP server.
//!
//! The server stands in for an OpenAI-compatible `/chat/completions` endpoint; no real API is called.

use mockito::Matcher;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, OpenAIClient,
};
use serde_json::json;

fn messages(system: &str, user: &str) -> Vec<ChatCompletionRequestMessage> {
    vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system)
            .build()
            .unwrap()
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user)
            .build()
            .unwrap()
            .into(),
    ]
}

fn completion_body(content: serde_json::Value, usage: Option<serde_json::Value>) -> String {
    let mut body = json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "m1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    });
    if let Some(usage) = usage {
        body["usage"] = usage;
    }
    body.to_string()
}

fn usage(total: u32) -> serde_json::Value {
    json!({ "prompt_tokens": 5, "completion_tokens": total - 5, "total_tokens": total })
}

/// **Test: Successful completion returns first choice content, model and total tokens.**
///
/// **Expected:** Request body carries model, system + user messages and `stream: false`; the call is made once.
#[tokio::test]
async fn chat_completion_returns_content_and_usage() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test-token")
        .match_body(Matcher::PartialJson(json!({
            "model": "m1",
            "stream": false,
            "messages": [
                { "role": "system", "content": "P" },
                { "role": "user", "content": "hi" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!("Hello world"), Some(usage(12))))
        .expect(1)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    let completion = client.chat_completion("m1", messages("P", "hi")).await.unwrap();

    assert_eq!(completion.content, "Hello world");
    assert_eq!(completion.model, "m1");
    assert_eq!(completion.total_tokens, 12);
    mock.assert_async().await;
}

/// **Test: Non-2xx response is an error and is not retried.**
#[tokio::test]
async fn chat_completion_server_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "error": { "message": "boom", "type": "server_error", "param": null, "code": null } })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    let result = client.chat_completion("m1", messages("P", "hi")).await;

    assert!(result.is_err());
    mock.assert_async().await;
}

/// **Test: A choice with null content is a hard failure, not an empty reply.**
#[tokio::test]
async fn chat_completion_missing_content_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(serde_json::Value::Null, Some(usage(12))))
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    let err = client
        .chat_completion("m1", messages("P", "hi"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no message content"));
}

/// **Test: A response without usage is a hard failure.**
#[tokio::test]
async fn chat_completion_missing_usage_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!("Hello world"), None))
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    let err = client
        .chat_completion("m1", messages("P", "hi"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no usage"));
}

/// **Test: A body that is not a completion at all fails to deserialize.**
#[tokio::test]
async fn chat_completion_malformed_body_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    assert!(client.chat_completion("m1", messages("P", "hi")).await.is_err());
}

/// **Test: A body with only content and total tokens is accepted.**
///
/// **Expected:** No id, object, role or token breakdown is needed; the model falls back to the requested id.
#[tokio::test]
async fn chat_completion_accepts_minimal_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Hello world"}}],"usage":{"total_tokens":12}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), server.url());
    let completion = client.chat_completion("m1", messages("P", "hi")).await.unwrap();

    assert_eq!(completion.content, "Hello world");
    assert_eq!(completion.model, "m1");
    assert_eq!(completion.total_tokens, 12);
}

/// **Test: A trailing slash on the base URL does not double the path separator.**
#[tokio::test]
async fn chat_completion_trims_trailing_slash() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"m1:latest","choices":[{"message":{"content":"ok"}}],"usage":{"total_tokens":3}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-token".to_string(), format!("{}/", server.url()));
    let completion = client.chat_completion("m1", messages("P", "hi")).await.unwrap();

    assert_eq!(completion.model, "m1:latest");
    mock.assert_async().await;
}
