//! HTTP client for OpenAI-compatible chat-completions endpoints

use std::cell::RefCell;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Message roles on the chat-completions wire.
pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// One message in a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_SYSTEM.to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_ASSISTANT.to_string(),
            content: content.into(),
        }
    }
}

/// Errors from chat-completions calls.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API key is empty, check the configured environment variable")]
    MissingApiKey,
    #[error("Cannot connect to chat endpoint at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("Chat endpoint returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse chat response: {0}")]
    ResponseParsing(String),
    #[error("Chat response contained no choices")]
    EmptyResponse,
}

/// Abstraction over a chat-completions backend.
pub trait ChatClient {
    /// Send the full message history and return the assistant reply text.
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

/// Request body for POST /chat/completions.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Response body from POST /chat/completions.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Blocking HTTP client for an OpenAI-compatible endpoint.
pub struct HttpChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpChatClient {
    /// Create a client with the default 5-minute request timeout.
    ///
    /// Errors if `api_key` is empty.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChatError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChatError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ChatClient for HttpChatClient {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ChatError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ChatError::Timeout(self.timeout_secs)
                } else {
                    ChatError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ChatError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)
    }
}

/// Mock chat backend for tests — replays a queue of canned replies.
///
/// The last reply is repeated once the queue is exhausted, so single-reply
/// mocks can serve any number of turns.
pub struct MockChatClient {
    replies: RefCell<VecDeque<String>>,
}

impl MockChatClient {
    pub fn new(reply: &str) -> Self {
        Self::with_replies(vec![reply.to_string()])
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
        }
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, _model: &str, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        let mut replies = self.replies.borrow_mut();
        if replies.len() > 1 {
            return replies.pop_front().ok_or(ChatError::EmptyResponse);
        }
        replies.front().cloned().ok_or(ChatError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            HttpChatClient::new("https://api.deepseek.com", ""),
            Err(ChatError::MissingApiKey)
        ));
        assert!(matches!(
            HttpChatClient::new("https://api.deepseek.com", "   "),
            Err(ChatError::MissingApiKey)
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = HttpChatClient::new("https://api.deepseek.com/", "sk-test").unwrap();
        assert_eq!(client.base_url(), "https://api.deepseek.com");
    }

    #[test]
    fn request_body_pins_stream_false() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn response_parsing_extracts_first_choice() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "hello >_<"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello >_<");
    }

    #[test]
    fn mock_replays_queue_then_repeats_last() {
        let mock = MockChatClient::with_replies(vec!["one".into(), "two".into()]);
        assert_eq!(mock.complete("m", &[]).unwrap(), "one");
        assert_eq!(mock.complete("m", &[]).unwrap(), "two");
        assert_eq!(mock.complete("m", &[]).unwrap(), "two");
    }

    #[test]
    fn empty_mock_queue_is_empty_response() {
        let mock = MockChatClient::with_replies(vec![]);
        assert!(matches!(
            mock.complete("m", &[]),
            Err(ChatError::EmptyResponse)
        ));
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("x").role, ROLE_SYSTEM);
        assert_eq!(ChatMessage::user("x").role, ROLE_USER);
        assert_eq!(ChatMessage::assistant("x").role, ROLE_ASSISTANT);
    }
}
