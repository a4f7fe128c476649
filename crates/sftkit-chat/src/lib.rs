//! Chat-completions client for exercising hosted LLM APIs
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The client
//! sits behind the [`ChatClient`] trait so conversation logic can be tested
//! against [`client::MockChatClient`] without a network.

pub mod client;
pub mod session;

pub use client::{ChatClient, ChatError, ChatMessage, HttpChatClient, MockChatClient};
pub use session::ChatSession;
