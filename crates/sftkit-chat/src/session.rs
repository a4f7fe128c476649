//! Multi-turn conversation state on top of a chat client

use crate::client::{ChatClient, ChatError, ChatMessage};

/// A running conversation: system prompt first, then alternating
/// user/assistant turns.
pub struct ChatSession<C: ChatClient> {
    client: C,
    model: String,
    history: Vec<ChatMessage>,
}

impl<C: ChatClient> ChatSession<C> {
    pub fn new(client: C, model: &str, system_prompt: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            history: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Send a user message and return the assistant reply.
    ///
    /// Both turns are recorded in the history. If the call fails the user
    /// turn is rolled back, so the history stays alternating and the same
    /// input can be retried.
    pub fn send(&mut self, user_text: &str) -> Result<String, ChatError> {
        self.history.push(ChatMessage::user(user_text));
        match self.client.complete(&self.model, &self.history) {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
