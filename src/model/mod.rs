//! Generative model boundary
//!
//! Agents only see two capabilities: a one-shot `generate` and a stateful
//! chat opened from seed turns. `GeminiClient` is the production backend.

mod gemini;

pub use gemini::GeminiClient;

use eyre::Result;

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One turn of conversation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// An open multi-turn conversation held by the model service
pub trait ChatContext {
    /// Send the next user turn and return the reply
    fn send(&mut self, text: &str) -> Result<String>;
}

/// A hosted text model
pub trait ModelService {
    /// One-shot completion with no retained context
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Start a conversation seeded with `seed`
    fn open_chat(&self, seed: Vec<Turn>) -> Result<Box<dyn ChatContext>>;
}
