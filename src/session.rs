//! Conversational sessions
//!
//! A session ties one configuration value (a year, a target language) to an
//! open chat context. Everything multi-turn lives in the context; the session
//! only remembers the value and the handle.

use crate::model::{ChatContext, ModelService, Turn};

/// Placeholder substituted into persona templates
const VALUE_PLACEHOLDER: &str = "{VALUE}";

/// Instruction and acknowledgment templates for a session
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    /// Seeded as the first user turn
    pub instruction: &'static str,
    /// Seeded as the model's reply to the instruction
    pub acknowledgment: &'static str,
    /// Returned by `turn` before `configure`
    pub not_ready: &'static str,
    /// Label for service failures
    pub error_label: &'static str,
}

impl Persona {
    fn seed(&self, value: &str) -> Vec<Turn> {
        vec![
            Turn::user(self.instruction.replace(VALUE_PLACEHOLDER, value)),
            Turn::model(self.acknowledgment.replace(VALUE_PLACEHOLDER, value)),
        ]
    }
}

pub struct Session<'m> {
    model: &'m dyn ModelService,
    persona: Persona,
    value: Option<String>,
    chat: Option<Box<dyn ChatContext>>,
}

impl<'m> Session<'m> {
    pub fn new(model: &'m dyn ModelService, persona: Persona) -> Self {
        Self {
            model,
            persona,
            value: None,
            chat: None,
        }
    }

    /// Current configuration value, if configured
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Open a fresh context for `value`, replacing any previous one.
    /// Returns false (and stays unconfigured) if the service refuses.
    pub fn configure(&mut self, value: &str) -> bool {
        self.value = None;
        self.chat = None;

        match self.model.open_chat(self.persona.seed(value)) {
            Ok(chat) => {
                log::info!("Session configured with {:?}", value);
                self.value = Some(value.to_string());
                self.chat = Some(chat);
                true
            }
            Err(e) => {
                log::error!("Failed to open chat for {:?}: {:#}", value, e);
                false
            }
        }
    }

    /// One request/response turn. Never fails: problems come back as text.
    pub fn turn(&mut self, input: &str) -> String {
        let Some(chat) = self.chat.as_mut() else {
            return self.persona.not_ready.to_string();
        };

        match chat.send(input) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Turn failed: {:#}", e);
                format!("⚠️ {}: {:#}", self.persona.error_label, e)
            }
        }
    }
}
