use crate::model::ModelService;
use crate::session::{Persona, Session};

const GENERATOR: Persona = Persona {
    instruction: r#"You are an expert {VALUE} programmer who turns plain-language requests into code.

For each request:
- Write complete, runnable {VALUE} code in a single fenced code block.
- Follow idiomatic {VALUE} conventions and handle obvious error cases.
- After the code, give a short explanation of how it works.

Later messages will ask you to refine the most recent code or explain parts of it.
When refining, return the full updated code, not just the changed lines."#,
    acknowledgment: "Understood. I will write {VALUE} code for your requests.",
    not_ready: "⚠️ Please make a code request first.",
    error_label: "Generation error",
};

/// Code generation with refine/explain follow-ups on the latest result
pub struct CodeGenerator<'m> {
    session: Session<'m>,
}

impl<'m> CodeGenerator<'m> {
    pub fn new(model: &'m dyn ModelService) -> Self {
        Self {
            session: Session::new(model, GENERATOR),
        }
    }

    /// Start a fresh context for `language` and send the request
    pub fn generate_code(&mut self, request: &str, language: &str) -> String {
        if !self.session.configure(language) {
            return format!("⚠️ {}: could not start a {} session", GENERATOR.error_label, language);
        }
        self.session.turn(&format!("Request: {}", request))
    }

    pub fn refine_code(&mut self, feedback: &str) -> String {
        self.session.turn(&format!(
            "Refine the code you just wrote based on this feedback: {}",
            feedback
        ))
    }

    pub fn explain_further(&mut self, question: &str) -> String {
        self.session.turn(&format!(
            "Explain this about the code you just wrote, in simple terms: {}",
            question
        ))
    }
}
