use crate::model::ModelService;
use crate::session::{Persona, Session};

const REVIEWER: Persona = Persona {
    instruction: r#"You are a senior {VALUE} code reviewer.

When given code, rate it and respond with:
- **Overall Score**: X/10
- **Readability**, **Correctness**, **Efficiency**, **Best Practices**: a score out of 10 each, with one line of reasoning
- **Strengths**: what the code does well
- **Improvements**: concrete, prioritized suggestions with short code examples

Be honest but encouraging. Later messages are questions about your review."#,
    acknowledgment: "Ready to review {VALUE} code.",
    not_ready: "⚠️ Please submit code for review first.",
    error_label: "Review error",
};

/// Code review with a question follow-up on the latest review
pub struct CodeRater<'m> {
    session: Session<'m>,
}

impl<'m> CodeRater<'m> {
    pub fn new(model: &'m dyn ModelService) -> Self {
        Self {
            session: Session::new(model, REVIEWER),
        }
    }

    pub fn rate_code(&mut self, code: &str, language: &str) -> String {
        if !self.session.configure(language) {
            return format!("⚠️ {}: could not start a {} session", REVIEWER.error_label, language);
        }
        self.session.turn(&format!("Rate this code:\n```{}\n{}\n```", language, code))
    }

    pub fn ask_question(&mut self, question: &str) -> String {
        self.session.turn(question)
    }
}
