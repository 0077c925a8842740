use eyre::{Context, Result};

use crate::model::ModelService;

/// One-shot bug analysis; nothing is retained between calls
pub struct CodeDebugger<'m> {
    model: &'m dyn ModelService,
}

impl<'m> CodeDebugger<'m> {
    pub fn new(model: &'m dyn ModelService) -> Self {
        Self { model }
    }

    pub fn prompt(code: &str, language: &str) -> String {
        format!(
            r#"You are an expert {language} debugger and teacher.

Analyze the code below. For every bug or mistake you find, report:
1. **Error Type** (syntax, logic, runtime, type, style, ...)
2. **Mistake**: what is wrong, in one sentence
3. **Wrong Code**: the offending line(s)
4. **Correct Code**: the fixed line(s)
5. **Explanation**: why it was wrong and how to avoid it next time

Finish with the complete corrected program in a single fenced code block.
If the code has no bugs, say so and suggest improvements instead.

```{language}
{code}
```
"#
        )
    }

    pub fn debug_code(&self, code: &str, language: &str) -> Result<String> {
        log::info!("Debugging {} chars of {}", code.len(), language);
        self.model
            .generate(&Self::prompt(code, language))
            .context("Debugging failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::ScriptedModel;

    #[test]
    fn test_prompt_embeds_code_and_language() {
        let prompt = CodeDebugger::prompt("print(x", "Python");
        assert!(prompt.contains("expert Python debugger"));
        assert!(prompt.contains("```Python\nprint(x\n```"));
    }

    #[test]
    fn test_prompt_inserts_user_text_verbatim() {
        let prompt = CodeDebugger::prompt("let s = \"{LANGUAGE}\";", "Rust {CODE}");
        assert!(prompt.starts_with("You are an expert Rust {CODE} debugger"));
        assert!(prompt.contains("```Rust {CODE}\nlet s = \"{LANGUAGE}\";\n```"));
        assert_eq!(prompt.matches("let s =").count(), 1);
    }

    #[test]
    fn test_debug_code_is_single_call() {
        let model = ScriptedModel::new().reply("Missing parenthesis");
        let debugger = CodeDebugger::new(&model);

        assert_eq!(debugger.debug_code("print(x", "Python").unwrap(), "Missing parenthesis");
        assert_eq!(model.call_count(), 1);
        assert!(model.seeds().is_empty());
    }

    #[test]
    fn test_debug_code_error_has_context() {
        let model = ScriptedModel::new().fail("timeout");
        let debugger = CodeDebugger::new(&model);

        let err = debugger.debug_code("x", "Go").unwrap_err();
        assert_eq!(err.to_string(), "Debugging failed");
        assert!(format!("{:#}", err).contains("timeout"));
    }
}
