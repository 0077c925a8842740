//! Line input and the console agents drive
//!
//! Reading is behind `LineReader` so Ctrl-C can be reported as a value
//! instead of killing the process, and so loops can run from a script.

use colored::*;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::render::Renderer;

/// Token that ends multi-line capture
pub const END_MARKER: &str = "END";

/// Result of one blocking read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or closed stdin
    Eof,
}

pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Input;
}

/// rustyline-backed reader with in-memory history
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> eyre::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Input {
        match self.editor.readline(&format!("{}", prompt.cyan().bold())) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Input::Line(line)
            }
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(e) => {
                log::error!("Readline error: {}", e);
                Input::Eof
            }
        }
    }
}

/// Reader plus renderer, handed to every agent loop
pub struct Console {
    reader: Box<dyn LineReader>,
    pub ui: Box<dyn Renderer>,
}

impl Console {
    pub fn new(reader: Box<dyn LineReader>, ui: Box<dyn Renderer>) -> Self {
        Self { reader, ui }
    }

    /// Raw read, for loops that treat interrupts specially
    pub fn read(&mut self, prompt: &str) -> Input {
        self.reader.read_line(prompt)
    }

    /// Trimmed line, or None if the user interrupted or input ended
    pub fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.read(prompt) {
            Input::Line(line) => Some(line.trim().to_string()),
            Input::Interrupted | Input::Eof => None,
        }
    }

    /// Lines up to a lone `END`. Interrupt discards everything and returns "".
    pub fn read_multiline(&mut self, prompt: &str) -> String {
        if !prompt.is_empty() {
            self.ui.info(&prompt.cyan().bold().to_string());
        }
        self.ui.info(&format!("(Type '{}' on a new line to finish)", END_MARKER).dimmed().to_string());

        let mut lines = Vec::new();
        loop {
            match self.read("> ") {
                Input::Line(line) if line.trim() == END_MARKER => break,
                Input::Line(line) => lines.push(line),
                Input::Eof => break,
                Input::Interrupted => return String::new(),
            }
        }
        lines.join("\n")
    }

    /// Block until Enter
    pub fn pause(&mut self) {
        let _ = self.read("Press Enter to return...");
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted input and a renderer that records what it was asked to show

    use super::*;
    use crate::render::MenuItem;
    use crate::store::{BugRecord, StoreSummary};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Feeds queued inputs, then reports end of input
    pub struct ScriptedReader {
        inputs: VecDeque<Input>,
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedReader {
        pub fn new(lines: &[&str]) -> Self {
            Self {
                inputs: lines.iter().map(|l| Input::Line(l.to_string())).collect(),
                prompts: Rc::default(),
            }
        }

        pub fn then(mut self, input: Input) -> Self {
            self.inputs.push_back(input);
            self
        }

        pub fn lines(mut self, lines: &[&str]) -> Self {
            self.inputs.extend(lines.iter().map(|l| Input::Line(l.to_string())));
            self
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, prompt: &str) -> Input {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.inputs.pop_front().unwrap_or(Input::Eof)
        }
    }

    /// Each call as a short tagged string, e.g. `bot[Debugger AI]: ...`
    #[derive(Clone, Default)]
    pub struct RecordingRenderer {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingRenderer {
        pub fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.events.borrow().iter().any(|e| e.contains(needle))
        }

        fn push(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self) {
            self.push("clear".to_string());
        }
        fn header(&mut self, title: &str, subtitle: &str) {
            self.push(format!("header: {} / {}", title, subtitle));
        }
        fn menu(&mut self, title: &str, items: &[MenuItem]) {
            let keys: Vec<&str> = items.iter().map(|i| i.key).collect();
            self.push(format!("menu[{}]: {}", title, keys.join(",")));
        }
        fn user_message(&mut self, text: &str) {
            self.push(format!("user: {}", text));
        }
        fn bot_message(&mut self, title: &str, text: &str) {
            self.push(format!("bot[{}]: {}", title, text));
        }
        fn error(&mut self, msg: &str) {
            self.push(format!("error: {}", msg));
        }
        fn success(&mut self, msg: &str) {
            self.push(format!("success: {}", msg));
        }
        fn warning(&mut self, msg: &str) {
            self.push(format!("warning: {}", msg));
        }
        fn info(&mut self, msg: &str) {
            self.push(format!("info: {}", msg));
        }
        fn rule(&mut self, label: &str) {
            self.push(format!("rule: {}", label));
        }
        fn status(&mut self, msg: &str) {
            self.push(format!("status: {}", msg));
        }
        fn record(&mut self, number: usize, record: &BugRecord) {
            self.push(format!("record #{}: {} {}", number, record.language, record.error_type));
        }
        fn summary(&mut self, summary: &StoreSummary) {
            self.push(format!("summary: {}", summary.total));
        }
    }

    /// Console over a script, plus a handle on what was rendered
    pub fn scripted(reader: ScriptedReader) -> (Console, RecordingRenderer) {
        let renderer = RecordingRenderer::default();
        let console = Console::new(Box::new(reader), Box::new(renderer.clone()));
        (console, renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{ScriptedReader, scripted};
    use super::*;

    #[test]
    fn test_ask_trims() {
        let (mut console, _) = scripted(ScriptedReader::new(&["  Python  "]));
        assert_eq!(console.ask("Language: ").as_deref(), Some("Python"));
    }

    #[test]
    fn test_ask_interrupt_is_none() {
        let (mut console, _) = scripted(ScriptedReader::new(&[]).then(Input::Interrupted));
        assert_eq!(console.ask("Language: "), None);
    }

    #[test]
    fn test_multiline_stops_at_end_marker() {
        let (mut console, _) = scripted(ScriptedReader::new(&["fn main() {", "    x", "}", "  END  ", "after"]));
        assert_eq!(console.read_multiline("Code:"), "fn main() {\n    x\n}");
        assert_eq!(console.ask("next"), Some("after".to_string()));
    }

    #[test]
    fn test_multiline_end_must_be_alone() {
        let (mut console, _) = scripted(ScriptedReader::new(&["END of story", "END"]));
        assert_eq!(console.read_multiline(""), "END of story");
    }

    #[test]
    fn test_multiline_interrupt_discards() {
        let (mut console, _) = scripted(ScriptedReader::new(&["line one", "line two"]).then(Input::Interrupted));
        assert_eq!(console.read_multiline("Code:"), "");
    }

    #[test]
    fn test_multiline_eof_keeps_captured() {
        let (mut console, _) = scripted(ScriptedReader::new(&["only line"]));
        assert_eq!(console.read_multiline("Code:"), "only line");
    }
}
