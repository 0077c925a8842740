//! Code Made Easy: debugger, generator, rater and bug history

mod debugger;
mod generator;
mod history;
mod rater;

pub use debugger::CodeDebugger;
pub use generator::CodeGenerator;
pub use rater::CodeRater;

use std::str::FromStr;

use crate::console::Console;
use crate::model::ModelService;
use crate::render::MenuItem;
use crate::store::BugStore;

const MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        icon: "🐛",
        name: "AI Code Debugger",
        description: "Find and fix bugs instantly",
    },
    MenuItem {
        key: "2",
        icon: "⚡",
        name: "AI Code Generator",
        description: "Turn ideas into code",
    },
    MenuItem {
        key: "3",
        icon: "⭐",
        name: "Rate My Programme",
        description: "Get quality scores and feedback",
    },
    MenuItem {
        key: "4",
        icon: "📜",
        name: "View Bug History",
        description: "Review past mistakes",
    },
    MenuItem {
        key: "0",
        icon: "🔙",
        name: "Back to Main Menu",
        description: "Return to agent selection",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeChoice {
    Debugger,
    Generator,
    Rater,
    History,
    Back,
}

impl FromStr for CodeChoice {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim() {
            "1" => Ok(CodeChoice::Debugger),
            "2" => Ok(CodeChoice::Generator),
            "3" => Ok(CodeChoice::Rater),
            "4" => Ok(CodeChoice::History),
            "0" => Ok(CodeChoice::Back),
            _ => eyre::bail!("Invalid choice: {}", s),
        }
    }
}

/// Follow-up after a generated result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeneratorAction {
    Refine,
    Explain,
    New,
    Done,
}

impl FromStr for GeneratorAction {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "0" | "done" => Ok(GeneratorAction::Done),
            "3" | "new" => Ok(GeneratorAction::New),
            "1" => Ok(GeneratorAction::Refine),
            "2" => Ok(GeneratorAction::Explain),
            _ if s.starts_with("refine") => Ok(GeneratorAction::Refine),
            _ if s.starts_with("explain") => Ok(GeneratorAction::Explain),
            _ => eyre::bail!("Unknown generator action: {}", s),
        }
    }
}

/// Follow-up after a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RaterAction {
    Ask,
    New,
    Done,
}

impl FromStr for RaterAction {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "ask" => Ok(RaterAction::Ask),
            "2" | "new" => Ok(RaterAction::New),
            "0" | "done" => Ok(RaterAction::Done),
            _ => eyre::bail!("Unknown rater action: {}", s),
        }
    }
}

/// How a follow-up loop ended
enum Next {
    Again,
    Menu,
}

pub struct CodeMadeEasy<'m> {
    model: &'m dyn ModelService,
    store: BugStore,
}

impl<'m> CodeMadeEasy<'m> {
    pub fn new(model: &'m dyn ModelService, store: BugStore) -> Self {
        Self { model, store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &BugStore {
        &self.store
    }

    pub fn run(&mut self, console: &mut Console) {
        let mut redraw = true;
        loop {
            if redraw {
                console.ui.clear();
                console.ui.header("Code Made Easy", "Debug • Generate • Optimize");
                console.ui.menu("CODE TOOLS", MENU);
            }
            redraw = true;

            let Some(choice) = console.ask("👉 Choice: ") else {
                return;
            };

            match choice.parse::<CodeChoice>() {
                Ok(CodeChoice::Debugger) => self.run_debugger(console),
                Ok(CodeChoice::Generator) => self.run_generator(console),
                Ok(CodeChoice::Rater) => self.run_rater(console),
                Ok(CodeChoice::History) => history::view(console, &mut self.store),
                Ok(CodeChoice::Back) => return,
                Err(e) => {
                    log::debug!("{}", e);
                    console.ui.error("Invalid choice. Please try again.");
                    redraw = false;
                }
            }
        }
    }

    fn run_debugger(&mut self, console: &mut Console) {
        console.ui.clear();
        console.ui.header("AI Code Debugger", "Find bugs fast");

        console.ui.info("1. Select Language");
        let Some(language) = console.ask("   Language (e.g. Python, JS): ") else {
            return;
        };
        if language.is_empty() {
            return;
        }

        console.ui.info("2. Enter Code");
        let code = console.read_multiline("Paste your broken code below:");
        if code.trim().is_empty() {
            console.ui.error("No code provided.");
            console.pause();
            return;
        }

        let preview: String = code.chars().take(50).collect();
        console
            .ui
            .user_message(&format!("Debug this {} code:\n...\n{}...", language, preview));

        console.ui.status("🔍 Analyzing code for bugs...");
        match CodeDebugger::new(self.model).debug_code(&code, &language) {
            Ok(analysis) => {
                console.ui.bot_message("Debugger AI", &analysis);
                match self.store.add_from_freeform_text(&language, &analysis) {
                    Ok(()) => console.ui.success("Saved to bug history."),
                    Err(e) => console.ui.error(&format!("Could not save bug history: {:#}", e)),
                }
            }
            Err(e) => console.ui.bot_message("Debugger AI", &format!("⚠️ {:#}", e)),
        }

        console.pause();
    }

    fn run_generator(&mut self, console: &mut Console) {
        while let Next::Again = self.generate_once(console) {}
    }

    fn generate_once(&mut self, console: &mut Console) -> Next {
        console.ui.clear();
        console.ui.header("AI Code Generator", "Text to Code");

        console.ui.info("Describe what you want to build:");
        console
            .ui
            .info("Example: 'Create a Python script that scrapes headlines from news.com'");

        let Some(request) = console.ask("📝 Request: ") else {
            return Next::Menu;
        };
        if request.is_empty() || matches!(request.to_lowercase().as_str(), "exit" | "back") {
            return Next::Menu;
        }

        let Some(language) = console.ask("💻 Target Language (default: Python): ") else {
            return Next::Menu;
        };
        let language = if language.is_empty() { "Python".to_string() } else { language };

        console
            .ui
            .user_message(&format!("Generate {} code: {}", language, request));

        let mut generator = CodeGenerator::new(self.model);
        console.ui.status(&format!("⚡ Generating {} code...", language));
        let result = generator.generate_code(&request, &language);
        console.ui.bot_message("Generator AI", &result);

        loop {
            console.ui.rule("Options");
            console.ui.info("[1] Refine  [2] Explain  [3] New Request  [0] Done");
            let Some(choice) = console.ask("👉 Next: ") else {
                return Next::Menu;
            };

            match choice.parse::<GeneratorAction>() {
                Ok(GeneratorAction::Done) => return Next::Menu,
                Ok(GeneratorAction::New) => return Next::Again,
                Ok(GeneratorAction::Refine) => {
                    let Some(feedback) = console.ask("   What should I change? ") else {
                        return Next::Menu;
                    };
                    if !feedback.is_empty() {
                        console.ui.user_message(&format!("Refine: {}", feedback));
                        console.ui.status("⚡ Refining code...");
                        let result = generator.refine_code(&feedback);
                        console.ui.bot_message("Generator AI", &result);
                    }
                }
                Ok(GeneratorAction::Explain) => {
                    let Some(question) = console.ask("   What's confusing? ") else {
                        return Next::Menu;
                    };
                    if !question.is_empty() {
                        console.ui.user_message(&format!("Explain: {}", question));
                        console.ui.status("🤖 Explaining...");
                        let result = generator.explain_further(&question);
                        console.ui.bot_message("Generator AI", &result);
                    }
                }
                Err(_) => continue,
            }
        }
    }

    fn run_rater(&mut self, console: &mut Console) {
        while let Next::Again = self.rate_once(console) {}
    }

    fn rate_once(&mut self, console: &mut Console) -> Next {
        console.ui.clear();
        console.ui.header("Rate My Programme", "Code Quality Review");

        let Some(language) = console.ask("💻 Programming Language: ") else {
            return Next::Menu;
        };
        if language.is_empty() {
            return Next::Menu;
        }

        let code = console.read_multiline("Paste your code:");
        if code.trim().is_empty() {
            return Next::Menu;
        }

        console.ui.user_message(&format!("Rate this {} code...", language));

        let mut rater = CodeRater::new(self.model);
        console.ui.status("⭐ Reviewing code quality...");
        let review = rater.rate_code(&code, &language);
        console.ui.bot_message("Code Reviewer", &review);

        loop {
            console.ui.rule("Options");
            console.ui.info("[1] Ask Question  [2] New Review  [0] Done");
            let Some(choice) = console.ask("👉 Next: ") else {
                return Next::Menu;
            };

            match choice.parse::<RaterAction>() {
                Ok(RaterAction::Done) => return Next::Menu,
                Ok(RaterAction::New) => return Next::Again,
                Ok(RaterAction::Ask) => {
                    let Some(question) = console.ask("   Ask about the rating: ") else {
                        return Next::Menu;
                    };
                    if !question.is_empty() {
                        console.ui.user_message(&question);
                        console.ui.status("🤖 Answering...");
                        let response = rater.ask_question(&question);
                        console.ui.bot_message("Code Reviewer", &response);
                    }
                }
                Err(_) => continue,
            }
        }
    }
}
