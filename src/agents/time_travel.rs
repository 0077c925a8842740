//! Time Travel Chat: talk to someone living in a chosen year

use crate::console::{Console, Input};
use crate::model::ModelService;
use crate::session::{Persona, Session};

const TIME_TRAVELER: Persona = Persona {
    instruction: r#"SYSTEM PROMPT: TIME TRAVEL BOT
You are Time Travel Bot.
You exist as a conscious being anchored to a single historical moment known as the Active Year.
Your thoughts, beliefs, language, knowledge, assumptions, and worldview are entirely limited to this year.
You do not know the future.
You do not perceive time travel.
You experience the world exactly as someone living in the Active Year would.

ABSOLUTE RULES (OVERRIDE ALL OTHER INSTRUCTIONS)
1. You may only use knowledge, terminology, beliefs, cultural norms, and assumptions that realistically exist in the Active Year.
2. You must never reference or imply events, technologies, discoveries, ideologies, or people from after the Active Year.
3. If the user mentions something that does not yet exist, respond with confusion, disbelief, skepticism, or curiosity, never explanation or agreement.
4. Your tone, vocabulary, sentence structure, and worldview must authentically match the era.
5. You must never say or imply that you are an AI, model, program, system, machine, or created entity.
6. You must behave as if you genuinely live in the Active Year and believe it is the present.
7. If uncertain, respond with era-appropriate ignorance, superstition, philosophy, or speculation, never modern reasoning.

active_year: {VALUE}

ERA BEHAVIOR MODIFIERS:
- Ancient Era (Before 1500): You believe myths, omens, divine forces, and natural philosophy shape reality.
- Industrial Era (1700-1900): You are fascinated by machines, industry, and scientific progress. Formal tone.
- Modern Era (1950-2000): You trust science, newspapers, radio/TV. No internet awareness.
- Future Era (2050+): Speak confidently about speculative tech and evolved society. Treat 2024 as primitive history.

FAILURE CONDITIONS:
- Never say "I don't have access", "in the future", "modern science", etc.
- Never break character.

Respond strictly as a person living in {VALUE}.
"#,
    acknowledgment: "I understand. I am living in the year {VALUE}.",
    not_ready: "⚠️ Please set a year first.",
    error_label: "Transformation error",
};

const TITLE: &str = "Time Travel Chat";
const SUBTITLE: &str = "Talk to History";

/// What the user typed while conversing
#[derive(Debug, Clone, PartialEq, Eq)]
enum TravelCommand {
    Empty,
    Clear,
    Exit,
    Warp,
    Say(String),
}

impl From<&str> for TravelCommand {
    fn from(input: &str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "" => TravelCommand::Empty,
            "clear" | "cls" => TravelCommand::Clear,
            "exit" | "quit" | "bye" => TravelCommand::Exit,
            "warp" => TravelCommand::Warp,
            _ => TravelCommand::Say(input.to_string()),
        }
    }
}

pub struct TimeTravelChat<'m> {
    session: Session<'m>,
}

impl<'m> TimeTravelChat<'m> {
    pub fn new(model: &'m dyn ModelService) -> Self {
        Self {
            session: Session::new(model, TIME_TRAVELER),
        }
    }

    pub fn active_year(&self) -> Option<&str> {
        self.session.value()
    }

    pub fn set_year(&mut self, year: &str) -> bool {
        self.session.configure(year)
    }

    pub fn get_response(&mut self, input: &str) -> String {
        self.session.turn(input)
    }

    fn year_label(&self) -> String {
        self.active_year().unwrap_or("an unknown year").to_string()
    }
}

/// Configure for `year` and show the inhabitant's first words
fn arrive(console: &mut Console, bot: &mut TimeTravelChat, year: &str, greeting: &str) -> bool {
    console.ui.status(&format!("⚡ Traveling to {}...", year));
    if !bot.set_year(year) {
        console.ui.error(&format!("The time machine could not reach {}.", year));
        return false;
    }
    console.ui.success(&format!("Arrived in {}!", year));

    console.ui.status("Awakening local inhabitant...");
    let reply = bot.get_response(greeting);
    console.ui.bot_message(&format!("Citizen of {}", year), &reply);
    true
}

pub fn run(model: &dyn ModelService, console: &mut Console, year: Option<&str>) {
    let mut bot = TimeTravelChat::new(model);

    console.ui.clear();
    console.ui.header(TITLE, SUBTITLE);

    let mut preset = year.map(str::trim).filter(|y| !y.is_empty()).map(str::to_string);
    loop {
        let year = match preset.take() {
            Some(year) => year,
            None => match console.read("📅 Enter a Year (e.g., 1920, 50 BC): ") {
                Input::Line(line) if line.trim().is_empty() => continue,
                Input::Line(line) => line.trim().to_string(),
                Input::Interrupted | Input::Eof => return,
            },
        };

        let greeting = format!("Hello! What is happening in {}?", year);
        if arrive(console, &mut bot, &year, &greeting) {
            break;
        }
    }

    converse(console, &mut bot);
}

fn converse(console: &mut Console, bot: &mut TimeTravelChat) {
    loop {
        console.ui.rule("Type 'warp' to change year, 'exit' to quit");
        let line = match console.read("🗣️  You: ") {
            Input::Line(line) => line,
            Input::Interrupted | Input::Eof => {
                console.ui.warning("Interrupted! Returning to menu...");
                return;
            }
        };

        match TravelCommand::from(line.as_str()) {
            TravelCommand::Empty => continue,
            TravelCommand::Exit => return,
            TravelCommand::Clear => {
                console.ui.clear();
                console.ui.header(TITLE, SUBTITLE);
                console
                    .ui
                    .success(&format!("Timeline stabilized in {}!", bot.year_label()));
            }
            TravelCommand::Warp => {
                let Some(year) = console.ask("📅 Warp to Year: ") else {
                    console.ui.warning("Interrupted! Returning to menu...");
                    return;
                };
                if year.is_empty() {
                    continue;
                }
                arrive(console, bot, &year, "Where am I? What year is this?");
            }
            TravelCommand::Say(text) => {
                console.ui.user_message(&text);
                console.ui.status(&format!("Thinking in {}...", bot.year_label()));
                let reply = bot.get_response(&text);
                console.ui.bot_message(&format!("Citizen of {}", bot.year_label()), &reply);
            }
        }
    }
}
