//! Interactive agents and the menu that picks between them

pub mod code;
pub mod time_travel;

use std::path::Path;
use std::str::FromStr;

use crate::console::Console;
use crate::model::ModelService;
use crate::render::MenuItem;
use crate::store::BugStore;

const MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        icon: "💻",
        name: "Code Made Easy",
        description: "Debug, generate and rate code",
    },
    MenuItem {
        key: "2",
        icon: "⏳",
        name: "Time Travel Chat",
        description: "Talk to someone from any year",
    },
    MenuItem {
        key: "0",
        icon: "👋",
        name: "Exit",
        description: "",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgentChoice {
    Code,
    TimeTravel,
    Exit,
}

impl FromStr for AgentChoice {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "code" => Ok(AgentChoice::Code),
            "2" | "travel" => Ok(AgentChoice::TimeTravel),
            "0" | "exit" | "quit" => Ok(AgentChoice::Exit),
            _ => eyre::bail!("Invalid choice: {}", s),
        }
    }
}

/// Code Made Easy with a store freshly loaded from `store_path`
pub fn run_code(model: &dyn ModelService, console: &mut Console, store_path: &Path) {
    let store = BugStore::open(store_path);
    code::CodeMadeEasy::new(model, store).run(console);
}

/// Top-level loop; returns when the user exits
pub fn run(model: &dyn ModelService, console: &mut Console, store_path: &Path) {
    let mut redraw = true;
    loop {
        if redraw {
            console.ui.clear();
            console.ui.header("Parley", "Your terminal AI companions");
            console.ui.menu("MAIN MENU", MENU);
        }
        redraw = true;

        let Some(choice) = console.ask("👉 Choose an agent: ") else {
            break;
        };

        match choice.parse::<AgentChoice>() {
            Ok(AgentChoice::Code) => run_code(model, console, store_path),
            Ok(AgentChoice::TimeTravel) => time_travel::run(model, console, None),
            Ok(AgentChoice::Exit) => break,
            Err(e) => {
                log::debug!("{}", e);
                console.ui.error("Invalid choice. Please try again.");
                redraw = false;
            }
        }
    }

    console.ui.info("👋 Goodbye!");
}
