//! Bug history browser

use std::str::FromStr;

use crate::console::Console;
use crate::store::{BugRecord, BugStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryAction {
    ByLanguage,
    ByErrorType,
    Summary,
    Clear,
    Done,
}

impl FromStr for HistoryAction {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "language" => Ok(HistoryAction::ByLanguage),
            "2" | "type" => Ok(HistoryAction::ByErrorType),
            "3" | "summary" => Ok(HistoryAction::Summary),
            "4" | "clear" => Ok(HistoryAction::Clear),
            "0" | "done" => Ok(HistoryAction::Done),
            _ => eyre::bail!("Unknown history action: {}", s),
        }
    }
}

/// Show records newest first, numbered from 1
fn show_records<'a>(console: &mut Console, records: impl DoubleEndedIterator<Item = &'a BugRecord>) {
    for (i, record) in records.rev().enumerate() {
        console.ui.record(i + 1, record);
    }
}

pub fn view(console: &mut Console, store: &mut BugStore) {
    console.ui.clear();
    console.ui.header("Bug History", "Your personal bug tracker");

    if store.is_empty() {
        console
            .ui
            .warning("📭 No bugs recorded yet. Start debugging to build your history!");
        console.pause();
        return;
    }

    console.ui.info(&format!("📜 Found {} bug reports:", store.len()));
    show_records(console, store.all().iter());

    loop {
        console.ui.rule("Options");
        console
            .ui
            .info("[1] By Language  [2] By Error Type  [3] Summary  [4] Clear History  [0] Done");
        let Some(choice) = console.ask("👉 Next: ") else {
            return;
        };

        let Ok(action) = choice.parse::<HistoryAction>() else {
            continue;
        };

        match action {
            HistoryAction::Done => return,
            HistoryAction::ByLanguage => {
                let Some(language) = console.ask("   Language: ") else { return };
                if language.is_empty() {
                    continue;
                }
                let hits = store.by_language(&language);
                console.ui.info(&format!("{} bug reports in {}:", hits.len(), language));
                show_records(console, hits.into_iter());
            }
            HistoryAction::ByErrorType => {
                let Some(error_type) = console.ask("   Error type contains: ") else { return };
                if error_type.is_empty() {
                    continue;
                }
                let hits = store.by_error_type(&error_type);
                console
                    .ui
                    .info(&format!("{} bug reports matching '{}':", hits.len(), error_type));
                show_records(console, hits.into_iter());
            }
            HistoryAction::Summary => {
                let summary = store.summary();
                console.ui.summary(&summary);
            }
            HistoryAction::Clear => {
                let prompt = format!("   Delete all {} records? (y/N): ", store.len());
                let Some(answer) = console.ask(&prompt) else { return };
                if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
                    continue;
                }
                match store.clear() {
                    Ok(()) => {
                        console.ui.success("Bug history cleared.");
                        console.pause();
                        return;
                    }
                    Err(e) => console.ui.error(&format!("Could not clear bug history: {:#}", e)),
                }
            }
        }
    }
}
