use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::{HistoryAction, OutputFormat};
use crate::store::{BugRecord, BugStore};

pub fn run(action: HistoryAction, store_path: &Path) -> Result<()> {
    let mut store = BugStore::open(store_path);

    match action {
        HistoryAction::List {
            language,
            error_type,
            format,
        } => list(
            &store,
            language.as_deref(),
            error_type.as_deref(),
            OutputFormat::resolve(format),
        ),
        HistoryAction::Summary { format } => summary(&store, OutputFormat::resolve(format)),
        HistoryAction::Clear { yes } => clear(&mut store, yes),
    }
}

fn list(store: &BugStore, language: Option<&str>, error_type: Option<&str>, format: OutputFormat) -> Result<()> {
    let mut records: Vec<&BugRecord> = match language {
        Some(language) => store.by_language(language),
        None => store.all().iter().collect(),
    };
    if let Some(error_type) = error_type {
        let matching = store.by_error_type(error_type);
        records.retain(|r| matching.iter().any(|m| std::ptr::eq(*m, *r)));
    }
    records.reverse();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&records)?),
        OutputFormat::Text => {
            println!("{} {} bug reports in {}", "📜".blue(), records.len(), store.path().display());
            println!();

            if records.is_empty() {
                println!("  {}", "(no bugs recorded yet)".dimmed());
            }
            for (i, record) in records.iter().enumerate() {
                print_record_summary(i + 1, record);
            }
        }
    }

    Ok(())
}

fn summary(store: &BugStore, format: OutputFormat) -> Result<()> {
    let summary = store.summary();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&summary)?),
        OutputFormat::Text => {
            println!("{} {}", "Total bugs:".bold(), summary.total);
            println!();
            println!("{}", "By language:".bold());
            for (language, count) in &summary.by_language {
                println!("  {:20} {}", language.cyan(), count);
            }
            println!();
            println!("{}", "By error type:".bold());
            for (error_type, count) in &summary.by_error_type {
                println!("  {:20} {}", error_type.cyan(), count);
            }
        }
    }

    Ok(())
}

fn clear(store: &mut BugStore, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete all {} records in {}?", store.len(), store.path().display()))? {
        println!("{} Aborted", "✗".yellow());
        return Ok(());
    }

    store.clear().context("Failed to clear bug history")?;
    println!("{} Cleared bug history: {}", "✓".green(), store.path().display());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read answer")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_record_summary(number: usize, record: &BugRecord) {
    println!(
        "  {:>3}. {} {} {}",
        number,
        record.date.dimmed(),
        record.language.cyan(),
        record.error_type.bold()
    );
    let first_line = record.explanation.lines().next().unwrap_or("");
    if !first_line.is_empty() {
        println!("       {}", first_line.dimmed());
    }
}
