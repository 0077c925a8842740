//! Interactive entry points

use eyre::{Context, Result};
use std::path::Path;

use crate::agents;
use crate::config::ModelConfig;
use crate::console::{Console, EditorReader};
use crate::model::GeminiClient;
use crate::render::TerminalRenderer;

/// Which agent to start in
pub enum Entry<'a> {
    Menu,
    Code,
    Travel(Option<&'a str>),
}

pub fn run(entry: Entry, model_config: &ModelConfig, store_path: &Path) -> Result<()> {
    let client = GeminiClient::from_config(model_config).context("Failed to set up the model client")?;
    let reader = EditorReader::new().context("Failed to open the terminal for input")?;
    let mut console = Console::new(Box::new(reader), Box::new(TerminalRenderer::new()));

    log::info!("Bug history at {}", store_path.display());

    match entry {
        Entry::Menu => agents::run(&client, &mut console, store_path),
        Entry::Code => agents::run_code(&client, &mut console, store_path),
        Entry::Travel(year) => agents::time_travel::run(&client, &mut console, year),
    }

    Ok(())
}
