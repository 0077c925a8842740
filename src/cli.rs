use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Terminal AI companions: a coding assistant and a time-travel chat",
    version,
    after_help = "Logs are written to: ~/.local/share/parley/logs/parley.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to parley.yaml config file")]
    pub config: Option<PathBuf>,

    /// Bug history file (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Gemini model name (overrides config)
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the agent menu (default)
    Chat,

    /// Open Code Made Easy directly
    Code,

    /// Open Time Travel Chat directly
    Travel {
        /// Year to travel to (asked for if omitted)
        #[arg(long)]
        year: Option<String>,
    },

    /// Inspect and manage the bug history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List records, newest first
    List {
        /// Only this language (case-insensitive)
        #[arg(long)]
        language: Option<String>,

        /// Only error types containing this text (case-insensitive)
        #[arg(long)]
        error_type: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Count records by language and error type
    Summary {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Delete every record
    Clear {
        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_menu() {
        let cli = Cli::try_parse_from(["parley"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_store_after_subcommand() {
        let cli = Cli::try_parse_from(["parley", "history", "list", "--store", "/tmp/b.json", "-o", "json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/b.json")));
        match cli.command {
            Some(Commands::History {
                action: HistoryAction::List { format, .. },
            }) => assert_eq!(format, Some(OutputFormat::Json)),
            _ => panic!("expected history list"),
        }
    }

    #[test]
    fn test_travel_year() {
        let cli = Cli::try_parse_from(["parley", "travel", "--year", "50 BC"]).unwrap();
        match cli.command {
            Some(Commands::Travel { year }) => assert_eq!(year.as_deref(), Some("50 BC")),
            _ => panic!("expected travel"),
        }
    }

    #[test]
    fn test_output_format_explicit() {
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Yaml)), OutputFormat::Yaml);
    }
}
