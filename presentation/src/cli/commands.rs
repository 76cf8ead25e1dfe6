//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for one-shot replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted reply text
    Text,
    /// Reply, preferences and itinerary as JSON
    Json,
}

/// CLI arguments for travel-concierge
#[derive(Parser, Debug)]
#[command(name = "travel-concierge")]
#[command(author, version, about = "Travel concierge - plan, price and book trips in conversation")]
#[command(long_about = r#"
Travel Concierge is a conversational trip planner. Tell it where and when
you want to go; it searches flights, hotels and activities, answers travel
questions from its knowledge base (falling back to the web), keeps a priced
itinerary and books it once you confirm.

Without a message an interactive chat starts. Admin commands (/sessions,
/bookings, /status, /admin, /notifications) are available in the chat.

Configuration files are loaded from (in priority order):
1. CONCIERGE_* environment variables (e.g. CONCIERGE_STORAGE__BACKEND=json)
2. --config <path>     Explicit config file
3. ./concierge.toml    Project-level config
4. ~/.config/travel-concierge/config.toml   Global config

Example:
  travel-concierge
  travel-concierge "I want to plan a trip to Paris with a budget of 2000"
  travel-concierge --session 3f2a... "add HT001"
"#)]
pub struct Cli {
    /// Send a single message and print the reply (interactive chat if omitted)
    pub message: Option<String>,

    /// Continue an existing session
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Output format for a single message
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_shot() {
        let cli = Cli::try_parse_from([
            "travel-concierge",
            "-vv",
            "--session",
            "abc",
            "-o",
            "json",
            "add HT001",
        ])
        .unwrap();
        assert_eq!(cli.message.as_deref(), Some("add HT001"));
        assert_eq!(cli.session.as_deref(), Some("abc"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.no_config);
    }

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["travel-concierge"]).unwrap();
        assert!(cli.message.is_none());
        assert_eq!(cli.output, OutputFormat::Text);
    }
}
