//! Presentation layer for the travel concierge
//!
//! This crate contains the CLI definition, the console formatter and the
//! interactive chat REPL with its slash commands.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
