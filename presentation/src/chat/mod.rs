//! Interactive chat module
//!
//! Provides a readline-based chat with the concierge. Lines starting with `/`
//! are commands for itinerary edits and the admin views.

mod command;
mod repl;

pub use command::{AdminScope, ReplCommand};
pub use repl::ChatRepl;
