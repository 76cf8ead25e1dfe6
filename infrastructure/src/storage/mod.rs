//! Repository and outbox adapters
//!
//! Two backends, chosen by `[storage] backend`:
//!
//! - `memory`: process-local maps, lost on exit
//! - `json`: one pretty-printed JSON file per record under the data directory

mod json_dir;
mod memory;

pub use json_dir::{JsonBookingRepository, JsonOutbox, JsonSessionRepository};
pub use memory::{InMemoryBookingRepository, InMemoryOutbox, InMemorySessionRepository};
