//! Customer planning sessions.
//!
//! - [`entities::Session`]: the root aggregate of one conversation
//! - [`entities::ChatEntry`]: an entry of the append-only chat history
//! - [`repository::SessionRepository`]: trait for session persistence

pub mod entities;
pub mod repository;
