//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod admin_query;
pub mod chat_turn;
pub(crate) mod compose;
pub mod notify;
pub mod retrieval;
pub mod service;
pub mod session_manager;
