//! Session repository trait

use super::entities::{Session, SessionId};
use async_trait::async_trait;
use thiserror::Error;

/// Storage-level failures of a repository adapter.
///
/// Unlike [`DomainError`](crate::core::error::DomainError), these are fatal
/// for the request that hit them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt record {id}: {message}")]
    Corrupt { id: String, message: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Keyed store of sessions
///
/// Sessions are created on the first turn and never removed. Implementations
/// live in the infrastructure layer.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load a session, `None` if the id is unknown
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError>;

    /// Insert or replace a session
    async fn save(&self, session: &Session) -> Result<(), RepositoryError>;

    /// All sessions, oldest first
    async fn list(&self) -> Result<Vec<Session>, RepositoryError>;
}
