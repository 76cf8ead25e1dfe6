//! Application error type

use concierge_domain::{DomainError, RepositoryError};
use thiserror::Error;

/// Errors surfaced by the concierge use cases.
///
/// Domain errors are typed rule violations the caller can act on.
/// Repository errors mean the storage layer failed and are fatal for the
/// request.
#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage failure: {0}")]
    Repository(#[from] RepositoryError),
}

impl ConciergeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConciergeError::Repository(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConciergeError::Domain(e) if e.is_not_found())
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ConciergeError::Domain(e) => Some(e),
            ConciergeError::Repository(_) => None,
        }
    }
}
