//! Domain error types

use crate::catalog::item_id::ItemKind;
use thiserror::Error;

/// Domain-level errors
///
/// These are the typed failures of the planning core. The orchestrator turns
/// most of them into conversational replies; admin-facing operations surface
/// them directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Itinerary is already confirmed and can no longer be changed")]
    AlreadyConfirmed,

    #[error("Cannot confirm an empty itinerary")]
    EmptyItinerary,

    #[error("A customer email is required before confirming")]
    MissingCustomerInfo,

    #[error("{kind} {id} is already in the itinerary")]
    Duplicate { kind: ItemKind, id: String },

    #[error("No information found in the knowledge store or on the web")]
    RetrievalUnavailable,

    #[error("Invalid item id: {0}")]
    InvalidItemId(String),

    #[error("Invalid item kind: {0}")]
    InvalidKind(String),

    #[error("Invalid booking status: {0}")]
    InvalidStatus(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    /// Errors that describe a rejected itinerary mutation rather than bad input.
    pub fn is_itinerary_rule(&self) -> bool {
        matches!(
            self,
            DomainError::AlreadyConfirmed
                | DomainError::EmptyItinerary
                | DomainError::MissingCustomerInfo
                | DomainError::Duplicate { .. }
        )
    }
}
