//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: the typed failure taxonomy of the planning core

pub mod error;
