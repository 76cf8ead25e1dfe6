//! Intent & preference extraction.

pub mod entities;
pub mod extractor;
