//! Travel knowledge: indexed documents, destination guides, web snippets.

pub mod entities;
