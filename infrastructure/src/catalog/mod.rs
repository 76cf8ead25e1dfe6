//! Catalog data: the built-in inventory and destination guides.

mod builtin;

pub use builtin::{CatalogData, CatalogLoadError};
