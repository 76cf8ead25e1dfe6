//! Catalog subdomain.
//!
//! - [`item_id`]: kind-prefixed item ids and the free-text id pattern
//! - [`entities`]: flight, hotel and activity records
//! - [`inventory::Catalog`]: the immutable, read-only inventory

pub mod entities;
pub mod inventory;
pub mod item_id;
