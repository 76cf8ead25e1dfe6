//! Trip planning: preferences, itinerary and the rules that govern them.
//!
//! - [`preferences::Preferences`]: per-field last-write-wins trip preferences
//! - [`itinerary::Itinerary`]: ordered selections owned by a session
//! - [`engine::ItineraryEngine`]: add/remove/confirm and cost computation
//! - [`view::ItineraryView`]: selections resolved against the catalog

pub mod engine;
pub mod itinerary;
pub mod preferences;
pub mod view;
