//! Itinerary aggregate: catalog selections owned by one session.

use crate::catalog::item_id::{ItemId, ItemKind};
use serde::{Deserialize, Serialize};

/// Reference from an itinerary to a catalog item.
///
/// Only the id is stored; prices are resolved against the catalog on read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItinerarySelection {
    pub kind: ItemKind,
    pub id: ItemId,
}

/// Selected flights, hotels and activities plus the confirmation flag.
///
/// Each kind keeps insertion order and never holds the same id twice.
/// `confirmed` only ever moves from `false` to `true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    flights: Vec<ItemId>,
    hotels: Vec<ItemId>,
    activities: Vec<ItemId>,
    confirmed: bool,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self, kind: ItemKind) -> &[ItemId] {
        match kind {
            ItemKind::Flight => &self.flights,
            ItemKind::Hotel => &self.hotels,
            ItemKind::Activity => &self.activities,
        }
    }

    fn ids_mut(&mut self, kind: ItemKind) -> &mut Vec<ItemId> {
        match kind {
            ItemKind::Flight => &mut self.flights,
            ItemKind::Hotel => &mut self.hotels,
            ItemKind::Activity => &mut self.activities,
        }
    }

    pub fn contains(&self, kind: ItemKind, id: &ItemId) -> bool {
        self.ids(kind).contains(id)
    }

    /// All selections, flights first, then hotels, then activities.
    pub fn selections(&self) -> Vec<ItinerarySelection> {
        ItemKind::ALL
            .iter()
            .flat_map(|&kind| {
                self.ids(kind).iter().map(move |id| ItinerarySelection {
                    kind,
                    id: id.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.flights.len() + self.hotels.len() + self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Append a selection. Returns `false` if the id was already present.
    pub(crate) fn push(&mut self, kind: ItemKind, id: ItemId) -> bool {
        let ids = self.ids_mut(kind);
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }

    /// Drop a selection. Returns `false` if it was absent.
    pub(crate) fn remove(&mut self, kind: ItemKind, id: &ItemId) -> bool {
        let ids = self.ids_mut(kind);
        let before = ids.len();
        ids.retain(|existing| existing != id);
        ids.len() != before
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }
}
