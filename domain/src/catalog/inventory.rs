//! Read-only catalog of bookable inventory.

use super::entities::{Activity, CatalogItem, Flight, Hotel};
use super::item_id::{ItemId, ItemKind};
use std::collections::BTreeMap;

/// Immutable inventory of flights, hotels and activities.
///
/// Built once at startup and shared read-only. Lookups are keyed by the
/// normalised [`ItemId`], so an id of one kind never resolves as another.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    flights: BTreeMap<ItemId, Flight>,
    hotels: BTreeMap<ItemId, Hotel>,
    activities: BTreeMap<ItemId, Activity>,
}

impl Catalog {
    pub fn new(flights: Vec<Flight>, hotels: Vec<Hotel>, activities: Vec<Activity>) -> Self {
        Self {
            flights: flights.into_iter().map(|f| (f.id.clone(), f)).collect(),
            hotels: hotels.into_iter().map(|h| (h.id.clone(), h)).collect(),
            activities: activities.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }

    pub fn flight(&self, id: &ItemId) -> Option<&Flight> {
        self.flights.get(id)
    }

    pub fn hotel(&self, id: &ItemId) -> Option<&Hotel> {
        self.hotels.get(id)
    }

    pub fn activity(&self, id: &ItemId) -> Option<&Activity> {
        self.activities.get(id)
    }

    /// Resolve an id of the given kind.
    pub fn resolve(&self, kind: ItemKind, id: &ItemId) -> Option<CatalogItem> {
        match kind {
            ItemKind::Flight => self.flight(id).cloned().map(CatalogItem::from),
            ItemKind::Hotel => self.hotel(id).cloned().map(CatalogItem::from),
            ItemKind::Activity => self.activity(id).cloned().map(CatalogItem::from),
        }
    }

    pub fn contains(&self, kind: ItemKind, id: &ItemId) -> bool {
        match kind {
            ItemKind::Flight => self.flights.contains_key(id),
            ItemKind::Hotel => self.hotels.contains_key(id),
            ItemKind::Activity => self.activities.contains_key(id),
        }
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    pub fn hotels(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.values()
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn len(&self) -> usize {
        self.flights.len() + self.hotels.len() + self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flights filtered by origin/destination substring and departure date prefix.
    pub fn search_flights(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        date: Option<&str>,
    ) -> Vec<&Flight> {
        self.flights
            .values()
            .filter(|f| origin.is_none_or(|o| contains_ci(&f.from, o)))
            .filter(|f| destination.is_none_or(|d| contains_ci(&f.to, d)))
            .filter(|f| date.is_none_or(|d| f.departure.starts_with(d)))
            .collect()
    }

    /// Hotels in `city` at or under `max_price` per night.
    pub fn search_hotels(&self, city: Option<&str>, max_price: Option<f64>) -> Vec<&Hotel> {
        self.hotels
            .values()
            .filter(|h| city.is_none_or(|c| contains_ci(&h.city, c)))
            .filter(|h| max_price.is_none_or(|m| h.price_per_night <= m))
            .collect()
    }

    pub fn search_activities(&self, city: Option<&str>) -> Vec<&Activity> {
        self.activities
            .values()
            .filter(|a| city.is_none_or(|c| contains_ci(&a.city, c)))
            .collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn id(raw: &str) -> ItemId {
        ItemId::parse(raw).unwrap()
    }

    /// Small catalog used across domain tests.
    pub fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                Flight {
                    id: id("FL001"),
                    airline: "SkyWay Airlines".to_string(),
                    from: "New York (JFK)".to_string(),
                    to: "Paris (CDG)".to_string(),
                    departure: "2025-03-15 08:00".to_string(),
                    arrival: "2025-03-15 20:30".to_string(),
                    price: 650.0,
                    class: "economy".to_string(),
                },
                Flight {
                    id: id("FL003"),
                    airline: "Atlantic Air".to_string(),
                    from: "New York (JFK)".to_string(),
                    to: "London (LHR)".to_string(),
                    departure: "2025-03-15 10:00".to_string(),
                    arrival: "2025-03-15 22:00".to_string(),
                    price: 520.0,
                    class: "economy".to_string(),
                },
            ],
            vec![
                Hotel {
                    id: id("HT001"),
                    name: "Hotel Le Marais".to_string(),
                    city: "Paris".to_string(),
                    rating: 4.5,
                    price_per_night: 100.0,
                    amenities: vec!["WiFi".to_string()],
                    description: "Boutique hotel".to_string(),
                },
                Hotel {
                    id: id("HT002"),
                    name: "Grand Plaza Paris".to_string(),
                    city: "Paris".to_string(),
                    rating: 4.8,
                    price_per_night: 320.0,
                    amenities: vec!["Spa".to_string()],
                    description: "Luxury hotel".to_string(),
                },
            ],
            vec![Activity {
                id: id("AC001"),
                name: "Eiffel Tower Skip-the-Line Tour".to_string(),
                city: "Paris".to_string(),
                duration: "3 hours".to_string(),
                price: 50.0,
                description: "Priority access".to_string(),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_catalog;
    use super::*;

    #[test]
    fn test_resolve_respects_kind() {
        let catalog = sample_catalog();
        let fl = ItemId::parse("FL001").unwrap();
        assert!(catalog.resolve(ItemKind::Flight, &fl).is_some());
        assert!(catalog.resolve(ItemKind::Hotel, &fl).is_none());
        assert!(catalog.contains(ItemKind::Flight, &fl));
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_search_flights_filters() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search_flights(None, Some("paris"), None).len(), 1);
        assert_eq!(catalog.search_flights(Some("new york"), None, None).len(), 2);
        assert_eq!(
            catalog
                .search_flights(None, None, Some("2025-03-15"))
                .len(),
            2
        );
        assert!(catalog.search_flights(None, Some("Tokyo"), None).is_empty());
    }

    #[test]
    fn test_search_hotels_price_cap() {
        let catalog = sample_catalog();
        let cheap = catalog.search_hotels(Some("Paris"), Some(150.0));
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].name, "Hotel Le Marais");
        assert_eq!(catalog.search_hotels(Some("paris"), None).len(), 2);
    }

    #[test]
    fn test_search_activities_by_city() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search_activities(Some("PARIS")).len(), 1);
        assert_eq!(catalog.search_activities(None).len(), 1);
        assert!(catalog.search_activities(Some("Rome")).is_empty());
    }
}
