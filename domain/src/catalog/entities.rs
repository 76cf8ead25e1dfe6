//! Catalog entities: flights, hotels and activities.

use super::item_id::{ItemId, ItemKind};
use serde::{Deserialize, Serialize};

/// A scheduled flight offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: ItemId,
    pub airline: String,
    pub from: String,
    pub to: String,
    /// Local departure time, `YYYY-MM-DD HH:MM`
    pub departure: String,
    pub arrival: String,
    pub price: f64,
    pub class: String,
}

/// A hotel offer priced per night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: ItemId,
    pub name: String,
    pub city: String,
    pub rating: f32,
    pub price_per_night: f64,
    pub amenities: Vec<String>,
    pub description: String,
}

/// A bookable tour or activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ItemId,
    pub name: String,
    pub city: String,
    pub duration: String,
    pub price: f64,
    pub description: String,
}

/// Any catalog item, discriminated by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CatalogItem {
    Flight(Flight),
    Hotel(Hotel),
    Activity(Activity),
}

impl CatalogItem {
    pub fn id(&self) -> &ItemId {
        match self {
            CatalogItem::Flight(f) => &f.id,
            CatalogItem::Hotel(h) => &h.id,
            CatalogItem::Activity(a) => &a.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Flight(_) => ItemKind::Flight,
            CatalogItem::Hotel(_) => ItemKind::Hotel,
            CatalogItem::Activity(_) => ItemKind::Activity,
        }
    }

    /// Display name used in replies and summaries.
    pub fn name(&self) -> String {
        match self {
            CatalogItem::Flight(f) => format!("{}: {} → {}", f.airline, f.from, f.to),
            CatalogItem::Hotel(h) => h.name.clone(),
            CatalogItem::Activity(a) => a.name.clone(),
        }
    }

    /// Unit price: the fare, the nightly rate, or the ticket price.
    pub fn unit_price(&self) -> f64 {
        match self {
            CatalogItem::Flight(f) => f.price,
            CatalogItem::Hotel(h) => h.price_per_night,
            CatalogItem::Activity(a) => a.price,
        }
    }

    /// City the item is located in (flights: arrival airport).
    pub fn city(&self) -> &str {
        match self {
            CatalogItem::Flight(f) => &f.to,
            CatalogItem::Hotel(h) => &h.city,
            CatalogItem::Activity(a) => &a.city,
        }
    }
}

impl From<Flight> for CatalogItem {
    fn from(value: Flight) -> Self {
        CatalogItem::Flight(value)
    }
}

impl From<Hotel> for CatalogItem {
    fn from(value: Hotel) -> Self {
        CatalogItem::Hotel(value)
    }
}

impl From<Activity> for CatalogItem {
    fn from(value: Activity) -> Self {
        CatalogItem::Activity(value)
    }
}
