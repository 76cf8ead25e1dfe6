//! Built-in catalog loaded from the bundled `data/catalog.json`.
//!
//! The same JSON shape can be loaded from a file, which is how tests and
//! deployments supply their own inventory.

use concierge_domain::{Activity, Catalog, Flight, Hotel, TravelGuide};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inventory and guides as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub activities: Vec<Activity>,
    pub guides: Vec<TravelGuide>,
}

impl CatalogData {
    /// The bundled inventory: five flights, hotels and activities plus four city guides.
    pub fn builtin() -> Result<Self, CatalogLoadError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let data: CatalogData = serde_json::from_str(json)?;
        info!(
            flights = data.flights.len(),
            hotels = data.hotels.len(),
            activities = data.activities.len(),
            guides = data.guides.len(),
            "Catalog loaded"
        );
        Ok(data)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogLoadError> {
        let json = std::fs::read_to_string(path).map_err(|e| CatalogLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Split into the read-only catalog and the guides for the knowledge store.
    pub fn into_parts(self) -> (Catalog, Vec<TravelGuide>) {
        (
            Catalog::new(self.flights, self.hotels, self.activities),
            self.guides,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_domain::{ItemId, ItemKind};

    #[test]
    fn test_builtin_catalog() {
        let (catalog, guides) = CatalogData::builtin().unwrap().into_parts();
        assert_eq!(catalog.flights().count(), 5);
        assert_eq!(catalog.hotels().count(), 5);
        assert_eq!(catalog.activities().count(), 5);

        let hotel = catalog.hotel(&ItemId::parse("HT001").unwrap()).unwrap();
        assert_eq!(hotel.name, "Hotel Le Marais");
        assert_eq!(hotel.price_per_night, 180.0);
        assert!(catalog.contains(ItemKind::Activity, &ItemId::parse("ac005").unwrap()));

        let cities: Vec<&str> = guides.iter().map(|g| g.city.as_str()).collect();
        assert_eq!(cities, vec!["Paris", "London", "Tokyo", "Rome"]);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let json = r#"{"activities": [{"id": "ZZ1", "name": "x", "city": "y",
            "duration": "1h", "price": 1.0, "description": ""}]}"#;
        assert!(matches!(
            CatalogData::from_json(json),
            Err(CatalogLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"guides": []}"#).unwrap();
        let (catalog, guides) = CatalogData::from_path(&path).unwrap().into_parts();
        assert!(catalog.is_empty());
        assert!(guides.is_empty());

        assert!(matches!(
            CatalogData::from_path(&dir.path().join("missing.json")),
            Err(CatalogLoadError::Io { .. })
        ));
    }
}
