//! The celestial catalog: the in-memory list of body descriptors supplied at
//! startup, optionally persisted as RON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{BodyKind, CelestialBodyDescriptor};
use crate::error::CatalogError;

/// Ordered list of top-level bodies (the star and everything orbiting it).
/// Moons live inside their planet's descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialCatalog {
    /// Top-level descriptors in composition order.
    pub bodies: Vec<CelestialBodyDescriptor>,
}

impl CelestialCatalog {
    /// Create a catalog from a list of top-level descriptors.
    pub fn new(bodies: Vec<CelestialBodyDescriptor>) -> Self {
        Self { bodies }
    }

    /// Parse a catalog from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        ron::from_str(source).map_err(CatalogError::ParseError)
    }

    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(CatalogError::ReadError)?;
        let catalog = Self::from_ron_str(&contents)?;
        log::info!(
            "Loaded catalog with {} top-level bodies from {}",
            catalog.bodies.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Serialize the catalog to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, CatalogError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty).map_err(CatalogError::SerializeError)
    }

    /// Write the catalog to a RON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CatalogError::WriteError)?;
        }
        let serialized = self.to_ron_string()?;
        std::fs::write(path, serialized).map_err(CatalogError::WriteError)
    }

    /// Top-level descriptors of kind [`BodyKind::Star`].
    pub fn stars(&self) -> impl Iterator<Item = &CelestialBodyDescriptor> {
        self.bodies.iter().filter(|b| b.kind == BodyKind::Star)
    }

    /// Find a descriptor by id, searching moons as well.
    pub fn get(&self, id: &str) -> Option<&CelestialBodyDescriptor> {
        fn find<'a>(
            bodies: &'a [CelestialBodyDescriptor],
            id: &str,
        ) -> Option<&'a CelestialBodyDescriptor> {
            bodies.iter().find_map(|body| {
                if body.id == id {
                    Some(body)
                } else {
                    find(&body.moons, id)
                }
            })
        }
        find(&self.bodies, id)
    }

    /// Total number of descriptors including moons.
    pub fn body_count(&self) -> usize {
        fn count(bodies: &[CelestialBodyDescriptor]) -> usize {
            bodies.iter().map(|b| 1 + count(&b.moons)).sum()
        }
        count(&self.bodies)
    }

    /// Number of top-level descriptors.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the catalog has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OrbitDescriptor;

    #[test]
    fn test_ron_roundtrip_preserves_catalog() {
        let catalog = CelestialCatalog::solar_system();
        let ron_str = catalog.to_ron_string().unwrap();
        let parsed = CelestialCatalog::from_ron_str(&ron_str).unwrap();
        assert_eq!(catalog, parsed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let ron_str = r#"(
            bodies: [
                (id: "rock", kind: Planet, size: 2.0, orbit: Some(Circular(radius: 100.0))),
            ],
        )"#;
        let catalog = CelestialCatalog::from_ron_str(ron_str).unwrap();
        let rock = catalog.get("rock").unwrap();
        assert_eq!(rock.rotation_period, 1.0);
        assert!(!rock.has_rings);
        assert_eq!(rock.orbit, Some(OrbitDescriptor::Circular { radius: 100.0 }));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result = CelestialCatalog::from_ron_str("{{not valid}}");
        assert!(matches!(result, Err(CatalogError::ParseError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogs").join("sol.ron");
        let catalog = CelestialCatalog::solar_system();
        catalog.save(&path).unwrap();
        let loaded = CelestialCatalog::load(&path).unwrap();
        assert_eq!(catalog, loaded);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CelestialCatalog::load(&dir.path().join("nope.ron"));
        assert!(matches!(result, Err(CatalogError::ReadError(_))));
    }

    #[test]
    fn test_get_finds_moons() {
        let catalog = CelestialCatalog::solar_system();
        let moon = catalog.get("moon").unwrap();
        assert_eq!(moon.kind, BodyKind::Moon);
        assert!(catalog.get("vulcan").is_none());
    }

    #[test]
    fn test_body_count_includes_moons() {
        let catalog = CelestialCatalog::solar_system();
        assert_eq!(catalog.body_count(), catalog.len() + 1);
    }
}
