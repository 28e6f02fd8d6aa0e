//! Catalog of known CRS identifiers and their metadata.
//!
//! The catalog is a JSON object keyed by identifier:
//!
//! ```json
//! {
//!   "EPSG:25832": {"country": "DK", "title": "ETRS89 / UTM Zone 32 Nord", "v1": "Easting", ...}
//! }
//! ```
//!
//! Only `country` is interpreted; every other field is passed through
//! untouched to API clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::crs::{CrsId, Region};
use crate::error::TransformError;

const BUILTIN_CATALOG: &str = include_str!("../data/crs.json");

/// Metadata for a single CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsInfo {
    /// Region the CRS belongs to.
    pub country: Region,

    /// Display fields (title, axis names, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Read-only lookup table from identifier to metadata.
#[derive(Debug, Clone, Default)]
pub struct CrsCatalog {
    entries: BTreeMap<CrsId, CrsInfo>,
}

impl CrsCatalog {
    /// The catalog shipped with the service.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog document. Keys are normalized to uppercase.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, CrsInfo> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (id, info) in raw {
            let id = CrsId::new(id);
            if entries.insert(id.clone(), info).is_some() {
                return Err(CatalogError::Duplicate(id.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Load a catalog document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Look up an identifier in any letter case.
    pub fn lookup(&self, id: &str) -> Option<&CrsInfo> {
        self.entries.get(&CrsId::new(id))
    }

    pub fn get(&self, id: &CrsId) -> Option<&CrsInfo> {
        self.entries.get(id)
    }

    /// Region of a catalogued identifier, or `UnknownCrs`.
    pub fn region(&self, id: &CrsId) -> Result<Region, TransformError> {
        self.entries
            .get(id)
            .map(|info| info.country)
            .ok_or_else(|| TransformError::UnknownCrs(id.to_string()))
    }

    /// All entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&CrsId, &CrsInfo)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers grouped by region.
    pub fn index_by_region(&self) -> BTreeMap<Region, Vec<&CrsId>> {
        let mut index: BTreeMap<Region, Vec<&CrsId>> = BTreeMap::new();
        for (id, info) in &self.entries {
            index.entry(info.country).or_default().push(id);
        }
        index
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate catalog entry: {0}")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = CrsCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.lookup("EPSG:25832").unwrap().country, Region::Dk);
        assert_eq!(catalog.lookup("dk:s34j").unwrap().country, Region::Dk);
        assert_eq!(catalog.lookup("EPSG:4326").unwrap().country, Region::Global);
        assert_eq!(catalog.lookup("EPSG:4747").unwrap().country, Region::Gl);
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let json = r#"{"XX:1": {"country": "Atlantis"}}"#;
        assert!(matches!(
            CrsCatalog::from_json_str(json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_keys_are_normalized() {
        let json = r#"{"epsg:4326": {"country": "Global"}, "EPSG:4326": {"country": "Global"}}"#;
        assert!(matches!(
            CrsCatalog::from_json_str(json),
            Err(CatalogError::Duplicate(_))
        ));
    }

    #[test]
    fn test_region_of_unknown() {
        let catalog = CrsCatalog::builtin().unwrap();
        let err = catalog.region(&CrsId::new("EPSG:0")).unwrap_err();
        assert_eq!(err, TransformError::UnknownCrs("EPSG:0".to_string()));
    }
}
