//! Common test fixtures for webproj tests.
//!
//! The fixture catalog mirrors the shape of the built-in catalog but is small
//! enough to reason about, and includes entries the stub engine deliberately
//! cannot resolve.

use std::sync::Arc;

use webproj_common::CrsCatalog;

/// Catalog document used by [`fixture_catalog`].
pub const FIXTURE_CATALOG_JSON: &str = r#"{
    "EPSG:4258":   {"country": "DK",     "title": "ETRS89 Geografisk", "v1": "Latitude", "v2": "Longitude"},
    "EPSG:25832":  {"country": "DK",     "title": "ETRS89 / UTM Zone 32 Nord", "v1": "Easting", "v2": "Northing"},
    "EPSG:25833":  {"country": "DK",     "title": "ETRS89 / UTM Zone 33 Nord", "v1": "Easting", "v2": "Northing"},
    "DK:S34J":     {"country": "DK",     "title": "System 34, Jylland"},
    "DK:KP2000J":  {"country": "DK",     "title": "KP2000, Jylland"},
    "DK:BROKEN":   {"country": "DK",     "title": "Catalogued, unknown to the engine"},
    "EPSG:999999": {"country": "DK",     "title": "Catalogued, unknown to the engine"},
    "EPSG:4747":   {"country": "GL",     "title": "GR96 Geografisk"},
    "EPSG:3184":   {"country": "GL",     "title": "GR96 / UTM Zone 24 Nord"},
    "GL:LOCAL":    {"country": "GL",     "title": "Greenland local grid"},
    "EPSG:4326":   {"country": "Global", "title": "WGS 84 Geografisk"},
    "EPSG:3857":   {"country": "Global", "title": "WGS 84 / Pseudo-Mercator"}
}"#;

/// Small catalog covering every region and both identifier kinds.
pub fn fixture_catalog() -> Arc<CrsCatalog> {
    Arc::new(CrsCatalog::from_json_str(FIXTURE_CATALOG_JSON).expect("fixture catalog is valid"))
}

/// Well-known coordinates for testing.
pub mod points {
    /// Copenhagen as ETRS89 (lat, lon).
    pub const COPENHAGEN: (f64, f64) = (55.68, 12.57);

    /// Aarhus as ETRS89 (lat, lon).
    pub const AARHUS: (f64, f64) = (56.15, 10.21);

    /// Nuuk as GR96 (lat, lon).
    pub const NUUK: (f64, f64) = (64.18, -51.72);

    /// Projected origin, outside every UTM zone's valid easting range.
    pub const ORIGIN: (f64, f64) = (0.0, 0.0);
}
