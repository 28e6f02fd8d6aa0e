//! Fixed lookup tables consulted while building pipelines.

use std::collections::HashMap;

use webproj_common::{AreaOfInterest, CrsId, Region};

/// Area of interest per region.
#[derive(Debug, Clone)]
pub struct AreaRegistry {
    areas: HashMap<Region, AreaOfInterest>,
}

impl AreaRegistry {
    pub const DENMARK: AreaOfInterest = AreaOfInterest::new(3.0, 54.5, 15.5, 58.0);
    pub const GREENLAND: AreaOfInterest = AreaOfInterest::new(-75.0, 59.0, -10.0, 84.0);

    pub fn empty() -> Self {
        Self {
            areas: HashMap::new(),
        }
    }

    /// Area used for `region`. Regions without an entry use the whole globe.
    pub fn get(&self, region: Region) -> AreaOfInterest {
        self.areas
            .get(&region)
            .copied()
            .unwrap_or_else(AreaOfInterest::world)
    }

    /// Set or replace the area for `region`.
    pub fn insert(&mut self, region: Region, area: AreaOfInterest) -> Option<AreaOfInterest> {
        self.areas.insert(region, area)
    }
}

impl Default for AreaRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.insert(Region::Dk, Self::DENMARK);
        registry.insert(Region::Gl, Self::GREENLAND);
        registry.insert(Region::Global, AreaOfInterest::world());
        registry
    }
}

/// Geographic hub CRS per non-native authority.
///
/// A pre-stage for a `DK:*` source yields ETRS89 geographic coordinates, so
/// the hub stage continues from `EPSG:4258` instead of the `DK` identifier.
/// Likewise a `DK:*` destination is reached through `EPSG:4258` before its
/// post-stage runs.
#[derive(Debug, Clone)]
pub struct AuthorityHubs {
    hubs: HashMap<String, CrsId>,
}

impl AuthorityHubs {
    pub fn empty() -> Self {
        Self {
            hubs: HashMap::new(),
        }
    }

    /// Hub CRS for `authority`, matched case-insensitively.
    pub fn get(&self, authority: &str) -> Option<&CrsId> {
        self.hubs.get(&authority.to_uppercase())
    }

    /// Hub CRS for a non-native identifier. Native identifiers never have one.
    pub fn hub_for(&self, id: &CrsId) -> Option<&CrsId> {
        if id.is_native() {
            None
        } else {
            self.get(id.authority())
        }
    }

    pub fn insert(&mut self, authority: &str, hub: CrsId) -> Option<CrsId> {
        self.hubs.insert(authority.to_uppercase(), hub)
    }
}

impl Default for AuthorityHubs {
    fn default() -> Self {
        let mut hubs = Self::empty();
        hubs.insert("DK", CrsId::new("EPSG:4258"));
        hubs.insert("GL", CrsId::new("EPSG:4747"));
        hubs
    }
}
