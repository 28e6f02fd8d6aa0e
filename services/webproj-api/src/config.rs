//! Service configuration loaded from YAML.
//!
//! ```yaml
//! areas:
//!   DK: { west: 3.0, south: 54.5, east: 15.5, north: 58.0 }
//! authority_hubs:
//!   FO: "EPSG:4258"
//! prewarm:
//!   - { src: "EPSG:25832", dst: "EPSG:4326" }
//! ```
//!
//! Every section is optional and extends the built-in defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use transformation::{AreaRegistry, AuthorityHubs};
use webproj_common::{AreaOfInterest, CrsId, Region};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Area of interest overrides per region.
    pub areas: HashMap<Region, AreaOfInterest>,

    /// Additional or replacement hub CRS's per non-native authority.
    pub authority_hubs: HashMap<String, CrsId>,

    /// Pairs to build before the server starts accepting requests.
    pub prewarm: Vec<PrewarmPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrewarmPair {
    pub src: String,
    pub dst: String,
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Service config {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse service config: {:?}", path))?;

        tracing::info!(
            areas = config.areas.len(),
            authority_hubs = config.authority_hubs.len(),
            prewarm = config.prewarm.len(),
            "Loaded service config from {:?}",
            path
        );
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (region, area) in &self.areas {
            if !area.is_valid() {
                bail!("Invalid area of interest for {}: {:?}", region, area);
            }
        }
        for (authority, hub) in &self.authority_hubs {
            if !hub.is_native() {
                bail!("Hub for {} must be an EPSG identifier, got {}", authority, hub);
            }
        }
        Ok(())
    }

    /// Built-in areas with the configured overrides applied.
    pub fn area_registry(&self) -> AreaRegistry {
        let mut registry = AreaRegistry::default();
        for (region, area) in &self.areas {
            registry.insert(*region, *area);
        }
        registry
    }

    /// Built-in hubs with the configured additions applied.
    pub fn authority_hubs(&self) -> AuthorityHubs {
        let mut hubs = AuthorityHubs::default();
        for (authority, hub) in &self.authority_hubs {
            hubs.insert(authority, hub.clone());
        }
        hubs
    }

    pub fn prewarm_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prewarm
            .iter()
            .map(|pair| (pair.src.as_str(), pair.dst.as_str()))
    }
}
