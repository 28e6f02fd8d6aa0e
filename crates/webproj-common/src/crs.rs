//! Coordinate Reference System identifiers and regions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authority the geodetic engine resolves natively.
///
/// Identifiers from any other authority need a pre- or post-stage before they
/// can take part in a direct CRS-to-CRS transformation.
pub const NATIVE_AUTHORITY: &str = "EPSG";

/// A normalized `AUTHORITY:CODE` identifier.
///
/// Accepts formats like:
/// - "EPSG:25832"
/// - "epsg:25832" (normalized to "EPSG:25832")
/// - "DK:S34J"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CrsId(String);

impl CrsId {
    /// Create an identifier, normalizing it to uppercase.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first `:`.
    pub fn authority(&self) -> &str {
        self.split().0
    }

    /// The part after the first `:`, empty when there is no separator.
    pub fn code(&self) -> &str {
        self.split().1
    }

    /// Whether the engine can use this identifier directly.
    pub fn is_native(&self) -> bool {
        self.authority() == NATIVE_AUTHORITY && !self.code().is_empty()
    }

    fn split(&self) -> (&str, &str) {
        self.0.split_once(':').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CrsId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CrsId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<CrsId> for String {
    fn from(id: CrsId) -> Self {
        id.0
    }
}

impl AsRef<str> for CrsId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Country or domain a CRS belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// Denmark
    #[serde(rename = "DK")]
    Dk,
    /// Greenland
    #[serde(rename = "GL")]
    Gl,
    /// Valid everywhere; compatible with every other region.
    Global,
}

impl Region {
    /// Region whose area of interest constrains a transformation between
    /// `self` and `other`, or `None` if the two are not compatible.
    ///
    /// Matching regions use their own area. A `Global` side defers to the
    /// other side's region.
    pub fn shared_with(self, other: Region) -> Option<Region> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Region::Global, b) => Some(b),
            (a, Region::Global) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Dk => "DK",
            Region::Gl => "GL",
            Region::Global => "Global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
