//! Common types shared across the webproj crates.

pub mod bbox;
pub mod catalog;
pub mod coord;
pub mod crs;
pub mod error;

pub use bbox::AreaOfInterest;
pub use catalog::{CatalogError, CrsCatalog, CrsInfo};
pub use coord::{Coordinate4, CoordinateParseError};
pub use crs::{CrsId, Region, NATIVE_AUTHORITY};
pub use error::{TransformError, TransformResult};
