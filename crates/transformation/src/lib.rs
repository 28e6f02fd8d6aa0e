//! Coordinate reference system transformation pipelines.
//!
//! A transformation between two catalogued CRS's is composed of up to three
//! stages, each a handle to the geodetic engine:
//!
//! - **pre**: turns a non-EPSG source into geographic coordinates
//! - **hub**: a direct CRS-to-CRS transformation constrained to an area of interest
//! - **post**: turns geographic coordinates into a non-EPSG destination
//!
//! [`PipelineBuilder`] decides which stages a pair needs, [`TransformerCache`]
//! keeps one pipeline per pair for the lifetime of the process and
//! [`executor::run`] pushes a coordinate through it.

pub mod cache;
pub mod engine;
pub mod executor;
pub mod pipeline;
#[cfg(feature = "proj")]
pub mod proj;
pub mod registry;

pub use cache::{CacheStats, TransformerCache};
pub use engine::{Engine, EngineError, Stage};
pub use pipeline::{Pipeline, PipelineBuilder, StageKind};
#[cfg(feature = "proj")]
pub use proj::ProjEngine;
pub use registry::{AreaRegistry, AuthorityHubs};
