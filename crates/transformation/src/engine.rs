//! Boundary to the geodetic transformation engine.

use thiserror::Error;
use webproj_common::{AreaOfInterest, CrsId};

/// One composable unit of a transformation pipeline.
///
/// `transform` is pure. It receives 2 to 4 components and returns as many
/// components as it was given; a component the input lies outside the
/// domain for comes back as positive or negative infinity.
pub trait Stage: Send + Sync {
    fn transform(&self, components: &[f64]) -> Vec<f64>;
}

/// Factory for stages.
pub trait Engine: Send + Sync {
    /// Build a stage from a textual chain of primitive operations, e.g.
    /// `+proj=pipeline +step +inv +init=DK:S34J +step ...`.
    fn from_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError>;

    /// Build a direct transformation between two CRS's, picking the operation
    /// best suited to `area`.
    fn from_crs_pair(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: &AreaOfInterest,
    ) -> Result<Box<dyn Stage>, EngineError>;
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("A nul byte was found in the definition or CRS argument: {0}")]
    ArgumentNul(#[from] std::ffi::NulError),

    #[error("The engine could not create the operation: {0}")]
    Create(String),

    #[error("The engine could not be initialized: {0}")]
    Init(String),
}
