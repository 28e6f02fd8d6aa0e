//! Error types for CRS transformations.

use thiserror::Error;

use crate::crs::CrsId;

/// Result type alias using TransformError.
pub type TransformResult<T> = Result<T, TransformError>;

/// Reasons a transformation request cannot be served.
///
/// Every variant is terminal for the request that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// Identifier absent from the catalog.
    #[error("'{0}' not available")]
    UnknownCrs(String),

    /// Both identifiers exist but belong to disjoint, non-global regions.
    #[error("CRS's are not compatible across countries")]
    IncompatibleRegion { src: CrsId, dst: CrsId },

    /// The engine rejected an identifier the catalog accepted. The payload
    /// names what was rejected and is kept out of the client message.
    #[error("Invalid CRS identifier")]
    InvalidCrs(String),

    /// The result lies outside the validity area of one of the CRS's.
    #[error("Input coordinate outside area of use in either source or destination CRS")]
    OutOfDomain,

    /// The engine broke its output contract.
    #[error("Transformation engine error: {0}")]
    Engine(String),
}

impl TransformError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            TransformError::UnknownCrs(_) => 404,
            TransformError::IncompatibleRegion { .. } => 404,
            TransformError::InvalidCrs(_) => 404,
            TransformError::OutOfDomain => 404,
            TransformError::Engine(_) => 500,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::UnknownCrs(_) => "unknown_crs",
            TransformError::IncompatibleRegion { .. } => "incompatible_region",
            TransformError::InvalidCrs(_) => "invalid_crs",
            TransformError::OutOfDomain => "out_of_domain",
            TransformError::Engine(_) => "engine",
        }
    }
}
