//! Shared test utilities for the webproj workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A small CRS catalog fixture
//! - A deterministic stub engine that records what it was asked to build
//! - A skip macro for tests that need a working PROJ installation
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixture_catalog, StubEngine};
//! ```

pub mod fixtures;
pub mod stub;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use stub::*;

use transformation::{Engine, EngineError};
use webproj_common::{AreaOfInterest, CrsId};

/// Check that an engine can resolve a well-known EPSG pair.
///
/// Fails when the engine's database is missing or unreadable.
pub fn check_engine(engine: &dyn Engine) -> Result<(), EngineError> {
    engine
        .from_crs_pair(
            &CrsId::new("EPSG:4326"),
            &CrsId::new("EPSG:3857"),
            &AreaOfInterest::world(),
        )
        .map(|_| ())
}

/// Macro to skip a test if the engine cannot resolve EPSG identifiers.
///
/// This is useful for tests that depend on PROJ's database, which may not be
/// present in all environments.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_engine;
///
/// #[test]
/// fn test_utm_to_wgs84() {
///     let engine = ProjEngine::new();
///     require_engine!(engine);
///     // Test code using engine...
/// }
/// ```
///
/// If the check fails, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_engine {
    ($engine:expr) => {{
        if let Err(e) = $crate::check_engine(&$engine) {
            eprintln!("SKIPPED: transformation engine unavailable: {}", e);
            return;
        }
    }};
}
