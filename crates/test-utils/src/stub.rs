//! Deterministic stand-in for the geodetic engine.
//!
//! Every known system is either geographic, with coordinates in (lat, lon)
//! degrees, or a flat grid:
//!
//! ```text
//! x = false_easting + (lon - central_meridian) * METRES_PER_DEGREE
//! y = lat * METRES_PER_DEGREE
//! ```
//!
//! Grid coordinates more than [`GRID_HALF_WIDTH`] from the false easting, or
//! with a negative northing, are out of domain and map to infinity, as a real
//! engine does. Components after the first two pass through unchanged.
//!
//! Pipeline definitions are matched on their `+init=<ID>` step only: a
//! definition with `+inv +init=<ID>` converts grid `<ID>` to geographic, one
//! with a plain `+init=<ID>` converts geographic to grid `<ID>`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use transformation::{Engine, EngineError, Stage};
use webproj_common::{AreaOfInterest, CrsId};

pub const METRES_PER_DEGREE: f64 = 111_000.0;
pub const GRID_HALF_WIDTH: f64 = 400_000.0;

/// Coordinate system known to the stub engine.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StubSystem {
    /// (lat, lon) in degrees.
    Geographic,
    /// Flat grid in metres.
    Grid {
        central_meridian: f64,
        false_easting: f64,
    },
}

impl StubSystem {
    fn to_geographic(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            StubSystem::Geographic => {
                if (-90.0..=90.0).contains(&x) && (-180.0..=180.0).contains(&y) {
                    (x, y)
                } else {
                    (f64::INFINITY, f64::INFINITY)
                }
            }
            StubSystem::Grid {
                central_meridian,
                false_easting,
            } => {
                let offset = x - false_easting;
                if offset.abs() > GRID_HALF_WIDTH || !(0.0..=90.0 * METRES_PER_DEGREE).contains(&y) {
                    return (f64::INFINITY, f64::INFINITY);
                }
                (y / METRES_PER_DEGREE, central_meridian + offset / METRES_PER_DEGREE)
            }
        }
    }

    fn from_geographic(self, lat: f64, lon: f64) -> (f64, f64) {
        if !lat.is_finite() || !lon.is_finite() {
            return (f64::INFINITY, f64::INFINITY);
        }
        match self {
            StubSystem::Geographic => (lat, lon),
            StubSystem::Grid {
                central_meridian,
                false_easting,
            } => (
                false_easting + (lon - central_meridian) * METRES_PER_DEGREE,
                lat * METRES_PER_DEGREE,
            ),
        }
    }
}

/// A stage request the stub engine received.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Pipeline(String),
    CrsPair {
        src: String,
        dst: String,
        area: AreaOfInterest,
    },
}

/// Engine over a table of [`StubSystem`]s that records every request.
pub struct StubEngine {
    systems: HashMap<String, StubSystem>,
    calls: Mutex<Vec<EngineCall>>,
}

impl StubEngine {
    /// Engine knowing every resolvable entry of the fixture catalog.
    pub fn new() -> Self {
        let grid = |central_meridian: f64, false_easting: f64| StubSystem::Grid {
            central_meridian,
            false_easting,
        };

        let systems = [
            ("EPSG:4326", StubSystem::Geographic),
            ("EPSG:4258", StubSystem::Geographic),
            ("EPSG:4747", StubSystem::Geographic),
            ("EPSG:3857", grid(0.0, 500_000.0)),
            ("EPSG:25832", grid(9.0, 500_000.0)),
            ("EPSG:25833", grid(15.0, 500_000.0)),
            ("EPSG:3184", grid(-39.0, 500_000.0)),
            ("DK:S34J", grid(10.0, 200_000.0)),
            ("DK:KP2000J", grid(9.5, 200_000.0)),
            ("GL:LOCAL", grid(-51.0, 300_000.0)),
        ]
        .into_iter()
        .map(|(id, system)| (id.to_string(), system))
        .collect();

        Self {
            systems,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Pipeline definitions received so far.
    pub fn pipeline_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Pipeline(definition) => Some(definition),
                EngineCall::CrsPair { .. } => None,
            })
            .collect()
    }

    /// (src, dst) pairs received so far.
    pub fn crs_pair_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::CrsPair { src, dst, .. } => Some((src, dst)),
                EngineCall::Pipeline(_) => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }

    fn system(&self, id: &str) -> Result<StubSystem, EngineError> {
        self.systems
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::Create(format!("crs not found: {id}")))
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for StubEngine {
    fn from_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError> {
        self.record(EngineCall::Pipeline(definition.to_string()));

        let id = definition
            .split_whitespace()
            .find_map(|token| token.strip_prefix("+init="))
            .ok_or_else(|| EngineError::Create(format!("no +init step in: {definition}")))?;
        let system = self.system(id)?;

        if definition.contains("+inv +init=") {
            Ok(Box::new(StubStage {
                from: system,
                to: StubSystem::Geographic,
            }))
        } else {
            Ok(Box::new(StubStage {
                from: StubSystem::Geographic,
                to: system,
            }))
        }
    }

    fn from_crs_pair(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: &AreaOfInterest,
    ) -> Result<Box<dyn Stage>, EngineError> {
        self.record(EngineCall::CrsPair {
            src: src.to_string(),
            dst: dst.to_string(),
            area: *area,
        });

        Ok(Box::new(StubStage {
            from: self.system(src.as_str())?,
            to: self.system(dst.as_str())?,
        }))
    }
}

struct StubStage {
    from: StubSystem,
    to: StubSystem,
}

impl Stage for StubStage {
    fn transform(&self, components: &[f64]) -> Vec<f64> {
        let (lat, lon) = self.from.to_geographic(components[0], components[1]);
        let (v1, v2) = self.to.from_geographic(lat, lon);

        let mut out = vec![v1, v2];
        out.extend_from_slice(&components[2..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_round_trip() {
        let grid = StubSystem::Grid {
            central_meridian: 9.0,
            false_easting: 500_000.0,
        };
        let (x, y) = grid.from_geographic(56.0, 10.0);
        assert_eq!(x, 611_000.0);
        let (lat, lon) = grid.to_geographic(x, y);
        assert!((lat - 56.0).abs() < 1e-9);
        assert!((lon - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_out_of_domain() {
        let grid = StubSystem::Grid {
            central_meridian: 9.0,
            false_easting: 500_000.0,
        };
        let (lat, lon) = grid.to_geographic(0.0, 0.0);
        assert!(lat.is_infinite() && lon.is_infinite());
    }

    #[test]
    fn test_pipeline_direction() {
        let engine = StubEngine::new();
        let pre = engine
            .from_pipeline("+proj=pipeline +step +inv +init=DK:S34J +step +proj=axisswap +order=2,1")
            .unwrap();
        let geo = pre.transform(&[200_000.0, 6_216_000.0]);
        assert!((geo[0] - 56.0).abs() < 1e-9);
        assert!((geo[1] - 10.0).abs() < 1e-9);

        let post = engine
            .from_pipeline("+proj=pipeline +step +proj=axisswap +order=2,1 +step +init=DK:S34J")
            .unwrap();
        let grid = post.transform(&geo);
        assert!((grid[0] - 200_000.0).abs() < 1e-6);
        assert!((grid[1] - 6_216_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_system_is_rejected() {
        let engine = StubEngine::new();
        assert!(engine.from_pipeline("+proj=pipeline +step +inv +init=DK:NOPE").is_err());
        assert!(engine
            .from_crs_pair(
                &CrsId::new("EPSG:999999"),
                &CrsId::new("EPSG:4326"),
                &AreaOfInterest::world()
            )
            .is_err());
        assert_eq!(engine.call_count(), 2);
    }

    #[test]
    fn test_extra_components_pass_through() {
        let engine = StubEngine::new();
        let stage = engine
            .from_crs_pair(
                &CrsId::new("EPSG:4258"),
                &CrsId::new("EPSG:25832"),
                &AreaOfInterest::world(),
            )
            .unwrap();
        let out = stage.transform(&[56.0, 9.0, 30.0, 2010.5]);
        assert_eq!(out, vec![500_000.0, 56.0 * METRES_PER_DEGREE, 30.0, 2010.5]);
    }
}
