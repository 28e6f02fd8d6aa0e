//! Tests for pipeline composition.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use test_utils::{fixture_catalog, EngineCall, StubEngine};
use transformation::{AreaRegistry, AuthorityHubs, PipelineBuilder, StageKind};
use webproj_common::{AreaOfInterest, Coordinate4, CrsId, Region, TransformError};

fn builder() -> (Arc<StubEngine>, PipelineBuilder) {
    let engine = Arc::new(StubEngine::new());
    let builder = PipelineBuilder::new(engine.clone(), fixture_catalog());
    (engine, builder)
}

fn id(s: &str) -> CrsId {
    CrsId::new(s)
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_unknown_source() {
    let (engine, builder) = builder();
    let err = builder.build(&id("EPSG:1"), &id("EPSG:4326")).unwrap_err();
    assert_eq!(err, TransformError::UnknownCrs("EPSG:1".to_string()));
    assert_eq!(err.to_string(), "'EPSG:1' not available");
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_unknown_destination() {
    let (_, builder) = builder();
    let err = builder.build(&id("EPSG:4326"), &id("dk:nowhere")).unwrap_err();
    assert_eq!(err, TransformError::UnknownCrs("DK:NOWHERE".to_string()));
}

#[test]
fn test_incompatible_regions() {
    let (engine, builder) = builder();
    let err = builder.build(&id("DK:S34J"), &id("EPSG:3184")).unwrap_err();
    assert!(matches!(err, TransformError::IncompatibleRegion { .. }));
    assert_eq!(err.to_string(), "CRS's are not compatible across countries");
    assert_eq!(err.status_code(), 404);
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_validate_picks_non_global_region() {
    let (_, builder) = builder();
    assert_eq!(builder.validate(&id("EPSG:4326"), &id("DK:S34J")).unwrap(), Region::Dk);
    assert_eq!(builder.validate(&id("EPSG:3184"), &id("EPSG:4326")).unwrap(), Region::Gl);
    assert_eq!(
        builder.validate(&id("EPSG:4326"), &id("EPSG:3857")).unwrap(),
        Region::Global
    );
}

// ============================================================================
// Stage selection
// ============================================================================

#[test]
fn test_native_identity_has_no_stages() {
    let (engine, builder) = builder();
    let pipeline = builder.build(&id("EPSG:4258"), &id("EPSG:4258")).unwrap();
    assert!(pipeline.is_identity());
    assert_eq!(pipeline.stages().count(), 0);
    assert_eq!(pipeline.hub_pair(), None);
    assert_eq!(engine.call_count(), 0);
}

#[test]
fn test_native_pair_uses_hub_only() {
    let (engine, builder) = builder();
    let pipeline = builder.build(&id("EPSG:4258"), &id("EPSG:25832")).unwrap();
    assert!(!pipeline.has_stage(StageKind::Pre));
    assert!(pipeline.has_stage(StageKind::Hub));
    assert!(!pipeline.has_stage(StageKind::Post));
    assert_eq!(
        engine.calls(),
        vec![EngineCall::CrsPair {
            src: "EPSG:4258".to_string(),
            dst: "EPSG:25832".to_string(),
            area: AreaRegistry::DENMARK,
        }]
    );
}

#[test]
fn test_non_native_source_substitutes_hub() {
    let (engine, builder) = builder();
    let pipeline = builder.build(&id("DK:S34J"), &id("EPSG:4326")).unwrap();

    assert!(pipeline.has_stage(StageKind::Pre));
    assert!(pipeline.has_stage(StageKind::Hub));
    assert!(!pipeline.has_stage(StageKind::Post));
    assert_eq!(pipeline.region(), Region::Dk);
    assert_eq!(pipeline.area(), AreaRegistry::DENMARK);
    assert_eq!(
        pipeline.hub_pair(),
        Some((&id("EPSG:4258"), &id("EPSG:4326")))
    );
    assert_eq!(
        engine.pipeline_calls(),
        vec!["+proj=pipeline +step +inv +init=DK:S34J \
              +step +proj=unitconvert +xy_in=rad +xy_out=deg \
              +step +proj=axisswap +order=2,1"
            .to_string()]
    );
}

#[test]
fn test_non_native_destination_reached_through_hub() {
    let (engine, builder) = builder();
    let pipeline = builder.build(&id("EPSG:25832"), &id("DK:S34J")).unwrap();

    let kinds: Vec<StageKind> = pipeline.stages().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, vec![StageKind::Hub, StageKind::Post]);
    assert_eq!(
        pipeline.hub_pair(),
        Some((&id("EPSG:25832"), &id("EPSG:4258")))
    );
    assert_eq!(
        engine.crs_pair_calls(),
        vec![("EPSG:25832".to_string(), "EPSG:4258".to_string())]
    );
}

#[test]
fn test_non_native_to_non_native_uses_all_stages() {
    let (_, builder) = builder();
    let pipeline = builder.build(&id("DK:S34J"), &id("DK:KP2000J")).unwrap();
    let kinds: Vec<StageKind> = pipeline.stages().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, vec![StageKind::Pre, StageKind::Hub, StageKind::Post]);
    assert_eq!(
        pipeline.hub_pair(),
        Some((&id("EPSG:4258"), &id("EPSG:4258")))
    );
}

#[test]
fn test_hub_kept_when_native_flags_differ() {
    // The substituted hub equals the destination, but the source still needs
    // its pre-stage output carried across.
    let (_, builder) = builder();
    let pipeline = builder.build(&id("DK:S34J"), &id("EPSG:4258")).unwrap();
    assert!(pipeline.has_stage(StageKind::Pre));
    assert!(pipeline.has_stage(StageKind::Hub));
}

#[test]
fn test_greenland_hub() {
    let (_, builder) = builder();
    let pipeline = builder.build(&id("GL:LOCAL"), &id("EPSG:3184")).unwrap();
    assert_eq!(pipeline.area(), AreaRegistry::GREENLAND);
    assert_eq!(
        pipeline.hub_pair(),
        Some((&id("EPSG:4747"), &id("EPSG:3184")))
    );
}

#[test]
fn test_authority_without_hub_keeps_identifier() {
    let (_, builder) = builder();
    let builder = builder.with_hubs(AuthorityHubs::empty());
    let pipeline = builder.build(&id("GL:LOCAL"), &id("EPSG:3184")).unwrap();
    assert_eq!(
        pipeline.hub_pair(),
        Some((&id("GL:LOCAL"), &id("EPSG:3184")))
    );
}

#[test]
fn test_global_pair_uses_world_area() {
    let (engine, builder) = builder();
    builder.build(&id("EPSG:4326"), &id("EPSG:3857")).unwrap();
    match &engine.calls()[..] {
        [EngineCall::CrsPair { area, .. }] => assert_eq!(*area, AreaOfInterest::world()),
        calls => panic!("unexpected engine calls: {calls:?}"),
    }
}

#[test]
fn test_custom_area_registry() {
    let (engine, builder) = builder();
    let bornholm = AreaOfInterest::new(14.6, 54.9, 15.2, 55.3);
    let mut areas = AreaRegistry::default();
    areas.insert(Region::Dk, bornholm);

    let pipeline = builder
        .with_areas(areas)
        .build(&id("EPSG:4258"), &id("EPSG:25833"))
        .unwrap();
    assert_eq!(pipeline.area(), bornholm);
    assert!(matches!(
        &engine.calls()[..],
        [EngineCall::CrsPair { area, .. }] if *area == bornholm
    ));
}

// ============================================================================
// Engine rejections
// ============================================================================

#[test]
fn test_engine_rejects_native_identifier() {
    let (_, builder) = builder();
    let err = builder.build(&id("EPSG:999999"), &id("EPSG:4326")).unwrap_err();
    assert_eq!(
        err,
        TransformError::InvalidCrs("EPSG:999999 -> EPSG:4326".to_string())
    );
    assert_eq!(err.to_string(), "Invalid CRS identifier");
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_engine_rejects_pre_stage() {
    let (engine, builder) = builder();
    let err = builder.build(&id("DK:BROKEN"), &id("EPSG:25832")).unwrap_err();
    assert_eq!(err, TransformError::InvalidCrs("DK:BROKEN".to_string()));
    // Nothing after the failing stage is requested.
    assert!(engine.crs_pair_calls().is_empty());
}

#[test]
fn test_engine_rejects_post_stage() {
    let (engine, builder) = builder();
    let err = builder.build(&id("EPSG:25832"), &id("DK:BROKEN")).unwrap_err();
    assert_eq!(err, TransformError::InvalidCrs("DK:BROKEN".to_string()));
    assert_eq!(engine.crs_pair_calls().len(), 1);
    assert_eq!(engine.pipeline_calls().len(), 1);
}

// ============================================================================
// Transformation
// ============================================================================

#[test]
fn test_non_native_round_trip() {
    let (_, builder) = builder();
    let forward = builder.build(&id("DK:S34J"), &id("EPSG:25832")).unwrap();
    let inverse = builder.build(&id("EPSG:25832"), &id("DK:S34J")).unwrap();

    let utm = forward
        .transform(Coordinate4::new_2d(200_000.0, 6_216_000.0))
        .unwrap();
    assert_abs_diff_eq!(utm.v1, 611_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(utm.v2, 6_216_000.0, epsilon = 1e-6);

    let back = inverse.transform(utm).unwrap();
    assert_abs_diff_eq!(back.v1, 200_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(back.v2, 6_216_000.0, epsilon = 1e-6);
}

#[test]
fn test_between_non_native_systems() {
    let (_, builder) = builder();
    let pipeline = builder.build(&id("DK:S34J"), &id("DK:KP2000J")).unwrap();
    let out = pipeline
        .transform(Coordinate4::new_2d(200_000.0, 6_216_000.0))
        .unwrap();
    assert_abs_diff_eq!(out.v1, 255_500.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out.v2, 6_216_000.0, epsilon = 1e-6);
}

#[test]
fn test_pipeline_debug_lists_stages() {
    let (_, builder) = builder();
    let pipeline = builder.build(&id("DK:S34J"), &id("EPSG:4326")).unwrap();
    let debug = format!("{pipeline:?}");
    assert!(debug.contains("DK:S34J"));
    assert!(debug.contains("pre: true"));
    assert!(debug.contains("post: false"));
}
