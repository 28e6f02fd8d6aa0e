//! Pipeline composition for a (source, destination) CRS pair.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use webproj_common::{
    AreaOfInterest, Coordinate4, CrsCatalog, CrsId, Region, TransformError, TransformResult,
};

use crate::engine::{Engine, EngineError, Stage};
use crate::executor;
use crate::registry::{AreaRegistry, AuthorityHubs};

/// Position of a stage within a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Pre,
    Hub,
    Post,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Pre => "pre",
            StageKind::Hub => "hub",
            StageKind::Post => "post",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine pipeline turning native coordinates of a non-EPSG `src` into
/// geographic (lat, lon) degrees.
pub fn pre_stage_definition(src: &CrsId) -> String {
    format!(
        "+proj=pipeline +step +inv +init={src} \
         +step +proj=unitconvert +xy_in=rad +xy_out=deg \
         +step +proj=axisswap +order=2,1"
    )
}

/// Engine pipeline turning geographic (lat, lon) degrees into native
/// coordinates of a non-EPSG `dst`.
pub fn post_stage_definition(dst: &CrsId) -> String {
    format!(
        "+proj=pipeline +step +proj=axisswap +order=2,1 \
         +step +proj=unitconvert +xy_in=deg +xy_out=rad \
         +step +init={dst}"
    )
}

/// An immutable, at most three stage transformation.
pub struct Pipeline {
    src: CrsId,
    dst: CrsId,
    region: Region,
    area: AreaOfInterest,
    hub_pair: Option<(CrsId, CrsId)>,
    pre: Option<Box<dyn Stage>>,
    hub: Option<Box<dyn Stage>>,
    post: Option<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn src(&self) -> &CrsId {
        &self.src
    }

    pub fn dst(&self) -> &CrsId {
        &self.dst
    }

    /// Region whose area of interest was selected.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn area(&self) -> AreaOfInterest {
        self.area
    }

    /// The (source, target) the hub stage was built for, after hub
    /// substitution.
    pub fn hub_pair(&self) -> Option<(&CrsId, &CrsId)> {
        self.hub_pair.as_ref().map(|(s, d)| (s, d))
    }

    pub fn has_stage(&self, kind: StageKind) -> bool {
        self.stage(kind).is_some()
    }

    /// Whether the pipeline passes coordinates through untouched.
    pub fn is_identity(&self) -> bool {
        self.pre.is_none() && self.hub.is_none() && self.post.is_none()
    }

    /// Present stages in execution order.
    pub fn stages(&self) -> impl Iterator<Item = (StageKind, &dyn Stage)> + '_ {
        [StageKind::Pre, StageKind::Hub, StageKind::Post]
            .into_iter()
            .filter_map(move |kind| self.stage(kind).map(|stage| (kind, stage)))
    }

    /// Run a coordinate through the pipeline.
    pub fn transform(&self, coordinate: Coordinate4) -> TransformResult<Coordinate4> {
        executor::run(self, coordinate)
    }

    fn stage(&self, kind: StageKind) -> Option<&dyn Stage> {
        let slot = match kind {
            StageKind::Pre => &self.pre,
            StageKind::Hub => &self.hub,
            StageKind::Post => &self.post,
        };
        slot.as_deref()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("region", &self.region)
            .field("hub_pair", &self.hub_pair)
            .field("pre", &self.pre.is_some())
            .field("hub", &self.hub.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}

/// Decides which stages a CRS pair needs and asks the engine for them.
#[derive(Clone)]
pub struct PipelineBuilder {
    engine: Arc<dyn Engine>,
    catalog: Arc<CrsCatalog>,
    areas: AreaRegistry,
    hubs: AuthorityHubs,
}

impl PipelineBuilder {
    pub fn new(engine: Arc<dyn Engine>, catalog: Arc<CrsCatalog>) -> Self {
        Self {
            engine,
            catalog,
            areas: AreaRegistry::default(),
            hubs: AuthorityHubs::default(),
        }
    }

    pub fn with_areas(mut self, areas: AreaRegistry) -> Self {
        self.areas = areas;
        self
    }

    pub fn with_hubs(mut self, hubs: AuthorityHubs) -> Self {
        self.hubs = hubs;
        self
    }

    /// Check that both identifiers are catalogued and region-compatible.
    ///
    /// Returns the region whose area of interest applies.
    pub fn validate(&self, src: &CrsId, dst: &CrsId) -> TransformResult<Region> {
        let src_region = self.catalog.region(src)?;
        let dst_region = self.catalog.region(dst)?;

        src_region
            .shared_with(dst_region)
            .ok_or_else(|| TransformError::IncompatibleRegion {
                src: src.clone(),
                dst: dst.clone(),
            })
    }

    /// Build the pipeline for `src` -> `dst`.
    pub fn build(&self, src: &CrsId, dst: &CrsId) -> TransformResult<Pipeline> {
        let region = self.validate(src, dst)?;
        let area = self.areas.get(region);

        let src_native = src.is_native();
        let dst_native = dst.is_native();

        let mut hub_src = src.clone();
        let pre = if src_native {
            None
        } else {
            let stage = self
                .engine
                .from_pipeline(&pre_stage_definition(src))
                .map_err(|e| rejected(StageKind::Pre, src.to_string(), e))?;
            if let Some(hub) = self.hubs.hub_for(src) {
                hub_src = hub.clone();
            }
            Some(stage)
        };

        let mut hub_pair = None;
        let hub = if hub_src != *dst || src_native != dst_native {
            let hub_dst = self.hubs.hub_for(dst).unwrap_or(dst).clone();
            let stage = self
                .engine
                .from_crs_pair(&hub_src, &hub_dst, &area)
                .map_err(|e| rejected(StageKind::Hub, format!("{hub_src} -> {hub_dst}"), e))?;
            hub_pair = Some((hub_src, hub_dst));
            Some(stage)
        } else {
            None
        };

        let post = if dst_native {
            None
        } else {
            let stage = self
                .engine
                .from_pipeline(&post_stage_definition(dst))
                .map_err(|e| rejected(StageKind::Post, dst.to_string(), e))?;
            Some(stage)
        };

        let pipeline = Pipeline {
            src: src.clone(),
            dst: dst.clone(),
            region,
            area,
            hub_pair,
            pre,
            hub,
            post,
        };

        debug!(
            src = %pipeline.src,
            dst = %pipeline.dst,
            region = %region,
            pre = pipeline.pre.is_some(),
            hub = pipeline.hub.is_some(),
            post = pipeline.post.is_some(),
            "Built transformation pipeline"
        );

        Ok(pipeline)
    }
}

fn rejected(kind: StageKind, what: String, err: EngineError) -> TransformError {
    warn!(stage = %kind, crs = %what, error = %err, "Engine rejected CRS");
    TransformError::InvalidCrs(what)
}
