//! Application state for the webproj API.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use transformation::{Engine, PipelineBuilder, TransformerCache};
use webproj_common::CrsCatalog;

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    /// CRS metadata served by `/crs/` and consulted by every transformation.
    pub catalog: Arc<CrsCatalog>,

    /// One pipeline per (src, dst) pair for the lifetime of the process.
    pub transformers: TransformerCache,

    /// Renders the recorded metrics.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn Engine>,
        catalog: Arc<CrsCatalog>,
        config: &ServiceConfig,
        prometheus: PrometheusHandle,
    ) -> Self {
        let builder = PipelineBuilder::new(engine, Arc::clone(&catalog))
            .with_areas(config.area_registry())
            .with_hubs(config.authority_hubs());

        Self {
            catalog,
            transformers: TransformerCache::new(builder),
            prometheus,
        }
    }

    /// Build the configured prewarm pairs. Returns how many are cached.
    pub fn prewarm(&self, config: &ServiceConfig) -> usize {
        if config.prewarm.is_empty() {
            return 0;
        }
        self.transformers.prewarm(config.prewarm_pairs())
    }
}
