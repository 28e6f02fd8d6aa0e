//! Process-wide cache of built pipelines.
//!
//! ## Structure
//! Pipelines are stored in a two-level map: source identifier -> destination
//! identifier -> pipeline. Keys are the normalized (uppercase) identifiers.
//!
//! ## Lifetime
//! Entries are created on first use and never evicted or replaced. A pipeline
//! handed out for a pair is the same `Arc` for every later call.
//!
//! ## Concurrency
//! A pair is built while its slot in the inner map is locked, so concurrent
//! first requests for the same pair wait for a single build. Failed builds
//! leave no entry behind.
//!
//! The slot lock is the write lock of the inner map shard holding it. Until a
//! build finishes, lookups of other destinations of the same source that hash
//! to that shard block as well, on whatever thread they run. Builds are
//! synchronous engine calls; callers on an async runtime wait for them on a
//! worker thread.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use webproj_common::{Coordinate4, CrsId, TransformResult};

use crate::executor;
use crate::pipeline::{Pipeline, PipelineBuilder};

type PipelinesByDst = DashMap<CrsId, Arc<Pipeline>>;

/// Statistics for the transformer cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: AtomicU64,
    /// Lookups that triggered a build.
    pub misses: AtomicU64,
    /// Builds that failed.
    pub build_failures: AtomicU64,
    /// Pipelines currently stored.
    pub entries: AtomicU64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// Memoizes [`PipelineBuilder::build`] per (src, dst) pair.
pub struct TransformerCache {
    builder: PipelineBuilder,
    pipelines: DashMap<CrsId, Arc<PipelinesByDst>>,
    stats: CacheStats,
}

impl TransformerCache {
    pub fn new(builder: PipelineBuilder) -> Self {
        Self {
            builder,
            pipelines: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Return the pipeline for `src` -> `dst`, building it on first use.
    pub fn get_or_build(&self, src: &str, dst: &str) -> TransformResult<Arc<Pipeline>> {
        let src = CrsId::new(src);
        let dst = CrsId::new(dst);

        if let Some(pipeline) = self.lookup(&src, &dst) {
            self.record_hit();
            return Ok(pipeline);
        }

        // Reject unknown or incompatible pairs before they get a slot.
        self.builder.validate(&src, &dst)?;

        let by_dst = self.pipelines.entry(src.clone()).or_default().value().clone();
        let pipeline = match by_dst.entry(dst.clone()) {
            Entry::Occupied(entry) => {
                self.record_hit();
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                counter!("webproj_pipeline_cache_misses_total").increment(1);

                let pipeline = match self.builder.build(&src, &dst) {
                    Ok(pipeline) => Arc::new(pipeline),
                    Err(e) => {
                        self.stats.build_failures.fetch_add(1, Ordering::Relaxed);
                        counter!("webproj_pipeline_cache_build_failures_total").increment(1);
                        return Err(e);
                    }
                };
                entry.insert(Arc::clone(&pipeline));

                let entries = self.stats.entries.fetch_add(1, Ordering::Relaxed) + 1;
                gauge!("webproj_pipeline_cache_entries").set(entries as f64);
                pipeline
            }
        };

        Ok(pipeline)
    }

    /// Transform a coordinate between two identifiers.
    pub fn transform(
        &self,
        src: &str,
        dst: &str,
        coordinate: Coordinate4,
    ) -> TransformResult<Coordinate4> {
        let pipeline = self.get_or_build(src, dst)?;
        executor::run(&pipeline, coordinate)
    }

    /// Build pipelines ahead of the first request.
    ///
    /// Returns the number of pairs that are available afterwards. Failures
    /// are logged and skipped.
    pub fn prewarm<'a, I>(&self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ready = 0;
        for (src, dst) in pairs {
            match self.get_or_build(src, dst) {
                Ok(_) => ready += 1,
                Err(e) => {
                    tracing::warn!(src = src, dst = dst, error = %e, "Failed to prewarm pipeline")
                }
            }
        }
        info!(ready = ready, "Transformer cache prewarmed");
        ready
    }

    /// Number of cached pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.iter().map(|by_dst| by_dst.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn lookup(&self, src: &CrsId, dst: &CrsId) -> Option<Arc<Pipeline>> {
        let by_dst = Arc::clone(self.pipelines.get(src)?.value());
        let pipeline = by_dst.get(dst)?;
        Some(Arc::clone(pipeline.value()))
    }

    fn record_hit(&self) {
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        counter!("webproj_pipeline_cache_hits_total").increment(1);
    }
}
