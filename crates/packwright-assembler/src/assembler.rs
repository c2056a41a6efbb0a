//! Package assembler
//!
//! Shared, read-only entry point that hands out independent assembly runs.
//! The catalog and renderer are shared between runs; every run owns its own
//! sink and state.

use crate::artifact::PackageArtifact;
use crate::failure::AssemblyFailure;
use crate::progress::Progress;
use crate::run::{AssemblyRun, StepOutcome};
use packwright_archive::{ArchiveBuilder, ArchiveOptions, ArchiveSink};
use packwright_core::{Catalog, Clock, CustomerContext, PackwrightConfig, SelectionSet, SystemClock};
use packwright_templates::TemplateRenderer;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Entry point for generating deployment packages
pub struct PackageAssembler {
    renderer: Arc<TemplateRenderer>,
    clock: Arc<dyn Clock>,
    compression_level: u32,
    last_stamp: AtomicI64,
}

impl PackageAssembler {
    /// Create an assembler with the wall clock
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            clock: Arc::new(SystemClock),
            compression_level: packwright_archive::DEFAULT_COMPRESSION_LEVEL,
            last_stamp: AtomicI64::new(i64::MIN),
        }
    }

    /// Create an assembler from loaded configuration, including any overlay
    pub fn from_config(config: &PackwrightConfig) -> packwright_core::Result<Self> {
        let renderer = TemplateRenderer::from_config(config)?;
        Ok(Self::new(Arc::new(renderer)).with_compression_level(config.archive().compression_level))
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.renderer.catalog()
    }

    pub fn renderer(&self) -> &Arc<TemplateRenderer> {
        &self.renderer
    }

    /// Fresh selection seeded with the required components
    pub fn new_selection(&self) -> SelectionSet {
        SelectionSet::new(Arc::clone(self.catalog()))
    }

    /// Start a run writing to an in-memory ZIP
    pub fn start<I, T>(&self, ids: I, ctx: CustomerContext) -> AssemblyRun<ArchiveBuilder>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let now = self.clock.now();
        let options = ArchiveOptions::default()
            .with_compression_level(self.compression_level)
            .with_modified_at(now);
        self.start_at(ArchiveBuilder::with_options(options), ids, ctx, now)
    }

    /// Start a run writing to a caller-supplied sink
    pub fn start_with<S, I, T>(&self, sink: S, ids: I, ctx: CustomerContext) -> AssemblyRun<S>
    where
        S: ArchiveSink,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.start_at(sink, ids, ctx, self.clock.now())
    }

    fn start_at<S, I, T>(
        &self,
        sink: S,
        ids: I,
        ctx: CustomerContext,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AssemblyRun<S>
    where
        S: ArchiveSink,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let requested = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let stamp = self.next_stamp(now.timestamp_millis());
        AssemblyRun::new(Arc::clone(&self.renderer), sink, requested, ctx, now, stamp)
    }

    /// Generate a package, reporting progress after each component
    pub async fn generate<I, T, F>(
        &self,
        ids: I,
        ctx: CustomerContext,
        on_progress: F,
    ) -> Result<PackageArtifact, AssemblyFailure>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        F: FnMut(&Progress),
    {
        drive(self.start(ids, ctx), on_progress).await
    }

    /// Generate a package from a selection set
    pub async fn generate_selection<F>(
        &self,
        selection: &SelectionSet,
        ctx: CustomerContext,
        on_progress: F,
    ) -> Result<PackageArtifact, AssemblyFailure>
    where
        F: FnMut(&Progress),
    {
        self.generate(selection.current(), ctx, on_progress).await
    }

    /// Generate into a caller-supplied sink
    pub async fn generate_into<S, I, T, F>(
        &self,
        sink: S,
        ids: I,
        ctx: CustomerContext,
        on_progress: F,
    ) -> Result<PackageArtifact, AssemblyFailure>
    where
        S: ArchiveSink,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        F: FnMut(&Progress),
    {
        drive(self.start_with(sink, ids, ctx), on_progress).await
    }

    /// Filename stamps never repeat for one assembler, even within a millisecond
    fn next_stamp(&self, candidate: i64) -> i64 {
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        candidate.max(previous.saturating_add(1))
    }
}

impl std::fmt::Debug for PackageAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageAssembler")
            .field("renderer", &self.renderer)
            .field("compression_level", &self.compression_level)
            .finish_non_exhaustive()
    }
}

/// Step a run to completion, yielding to the runtime between components
async fn drive<S, F>(mut run: AssemblyRun<S>, mut on_progress: F) -> Result<PackageArtifact, AssemblyFailure>
where
    S: ArchiveSink,
    F: FnMut(&Progress),
{
    loop {
        match run.step()? {
            StepOutcome::Started { .. } => {}
            StepOutcome::Progress(progress) => {
                on_progress(&progress);
                tokio::task::yield_now().await;
            }
            StepOutcome::Finished(artifact) => return Ok(*artifact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use packwright_core::config::ProductConfig;
    use packwright_core::FixedClock;

    fn assembler() -> PackageAssembler {
        let renderer = TemplateRenderer::builtin(ProductConfig::default()).unwrap();
        PackageAssembler::new(Arc::new(renderer)).with_clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
        )))
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let assembler = assembler();
        assert_eq!(assembler.next_stamp(1000), 1000);
        assert_eq!(assembler.next_stamp(1000), 1001);
        assert_eq!(assembler.next_stamp(999), 1002);
        assert_eq!(assembler.next_stamp(5000), 5000);
    }

    #[test]
    fn test_new_selection_has_required() {
        let assembler = assembler();
        let selection = assembler.new_selection();
        assert!(selection.contains("frontend"));
        assert!(selection.contains("backend"));
        assert!(selection.contains("database"));
        assert!(!selection.contains("docs"));
    }

    #[test]
    fn test_compression_level_clamped() {
        let assembler = assembler().with_compression_level(12);
        assert_eq!(assembler.compression_level, 9);
    }
}
