//! Step-wise assembly run
//!
//! A run moves `Idle -> Validating -> Generating -> Done`, or to `Failed`
//! from either middle state. Each call to [`AssemblyRun::step`] does one unit
//! of work: validation, one component, or the closing files plus `finish`.
//! Dropping a run between steps abandons it; nothing needs releasing beyond
//! the in-memory sink.

use crate::artifact::{suggested_filename, PackageArtifact};
use crate::failure::{AssemblyFailure, FailureReason, Stage};
use crate::progress::Progress;
use chrono::{DateTime, Utc};
use packwright_archive::{ArchiveSink, ArchiveStats};
use packwright_core::{ComponentId, CustomerContext, Error, GeneratedFile, LicenseRecord};
use packwright_templates::{TemplateRenderer, TemplateVars};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Generating,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Result of one successful step
#[derive(Debug)]
pub enum StepOutcome {
    /// Validation passed; `total` components will be generated
    Started { total: usize },

    /// One component was rendered and archived
    Progress(Progress),

    /// The archive is complete
    Finished(Box<PackageArtifact>),
}

/// Everything fixed at validation time
struct Plan {
    components: Vec<ComponentId>,
    license: LicenseRecord,
    vars: TemplateVars,
}

/// One assembly request, owning its sink
pub struct AssemblyRun<S: ArchiveSink> {
    renderer: Arc<TemplateRenderer>,
    sink: Option<S>,
    requested: Vec<String>,
    ctx: CustomerContext,
    now: DateTime<Utc>,
    stamp_millis: i64,
    state: RunState,
    plan: Option<Plan>,
    next: usize,
    entries: Vec<String>,
    original_size: u64,
}

impl<S: ArchiveSink> AssemblyRun<S> {
    pub(crate) fn new(
        renderer: Arc<TemplateRenderer>,
        sink: S,
        requested: Vec<String>,
        ctx: CustomerContext,
        now: DateTime<Utc>,
        stamp_millis: i64,
    ) -> Self {
        Self {
            renderer,
            sink: Some(sink),
            requested,
            ctx,
            now,
            stamp_millis,
            state: RunState::Idle,
            plan: None,
            next: 0,
            entries: Vec::new(),
            original_size: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of components to generate, known once validation passed
    pub fn total(&self) -> Option<usize> {
        self.plan.as_ref().map(|p| p.components.len())
    }

    /// Advance the run by one step
    pub fn step(&mut self) -> Result<StepOutcome, AssemblyFailure> {
        let outcome = match self.state {
            RunState::Idle => {
                self.state = RunState::Validating;
                self.validate()
            }
            RunState::Generating => {
                if self.total().is_some_and(|total| self.next < total) {
                    self.generate_next()
                } else {
                    self.complete()
                }
            }
            state => Err(AssemblyFailure::new(
                Stage::Generating,
                FailureReason::BuilderClosed,
                format!("assembly run is already {}", state),
            )),
        };

        if let Err(failure) = &outcome {
            if self.state != RunState::Failed && self.state != RunState::Done {
                failure.log();
                self.state = RunState::Failed;
                // Discard everything written so far
                self.sink = None;
            }
        }
        outcome
    }

    fn validate(&mut self) -> Result<StepOutcome, AssemblyFailure> {
        let validating = |err: Error| AssemblyFailure::from_core(Stage::Validating, err, None);

        self.ctx.validate().map_err(validating)?;

        let catalog = self.renderer.catalog();
        if let Some(unknown) = self.requested.iter().find(|id| !catalog.exists(id)) {
            return Err(validating(Error::unknown_component(unknown.as_str())));
        }

        let mut wanted: BTreeSet<&str> = self.requested.iter().map(String::as_str).collect();
        let required = catalog.required_ids();
        wanted.extend(required.iter().map(ComponentId::as_str));

        let components: Vec<ComponentId> = catalog
            .list_components()
            .iter()
            .filter(|c| wanted.contains(c.id.as_str()))
            .map(|c| c.id.clone())
            .collect();
        if components.is_empty() {
            return Err(validating(Error::EmptySelection));
        }

        let license = LicenseRecord::issue(&self.ctx, self.now);
        let vars = TemplateVars::from_license(&license, self.renderer.product());
        let total = components.len();

        tracing::info!(
            "Assembling {} components for {} ({}, {} license)",
            total,
            license.company_name,
            license.deployment_type,
            license.kind
        );

        self.plan = Some(Plan {
            components,
            license,
            vars,
        });
        self.state = RunState::Generating;
        Ok(StepOutcome::Started { total })
    }

    fn generate_next(&mut self) -> Result<StepOutcome, AssemblyFailure> {
        let plan = self.plan.as_ref().ok_or_else(missing_plan)?;
        let component = plan.components[self.next].clone();
        let total = plan.components.len();

        let files = self
            .renderer
            .render_with(component.as_str(), &plan.vars)
            .map_err(|e| AssemblyFailure::from_core(Stage::Generating, e, Some(component.as_str())))?;

        for file in files {
            self.write(file, Some(component.as_str()))?;
        }

        self.next += 1;
        tracing::debug!("Component {} done ({}/{})", component, self.next, total);
        Ok(StepOutcome::Progress(Progress {
            completed: self.next,
            total,
            component,
        }))
    }

    fn complete(&mut self) -> Result<StepOutcome, AssemblyFailure> {
        let plan = self.plan.take().ok_or_else(missing_plan)?;

        let top_level = |err: Error| AssemblyFailure::from_core(Stage::Generating, err, None);
        let license_file = self.renderer.render_license(&plan.license).map_err(top_level)?;
        let version_file = self.renderer.render_version(&plan.license).map_err(top_level)?;
        self.write(license_file, None)?;
        self.write(version_file, None)?;

        let mut sink = self.sink.take().ok_or_else(missing_sink)?;
        let bytes = sink
            .finish()
            .map_err(|e| AssemblyFailure::from_archive(e, None))?;

        let stats = ArchiveStats::new(self.original_size, &bytes);
        let product = self.renderer.product();
        let artifact = PackageArtifact {
            suggested_filename: suggested_filename(
                &product.slug,
                plan.license.deployment_type,
                self.stamp_millis,
            ),
            bytes,
            entries: std::mem::take(&mut self.entries),
            components: plan.components,
            license: plan.license,
            generated_at: self.now,
            stats,
        };

        tracing::info!(
            "Package ready: {} ({} entries, {} bytes, sha256 {})",
            artifact.suggested_filename,
            artifact.entries.len(),
            artifact.size(),
            artifact.checksum()
        );
        self.state = RunState::Done;
        Ok(StepOutcome::Finished(Box::new(artifact)))
    }

    fn write(&mut self, file: GeneratedFile, component: Option<&str>) -> Result<(), AssemblyFailure> {
        let sink = self.sink.as_mut().ok_or_else(missing_sink)?;
        sink.add(&file.path, &file.content)
            .map_err(|e| AssemblyFailure::from_archive(e, component))?;
        self.original_size += file.content.len() as u64;
        self.entries.push(file.path);
        Ok(())
    }
}

fn missing_plan() -> AssemblyFailure {
    AssemblyFailure::new(
        Stage::Generating,
        FailureReason::BuilderClosed,
        "assembly run has no validated plan",
    )
}

fn missing_sink() -> AssemblyFailure {
    AssemblyFailure::new(
        Stage::Generating,
        FailureReason::BuilderClosed,
        "archive sink was already consumed",
    )
}
