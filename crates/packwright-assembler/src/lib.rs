//! # packwright-assembler
//!
//! Turns a selection and a customer into a deployment package:
//! 1. Validate terms, company name and selection
//! 2. Render every selected component in catalog order
//! 3. Append `LICENSE.txt` and `VERSION.txt`
//! 4. Finish the archive and describe it as a [`PackageArtifact`]
//!
//! Progress is reported after each component. A failed run never exposes a
//! partial archive.

pub mod artifact;
pub mod assembler;
pub mod failure;
pub mod progress;
pub mod run;

pub use artifact::{suggested_filename, PackageArtifact};
pub use assembler::PackageAssembler;
pub use failure::{AssemblyFailure, FailureReason, Stage};
pub use progress::Progress;
pub use run::{AssemblyRun, RunState, StepOutcome};
