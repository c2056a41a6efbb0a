//! Structured assembly failures
//!
//! Every failure carries the stage it happened in, a reason code and, where
//! one applies, the offending component id.

use packwright_archive::Error as ArchiveError;
use packwright_core::Error as CoreError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Run stage a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validating,
    Generating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => f.write_str("validating"),
            Self::Generating => f.write_str("generating"),
        }
    }
}

/// Reason code of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    UnknownComponent,
    TemplateError,
    DuplicatePath,
    BuilderClosed,
    TermsNotAccepted,
    MissingCompanyName,
    EmptySelection,
    /// The archive encoder failed
    ArchiveWrite,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownComponent => "UnknownComponent",
            Self::TemplateError => "TemplateError",
            Self::DuplicatePath => "DuplicatePath",
            Self::BuilderClosed => "BuilderClosed",
            Self::TermsNotAccepted => "TermsNotAccepted",
            Self::MissingCompanyName => "MissingCompanyName",
            Self::EmptySelection => "EmptySelection",
            Self::ArchiveWrite => "ArchiveWrite",
        }
    }

    /// Failures the customer can fix by correcting the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::TermsNotAccepted | Self::MissingCompanyName | Self::EmptySelection
        )
    }

    /// Form field to highlight for user-correctable failures
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::TermsNotAccepted => Some("acceptedTerms"),
            Self::MissingCompanyName => Some("companyName"),
            Self::EmptySelection => Some("selection"),
            _ => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of an assembly run
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Package assembly failed while {stage} ({reason}): {message}")]
pub struct AssemblyFailure {
    pub stage: Stage,
    #[serde(rename = "reasonCode")]
    pub reason: FailureReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

impl AssemblyFailure {
    pub fn new(stage: Stage, reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            stage,
            reason,
            component_id: None,
            field: reason.field(),
            message: message.into(),
        }
    }

    /// Attach the offending component id
    pub fn with_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    /// Classify a core error. `component` is used when the error names none.
    pub fn from_core(stage: Stage, err: CoreError, component: Option<&str>) -> Self {
        let reason = match &err {
            CoreError::UnknownComponent { .. } | CoreError::InvalidComponentId { .. } => {
                FailureReason::UnknownComponent
            }
            CoreError::TermsNotAccepted => FailureReason::TermsNotAccepted,
            CoreError::MissingCompanyName => FailureReason::MissingCompanyName,
            CoreError::EmptySelection => FailureReason::EmptySelection,
            _ => FailureReason::TemplateError,
        };
        let component_id = err
            .component_id()
            .or(component)
            .map(str::to_string);

        let mut failure = Self::new(stage, reason, err.to_string());
        failure.component_id = component_id;
        failure
    }

    /// Classify an archive error raised while adding entries or finishing
    pub fn from_archive(err: ArchiveError, component: Option<&str>) -> Self {
        let reason = match &err {
            ArchiveError::DuplicatePath { .. } => FailureReason::DuplicatePath,
            ArchiveError::BuilderClosed => FailureReason::BuilderClosed,
            ArchiveError::InvalidPath { .. } | ArchiveError::Zip(_) | ArchiveError::Io(_) => {
                FailureReason::ArchiveWrite
            }
        };

        let mut failure = Self::new(Stage::Generating, reason, err.to_string());
        failure.component_id = component.map(str::to_string);
        failure
    }

    pub fn is_user_correctable(&self) -> bool {
        self.reason.is_user_correctable()
    }

    /// Log at a level matching who has to act on the failure
    pub(crate) fn log(&self) {
        let component = self.component_id.as_deref().unwrap_or("-");
        if self.is_user_correctable() {
            tracing::info!("Assembly rejected: {} (field: {:?})", self.reason, self.field);
        } else {
            tracing::error!(
                "Assembly failed while {}: {} [component: {}] {}",
                self.stage,
                self.reason,
                component,
                self.message
            );
        }
    }
}
