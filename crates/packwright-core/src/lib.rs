//! # packwright-core
//!
//! Core library for Packwright providing:
//! - The component catalog and its built-in entries
//! - Selection sets that always keep required components
//! - Customer context, deployment types and license records
//! - Configuration file parsing (packwright.yaml)
//! - An injectable clock for reproducible output

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod selection;
pub mod types;

pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PackwrightConfig;
pub use error::{Error, Result};
pub use selection::{SelectionChange, SelectionSet};
pub use types::{
    ComponentDescriptor, ComponentId, CustomerContext, DeploymentType, GeneratedFile, LicenseKind,
    LicenseRecord,
};
