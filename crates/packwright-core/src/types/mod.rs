//! Type definitions shared across the Packwright crates

mod component;
mod customer;
mod license;

pub use component::{ComponentDescriptor, ComponentId};
pub use customer::{CustomerContext, DeploymentType};
pub use license::{LicenseKind, LicenseRecord, LICENSE_FILENAME, VERSION_FILENAME};

/// One rendered file, ready to be handed to an archive sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Archive-relative, forward-slash separated path
    pub path: String,

    /// Rendered bytes
    pub content: Vec<u8>,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content as UTF-8 text, if it is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}
