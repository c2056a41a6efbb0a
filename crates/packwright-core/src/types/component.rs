//! Component identifiers and catalog descriptors

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static COMPONENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("component id pattern is valid"));

/// Stable identifier of a catalog component.
///
/// The id doubles as the component's folder name inside the generated
/// archive, so it is restricted to lowercase ASCII letters, digits and
/// hyphens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    /// Validate and wrap a component id
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if COMPONENT_ID_PATTERN.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(Error::invalid_component_id(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComponentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ComponentId> for String {
    fn from(value: ComponentId) -> Self {
        value.0
    }
}

/// Catalog entry describing one generatable component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Unique id within the catalog
    pub id: ComponentId,

    /// Human readable name
    pub name: String,

    /// Short description shown next to the checkbox
    #[serde(default)]
    pub description: String,

    /// Required components are always part of a selection
    #[serde(default)]
    pub required: bool,

    /// Rough size of the rendered output, used for download hints only
    #[serde(default)]
    pub approx_size_bytes: u64,
}

impl ComponentDescriptor {
    /// Create a descriptor, validating the id
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        required: bool,
        approx_size_bytes: u64,
    ) -> Result<Self> {
        Ok(Self {
            id: ComponentId::new(id)?,
            name: name.to_string(),
            description: description.to_string(),
            required,
            approx_size_bytes,
        })
    }
}
