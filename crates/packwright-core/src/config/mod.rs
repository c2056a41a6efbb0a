//! Configuration loading and management

mod loader;

pub use loader::PackwrightConfig;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Default product display name
pub const DEFAULT_PRODUCT_NAME: &str = "Packwright Console";

/// Default filename prefix for generated packages
pub const DEFAULT_PRODUCT_SLUG: &str = "packwright";

/// Default compression level (6 = balanced speed/ratio)
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Contents of `packwright.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackwrightConfigFile {
    pub product: ProductConfig,
    pub archive: ArchiveSettings,

    /// Custom template overlay, relative to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Utf8PathBuf>,
}

/// Product metadata stamped into filenames, `VERSION.txt` and templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub name: String,
    pub slug: String,
    pub version: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRODUCT_NAME.to_string(),
            slug: DEFAULT_PRODUCT_SLUG.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Archive output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    /// Deflate level (1-9)
    pub compression_level: u32,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
