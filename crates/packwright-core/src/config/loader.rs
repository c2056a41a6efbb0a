//! Configuration file loading and parsing

use super::{ArchiveSettings, PackwrightConfigFile, ProductConfig};
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

/// Configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["packwright.yaml", "packwright.yml"];

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("slug pattern is valid"));

/// Loaded and validated Packwright configuration
#[derive(Debug, Clone)]
pub struct PackwrightConfig {
    /// The parsed configuration
    pub config: PackwrightConfigFile,

    /// Path to the configuration file, if one was found
    pub config_path: Option<Utf8PathBuf>,

    /// Directory relative paths are resolved against
    pub working_dir: Utf8PathBuf,
}

impl PackwrightConfig {
    /// Load configuration from the specified path or search for it.
    ///
    /// An explicit path must exist. Without one, the current directory and its
    /// parents are searched and defaults are used when nothing is found.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(p.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                Self::from_yaml(&content, Some(p.to_owned()))
            }
            None => {
                let cwd = std::env::current_dir()?;
                let cwd = Utf8PathBuf::try_from(cwd).map_err(|_| {
                    Error::invalid_config("Current directory path is not valid UTF-8")
                })?;
                Self::discover(&cwd)
            }
        }
    }

    /// Search `start` and its parents for a config file, falling back to defaults
    pub fn discover(start: &Utf8Path) -> Result<Self> {
        match Self::find_config(start) {
            Some(path) => {
                tracing::debug!("Using configuration file: {}", path);
                let content = fs::read_to_string(&path)?;
                Self::from_yaml(&content, Some(path))
            }
            None => {
                tracing::debug!("No packwright.yaml found, using defaults");
                Ok(Self {
                    config: PackwrightConfigFile::default(),
                    config_path: None,
                    working_dir: start.to_owned(),
                })
            }
        }
    }

    /// Parse and validate configuration content
    pub fn from_yaml(content: &str, config_path: Option<Utf8PathBuf>) -> Result<Self> {
        let working_dir = config_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_owned())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        // Parse YAML; an empty document means all defaults
        let mut config: PackwrightConfigFile = if content.trim().is_empty() {
            PackwrightConfigFile::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };

        validate_product(&config.product)?;
        config.archive.compression_level = config.archive.compression_level.clamp(1, 9);

        Ok(Self {
            config,
            config_path,
            working_dir,
        })
    }

    fn find_config(start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start);
        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    return Some(path);
                }
            }
            current = dir.parent();
        }
        None
    }

    /// Get product metadata
    pub fn product(&self) -> &ProductConfig {
        &self.config.product
    }

    /// Get archive settings
    pub fn archive(&self) -> &ArchiveSettings {
        &self.config.archive
    }

    /// Resolved path of the custom template overlay, if configured
    pub fn templates_path(&self) -> Option<Utf8PathBuf> {
        self.config.templates.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.working_dir.join(p)
            }
        })
    }
}

impl Default for PackwrightConfig {
    fn default() -> Self {
        Self {
            config: PackwrightConfigFile::default(),
            config_path: None,
            working_dir: Utf8PathBuf::from("."),
        }
    }
}

fn validate_product(product: &ProductConfig) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(Error::invalid_config("product.name must not be empty"));
    }
    if !SLUG_PATTERN.is_match(&product.slug) {
        return Err(Error::invalid_config(format!(
            "product.slug '{}' must be lowercase alphanumeric with hyphens",
            product.slug
        )));
    }
    semver::Version::parse(&product.version).map_err(|e| {
        Error::invalid_config(format!(
            "product.version '{}' is not a valid semantic version: {}",
            product.version, e
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_PRODUCT_SLUG};
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
product:
  name: "Acme Console"
  slug: acme-console
  version: "2.4.1"
archive:
  compression_level: 9
templates: overlay.yaml
"#;
        let config =
            PackwrightConfig::from_yaml(yaml, Some(Utf8PathBuf::from("/etc/pw/packwright.yaml")))
                .unwrap();

        assert_eq!(config.product().slug, "acme-console");
        assert_eq!(config.archive().compression_level, 9);
        assert_eq!(
            config.templates_path(),
            Some(Utf8PathBuf::from("/etc/pw/overlay.yaml"))
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PackwrightConfig::from_yaml("", None).unwrap();
        assert_eq!(config.product().slug, DEFAULT_PRODUCT_SLUG);
        assert_eq!(config.archive().compression_level, DEFAULT_COMPRESSION_LEVEL);
        assert!(config.templates_path().is_none());
    }

    #[test]
    fn test_compression_level_clamped() {
        let config =
            PackwrightConfig::from_yaml("archive:\n  compression_level: 15\n", None).unwrap();
        assert_eq!(config.archive().compression_level, 9);

        let config =
            PackwrightConfig::from_yaml("archive:\n  compression_level: 0\n", None).unwrap();
        assert_eq!(config.archive().compression_level, 1);
    }

    #[test]
    fn test_invalid_slug_rejected() {
        let err = PackwrightConfig::from_yaml("product:\n  slug: \"Acme Console\"\n", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_invalid_version_rejected() {
        let err =
            PackwrightConfig::from_yaml("product:\n  version: \"two\"\n", None).unwrap_err();
        assert!(err.to_string().contains("semantic version"));
    }

    #[test]
    fn test_explicit_missing_path() {
        let err = PackwrightConfig::load(Some(Utf8Path::new("/nonexistent/packwright.yaml")))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        let root = utf8_dir(&temp);
        fs::write(root.join("packwright.yml"), "product:\n  slug: found-it\n").unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let config = PackwrightConfig::discover(&nested).unwrap();
        assert_eq!(config.product().slug, "found-it");
        assert_eq!(config.config_path, Some(root.join("packwright.yml")));
        assert_eq!(config.working_dir, root);
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let root = utf8_dir(&temp);

        let config = PackwrightConfig::discover(&root).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.product().slug, DEFAULT_PRODUCT_SLUG);
    }
}
