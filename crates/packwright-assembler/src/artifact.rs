//! The finished package handed back to callers

use chrono::{DateTime, Utc};
use packwright_archive::ArchiveStats;
use packwright_core::{ComponentId, DeploymentType, LicenseRecord};

/// Final archive plus the metadata describing it
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    /// ZIP bytes
    pub bytes: Vec<u8>,

    /// `{product-slug}-{deploymentType}-{unixTimestampMillis}.zip`
    pub suggested_filename: String,

    /// Archive entry paths, in write order
    pub entries: Vec<String>,

    /// Components included, in catalog order
    pub components: Vec<ComponentId>,

    /// License record stamped into `LICENSE.txt`
    pub license: LicenseRecord,

    /// Instant the run rendered its templates with
    pub generated_at: DateTime<Utc>,

    /// Sizes and SHA256 checksum of `bytes`
    pub stats: ArchiveStats,
}

impl PackageArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn checksum(&self) -> &str {
        &self.stats.checksum
    }
}

/// Build the download filename for a run
pub fn suggested_filename(slug: &str, deployment_type: DeploymentType, stamp_millis: i64) -> String {
    format!("{}-{}-{}.zip", slug, deployment_type, stamp_millis)
}
