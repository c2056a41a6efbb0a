//! License record stamped into every generated package

use crate::types::customer::{CustomerContext, DeploymentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Name of the license file at the root of the archive
pub const LICENSE_FILENAME: &str = "LICENSE.txt";

/// Name of the version marker at the root of the archive
pub const VERSION_FILENAME: &str = "VERSION.txt";

/// Prefix of synthesized evaluation keys
const EVALUATION_KEY_PREFIX: &str = "EVAL";

/// How the license was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseKind {
    /// Customer supplied a key
    Perpetual,
    /// Key was synthesized for an evaluation install
    Evaluation,
}

impl LicenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perpetual => "perpetual",
            Self::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for LicenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// License metadata written to `LICENSE.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub company_name: String,
    pub license_key: String,
    pub issued_at: DateTime<Utc>,
    pub kind: LicenseKind,
    pub deployment_type: DeploymentType,
}

impl LicenseRecord {
    /// Issue a record for a customer at the given instant.
    ///
    /// A supplied key yields a perpetual license carrying that exact key;
    /// otherwise an evaluation key is derived from the company name and the
    /// issue instant, so the same inputs always produce the same key.
    pub fn issue(ctx: &CustomerContext, issued_at: DateTime<Utc>) -> Self {
        let company_name = ctx.company_name().to_string();
        let (license_key, kind) = match ctx.supplied_license_key() {
            Some(key) => (key.to_string(), LicenseKind::Perpetual),
            None => (
                evaluation_key(&company_name, issued_at),
                LicenseKind::Evaluation,
            ),
        };

        Self {
            company_name,
            license_key,
            issued_at,
            kind,
            deployment_type: ctx.deployment_type,
        }
    }
}

/// Derive an `EVAL-XXXX-XXXX-XXXX-XXXX` key
fn evaluation_key(company_name: &str, issued_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(company_name.as_bytes());
    hasher.update(b"\0");
    hasher.update(issued_at.timestamp_millis().to_be_bytes());
    let digest = hex::encode_upper(hasher.finalize());

    let groups: Vec<&str> = (0..4).map(|i| &digest[i * 4..(i + 1) * 4]).collect();
    format!("{}-{}", EVALUATION_KEY_PREFIX, groups.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_supplied_key_is_perpetual() {
        let ctx = CustomerContext::new("Acme")
            .with_license_key("ACME-1234")
            .with_accepted_terms(true);
        let record = LicenseRecord::issue(&ctx, instant());

        assert_eq!(record.kind, LicenseKind::Perpetual);
        assert_eq!(record.license_key, "ACME-1234");
        assert_eq!(record.company_name, "Acme");
    }

    #[test]
    fn test_missing_key_is_evaluation() {
        let ctx = CustomerContext::new("Acme").with_accepted_terms(true);
        let record = LicenseRecord::issue(&ctx, instant());

        assert_eq!(record.kind, LicenseKind::Evaluation);
        assert!(record.license_key.starts_with("EVAL-"));
        assert_eq!(record.license_key.len(), "EVAL-XXXX-XXXX-XXXX-XXXX".len());
    }

    #[test]
    fn test_evaluation_key_is_reproducible() {
        let ctx = CustomerContext::new("Acme");
        let first = LicenseRecord::issue(&ctx, instant());
        let second = LicenseRecord::issue(&ctx, instant());
        assert_eq!(first.license_key, second.license_key);

        let other = LicenseRecord::issue(&CustomerContext::new("Globex"), instant());
        assert_ne!(first.license_key, other.license_key);
    }

    #[test]
    fn test_license_kind_display() {
        assert_eq!(LicenseKind::Perpetual.to_string(), "perpetual");
        assert_eq!(LicenseKind::Evaluation.to_string(), "evaluation");
    }
}
