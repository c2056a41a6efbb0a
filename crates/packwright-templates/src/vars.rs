//! Template variables for rendering

use chrono::{DateTime, Utc};
use packwright_core::config::ProductConfig;
use packwright_core::{CustomerContext, LicenseRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variables available to every template as `{{ name }}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateVars {
    pub company_name: String,
    pub license_key: String,
    pub license_kind: String,
    pub deployment_type: String,
    pub timestamp: String,
    pub date: String,
    pub year: String,
    pub product_name: String,
    pub product_version: String,
}

impl TemplateVars {
    /// Build variables for one customer at one instant.
    ///
    /// The license fields come from the same `LicenseRecord` the assembler
    /// writes to `LICENSE.txt`, so component files and the license agree.
    pub fn new(ctx: &CustomerContext, product: &ProductConfig, now: DateTime<Utc>) -> Self {
        let license = LicenseRecord::issue(ctx, now);
        Self::from_license(&license, product)
    }

    /// Build variables from an already issued license record
    pub fn from_license(license: &LicenseRecord, product: &ProductConfig) -> Self {
        let issued_at = license.issued_at;
        Self {
            company_name: license.company_name.clone(),
            license_key: license.license_key.clone(),
            license_kind: license.kind.to_string(),
            deployment_type: license.deployment_type.to_string(),
            timestamp: issued_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            date: issued_at.format("%Y-%m-%d").to_string(),
            year: issued_at.format("%Y").to_string(),
            product_name: product.name.clone(),
            product_version: product.version.clone(),
        }
    }

    /// Convert to a Tera context
    pub fn to_tera_context(&self) -> tera::Result<tera::Context> {
        tera::Context::from_serialize(self)
    }

    /// Value of a context field
    pub fn field(&self, field: ContextField) -> &str {
        match field {
            ContextField::CompanyName => &self.company_name,
            ContextField::LicenseKey => &self.license_key,
            ContextField::DeploymentType => &self.deployment_type,
            ContextField::Timestamp => &self.timestamp,
        }
    }
}

/// Customer-derived fields a template can declare as required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    CompanyName,
    LicenseKey,
    DeploymentType,
    Timestamp,
}

impl ContextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::LicenseKey => "license_key",
            Self::DeploymentType => "deployment_type",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
