//! Customer context supplied by the console form

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target installation topology.
///
/// Only used as a label (filename, license record, template text); it never
/// changes which files are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentType {
    /// Vendor-hosted
    Saas,
    /// Customer data center
    #[default]
    OnPremise,
    /// Split between vendor cloud and customer infrastructure
    Hybrid,
}

impl DeploymentType {
    /// Get all deployment types
    pub fn all() -> [Self; 3] {
        [Self::Saas, Self::OnPremise, Self::Hybrid]
    }

    /// Get the label used in filenames and license records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saas => "saas",
            Self::OnPremise => "on-premise",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "saas" => Ok(Self::Saas),
            "on-premise" | "onpremise" | "on_premise" => Ok(Self::OnPremise),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(Error::invalid_deployment_type(s)),
        }
    }
}

/// Customer identity and choices for one packaging request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContext {
    pub company_name: String,

    /// Supplied license key; an evaluation key is issued when absent or blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,

    #[serde(default)]
    pub accepted_terms: bool,

    #[serde(default)]
    pub deployment_type: DeploymentType,
}

impl CustomerContext {
    /// Create a context for a company with terms not yet accepted
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Set the license key
    pub fn with_license_key(mut self, key: impl Into<String>) -> Self {
        self.license_key = Some(key.into());
        self
    }

    /// Set whether the terms were accepted
    pub fn with_accepted_terms(mut self, accepted: bool) -> Self {
        self.accepted_terms = accepted;
        self
    }

    /// Set the deployment type
    pub fn with_deployment_type(mut self, deployment_type: DeploymentType) -> Self {
        self.deployment_type = deployment_type;
        self
    }

    /// Company name with surrounding whitespace removed
    pub fn company_name(&self) -> &str {
        self.company_name.trim()
    }

    /// Supplied license key, ignoring blank values
    pub fn supplied_license_key(&self) -> Option<&str> {
        self.license_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Check the generation gates in order: terms first, then company name
    pub fn validate(&self) -> Result<()> {
        if !self.accepted_terms {
            return Err(Error::TermsNotAccepted);
        }
        if self.company_name().is_empty() {
            return Err(Error::MissingCompanyName);
        }
        Ok(())
    }
}
