//! Error types for packwright-core

use thiserror::Error;

/// Result type alias using packwright-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Packwright
#[derive(Error, Debug)]
pub enum Error {
    /// Component id is not present in the catalog
    #[error("Unknown component: {id}")]
    UnknownComponent { id: String },

    /// Component id is malformed
    #[error("Invalid component id '{id}': must start with a lowercase letter and contain only lowercase letters, digits and hyphens")]
    InvalidComponentId { id: String },

    /// Two catalog entries share an id
    #[error("Duplicate component in catalog: {id}")]
    DuplicateComponent { id: String },

    /// Template definition or evaluation failed
    #[error("{}", template_message(.component, .message))]
    TemplateError {
        component: Option<String>,
        message: String,
    },

    /// Customer has not accepted the license terms
    #[error("License terms must be accepted before generating a package")]
    TermsNotAccepted,

    /// Customer company name is empty
    #[error("Company name is required before generating a package")]
    MissingCompanyName,

    /// Selection is empty after enforcing required components
    #[error("Selection is empty: at least one component must be selected")]
    EmptySelection,

    /// Unknown deployment type label
    #[error("Unknown deployment type: {value}. Valid types: saas, on-premise, hybrid")]
    InvalidDeploymentType { value: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn template_message(component: &Option<String>, message: &str) -> String {
    match component {
        Some(component) => format!("Template error in component '{}': {}", component, message),
        None => format!("Template error: {}", message),
    }
}

impl Error {
    /// Create an unknown component error
    pub fn unknown_component(id: impl Into<String>) -> Self {
        Self::UnknownComponent { id: id.into() }
    }

    /// Create an invalid component id error
    pub fn invalid_component_id(id: impl Into<String>) -> Self {
        Self::InvalidComponentId { id: id.into() }
    }

    /// Create a duplicate component error
    pub fn duplicate_component(id: impl Into<String>) -> Self {
        Self::DuplicateComponent { id: id.into() }
    }

    /// Create a template error attributed to a component
    pub fn template(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateError {
            component: Some(component.into()),
            message: message.into(),
        }
    }

    /// Create a template error for a top-level file outside any component
    pub fn template_unattributed(message: impl Into<String>) -> Self {
        Self::TemplateError {
            component: None,
            message: message.into(),
        }
    }

    /// Create an invalid deployment type error
    pub fn invalid_deployment_type(value: impl Into<String>) -> Self {
        Self::InvalidDeploymentType {
            value: value.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Component id attached to this error, if any
    pub fn component_id(&self) -> Option<&str> {
        match self {
            Self::UnknownComponent { id } => Some(id),
            Self::TemplateError { component, .. } => component.as_deref(),
            _ => None,
        }
    }
}
