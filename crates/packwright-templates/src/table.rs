//! Static template table: component id -> ordered list of file templates
//!
//! Paths are checked when a component's templates are registered, never per
//! render call. A path is relative to the component's folder inside the
//! archive and may not be absolute or contain `.`/`..` segments.

use crate::builtin::BUILTIN_TEMPLATES;
use crate::vars::ContextField;
use packwright_core::{ComponentId, Error, Result};
use std::collections::BTreeMap;

/// One file template of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Path relative to the component folder
    pub path: String,

    /// Template body (`{{ variable }}` interpolation only)
    pub body: String,

    /// Fields that must be non-empty when this template is rendered
    pub requires: Vec<ContextField>,
}

impl TemplateSpec {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
            requires: Vec::new(),
        }
    }

    /// Declare fields that must be present at render time
    pub fn requiring(mut self, fields: &[ContextField]) -> Self {
        self.requires = fields.to_vec();
        self
    }
}

/// Mapping of component ids to their template lists
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    entries: BTreeMap<ComponentId, Vec<TemplateSpec>>,
}

impl TemplateTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in component templates
    pub fn builtin() -> Result<Self> {
        let mut table = Self::new();
        for component in BUILTIN_TEMPLATES {
            let specs = component
                .files
                .iter()
                .map(|file| TemplateSpec::new(file.path, file.body).requiring(file.requires))
                .collect();
            table.insert(ComponentId::new(component.component)?, specs)?;
        }
        Ok(table)
    }

    /// Register (or replace) the templates of a component
    pub fn insert(&mut self, component: ComponentId, specs: Vec<TemplateSpec>) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            validate_relative_path(&spec.path).map_err(|reason| {
                Error::template(
                    component.as_str(),
                    format!("invalid template path '{}': {}", spec.path, reason),
                )
            })?;
            if !seen.insert(spec.path.as_str()) {
                return Err(Error::template(
                    component.as_str(),
                    format!("template path '{}' is defined twice", spec.path),
                ));
            }
        }

        if self.entries.insert(component.clone(), specs).is_some() {
            tracing::debug!("Replaced templates for component: {}", component);
        }
        Ok(())
    }

    /// Templates of a component, in render order
    pub fn get(&self, component: &str) -> Option<&[TemplateSpec]> {
        self.entries.get(component).map(Vec::as_slice)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.entries.contains_key(component)
    }

    /// Component ids with registered templates
    pub fn components(&self) -> impl Iterator<Item = &ComponentId> {
        self.entries.keys()
    }

    /// Iterate over (component, templates)
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &[TemplateSpec])> {
        self.entries.iter().map(|(id, specs)| (id, specs.as_slice()))
    }
}

/// Check that a path stays inside its component folder
pub fn validate_relative_path(path: &str) -> std::result::Result<(), &'static str> {
    if path.is_empty() {
        return Err("path is empty");
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err("path is absolute");
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return Err("path is absolute");
    }
    if path.contains('\\') {
        return Err("path must use forward slashes");
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err("path contains an empty segment"),
            "." => return Err("path contains a '.' segment"),
            ".." => return Err("path escapes the component folder"),
            _ => {}
        }
    }
    Ok(())
}

/// Check that a body only interpolates plain variables.
///
/// Statements, comments, function calls, filters and attribute access are
/// rejected, so a body cannot read the environment, the wall clock or
/// another template.
pub fn validate_body(body: &str) -> std::result::Result<(), String> {
    if body.contains("{%") {
        return Err("statements ('{%') are not allowed".to_string());
    }
    if body.contains("{#") {
        return Err("comments ('{#') are not allowed".to_string());
    }

    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err("unterminated '{{'".to_string());
        };
        let expr = after[..end]
            .trim()
            .trim_start_matches('-')
            .trim_end_matches('-')
            .trim();
        if !is_variable_name(expr) {
            return Err(format!(
                "only plain variables may be interpolated, found '{}'",
                expr
            ));
        }
        rest = &after[end + 2..];
    }
    Ok(())
}

fn is_variable_name(expr: &str) -> bool {
    let mut chars = expr.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
