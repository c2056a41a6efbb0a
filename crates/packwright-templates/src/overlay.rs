//! Custom template overlay loaded from YAML
//!
//! An overlay can add new components (appended to the catalog in file order)
//! or replace the file list of an existing one. For existing components only
//! `files` is honoured; descriptor fields are ignored with a warning. Overlay
//! templates go through the same path and body checks as the built-in table.

use crate::table::{TemplateSpec, TemplateTable};
use crate::vars::ContextField;
use camino::Utf8Path;
use packwright_core::{Catalog, ComponentDescriptor, ComponentId, Error, Result};
use serde::{Deserialize, Serialize};

/// Parsed overlay file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateOverlay {
    #[serde(default)]
    pub components: Vec<OverlayComponent>,
}

/// Component entry of an overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayComponent {
    pub id: String,

    /// Display name for new components; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_size_bytes: Option<u64>,

    #[serde(default)]
    pub files: Vec<OverlayFile>,
}

/// File entry of an overlay component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayFile {
    pub path: String,
    pub template: String,

    #[serde(default)]
    pub requires: Vec<ContextField>,
}

impl OverlayComponent {
    /// Descriptor fields set in the overlay entry
    pub fn descriptor_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("required", self.required.is_some()),
            ("approx_size_bytes", self.approx_size_bytes.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }
}

impl TemplateOverlay {
    /// Parse an overlay from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Read and parse an overlay file
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::invalid_config(format!("Template overlay not found: {}", path))
            } else {
                Error::Io(e)
            }
        })?;
        tracing::debug!("Loaded template overlay: {}", path);
        Self::from_yaml(&content)
    }

    /// Merge the overlay into a catalog and template table
    pub fn apply(&self, catalog: &Catalog, mut table: TemplateTable) -> Result<(Catalog, TemplateTable)> {
        let mut added = Vec::new();

        for component in &self.components {
            let id = ComponentId::new(component.id.as_str())?;
            let specs = component
                .files
                .iter()
                .map(|f| TemplateSpec::new(&f.path, &f.template).requiring(&f.requires))
                .collect();

            if catalog.exists(id.as_str()) {
                tracing::info!("Overlay replaces templates of component: {}", id);
                let ignored = component.descriptor_fields();
                if !ignored.is_empty() {
                    tracing::warn!(
                        "Overlay entry for existing component {} only replaces files; ignoring {}",
                        id,
                        ignored.join(", ")
                    );
                }
            } else {
                tracing::info!("Overlay adds component: {}", id);
                added.push(ComponentDescriptor {
                    id: id.clone(),
                    name: component.name.clone().unwrap_or_else(|| id.to_string()),
                    description: component.description.clone().unwrap_or_default(),
                    required: component.required.unwrap_or_default(),
                    approx_size_bytes: component.approx_size_bytes.unwrap_or_default(),
                });
            }

            table.insert(id, specs)?;
        }

        let catalog = if added.is_empty() {
            catalog.clone()
        } else {
            catalog.extended(added)?
        };
        Ok((catalog, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAY: &str = r#"
components:
  - id: sso
    name: "Single Sign-On"
    description: "SAML bridge"
    approx_size_bytes: 4096
    files:
      - path: saml.conf
        template: "entity_id = {{ company_name }}"
        requires: [company_name]
  - id: docs
    files:
      - path: README.md
        template: "Custom docs for {{ company_name }}"
"#;

    #[test]
    fn test_parse_overlay() {
        let overlay = TemplateOverlay::from_yaml(OVERLAY).unwrap();
        assert_eq!(overlay.components.len(), 2);
        assert_eq!(overlay.components[0].files[0].requires, vec![ContextField::CompanyName]);
        assert!(overlay.components[1].name.is_none());
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = TemplateOverlay::from_yaml("  \n").unwrap();
        assert!(overlay.components.is_empty());
    }

    #[test]
    fn test_apply_adds_and_replaces() {
        let overlay = TemplateOverlay::from_yaml(OVERLAY).unwrap();
        let catalog = Catalog::builtin().unwrap();
        let (catalog, table) = overlay
            .apply(&catalog, TemplateTable::builtin().unwrap())
            .unwrap();

        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.list_components().last().unwrap().id.as_str(), "sso");
        assert_eq!(catalog.get("sso").unwrap().name, "Single Sign-On");

        let docs = table.get("docs").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "README.md");
        // The existing descriptor is untouched
        assert!(!catalog.get("docs").unwrap().required);
    }

    #[test]
    fn test_descriptor_fields_for_existing_component() {
        let yaml = r#"
components:
  - id: database
    required: false
    approx_size_bytes: 1
    files:
      - path: schema.sql
        template: "-- {{ company_name }}"
"#;
        let overlay = TemplateOverlay::from_yaml(yaml).unwrap();
        assert_eq!(
            overlay.components[0].descriptor_fields(),
            vec!["required", "approx_size_bytes"]
        );

        let before = Catalog::builtin().unwrap();
        let (catalog, table) = overlay
            .apply(&before, TemplateTable::builtin().unwrap())
            .unwrap();
        assert_eq!(catalog.get("database"), before.get("database"));
        assert!(catalog.get("database").unwrap().required);
        assert_eq!(table.get("database").unwrap().len(), 1);

        let files_only = TemplateOverlay::from_yaml(OVERLAY).unwrap();
        assert!(files_only.components[1].descriptor_fields().is_empty());
    }

    #[test]
    fn test_apply_rejects_escaping_path() {
        let yaml = r#"
components:
  - id: evil
    files:
      - path: ../../etc/passwd
        template: "x"
"#;
        let overlay = TemplateOverlay::from_yaml(yaml).unwrap();
        let err = overlay
            .apply(&Catalog::builtin().unwrap(), TemplateTable::builtin().unwrap())
            .unwrap_err();
        assert_eq!(err.component_id(), Some("evil"));
    }

    #[test]
    fn test_apply_rejects_bad_id() {
        let overlay = TemplateOverlay::from_yaml("components:\n  - id: Bad_Id\n").unwrap();
        let err = overlay
            .apply(&Catalog::builtin().unwrap(), TemplateTable::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponentId { .. }));
    }

    #[test]
    fn test_unknown_required_field_is_parse_error() {
        let yaml = r#"
components:
  - id: sso
    files:
      - path: a.conf
        template: "x"
        requires: [favourite_colour]
"#;
        assert!(matches!(
            TemplateOverlay::from_yaml(yaml),
            Err(Error::YamlParse(_))
        ));
    }
}
