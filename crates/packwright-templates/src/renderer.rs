//! Template renderer
//!
//! Maps `(component id, customer context, instant)` to the component's
//! generated files. All templates are compiled up front, so a renderer that
//! was constructed successfully only fails at render time on missing context
//! fields or undefined variables.

use crate::builtin::{LICENSE_TEMPLATE, VERSION_TEMPLATE};
use crate::overlay::TemplateOverlay;
use crate::table::{validate_body, TemplateTable};
use crate::vars::TemplateVars;
use chrono::{DateTime, Utc};
use packwright_core::config::ProductConfig;
use packwright_core::types::{LICENSE_FILENAME, VERSION_FILENAME};
use packwright_core::{
    Catalog, CustomerContext, Error, GeneratedFile, LicenseRecord, PackwrightConfig, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Tera;
use tracing::debug;

/// Tera global functions that would read state outside the render inputs
const DISABLED_FUNCTIONS: [&str; 5] = ["get_env", "now", "get_random", "range", "throw"];

/// Compiled templates for every component of a catalog
pub struct TemplateRenderer {
    catalog: Arc<Catalog>,
    table: TemplateTable,
    product: ProductConfig,
    tera: Tera,
}

impl TemplateRenderer {
    /// Compile a template table against a catalog.
    ///
    /// Fails with `UnknownComponent` if the table names a component the
    /// catalog does not know, and with `TemplateError` on a syntax error or
    /// on anything other than plain `{{ variable }}` interpolation.
    pub fn new(catalog: Arc<Catalog>, table: TemplateTable, product: ProductConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for name in DISABLED_FUNCTIONS {
            tera.register_function(
                name,
                move |_: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
                    Err(tera::Error::msg(format!("function '{}' is not available", name)))
                },
            );
        }

        compile(&mut tera, LICENSE_FILENAME, LICENSE_TEMPLATE).map_err(Error::template_unattributed)?;
        compile(&mut tera, VERSION_FILENAME, VERSION_TEMPLATE).map_err(Error::template_unattributed)?;

        for (component, specs) in table.iter() {
            if !catalog.exists(component.as_str()) {
                tracing::error!("Template table names unknown component: {}", component);
                return Err(Error::unknown_component(component.as_str()));
            }
            for spec in specs {
                compile(&mut tera, &template_name(component.as_str(), &spec.path), &spec.body)
                    .map_err(|e| Error::template(component.as_str(), format!("{}: {}", spec.path, e)))?;
            }
        }

        for component in catalog.list_components() {
            if !table.contains(component.id.as_str()) {
                tracing::warn!("Component has no templates: {}", component.id);
            }
        }

        Ok(Self {
            catalog,
            table,
            product,
            tera,
        })
    }

    /// Renderer for the built-in catalog and templates
    pub fn builtin(product: ProductConfig) -> Result<Self> {
        Self::new(Arc::new(Catalog::builtin()?), TemplateTable::builtin()?, product)
    }

    /// Renderer for the built-in templates plus the overlay named in the config
    pub fn from_config(config: &PackwrightConfig) -> Result<Self> {
        let catalog = Catalog::builtin()?;
        let table = TemplateTable::builtin()?;

        let (catalog, table) = match config.templates_path() {
            Some(path) => TemplateOverlay::from_file(&path)?.apply(&catalog, table)?,
            None => (catalog, table),
        };

        Self::new(Arc::new(catalog), table, config.product().clone())
    }

    /// Catalog the templates were validated against
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Product metadata stamped into templates
    pub fn product(&self) -> &ProductConfig {
        &self.product
    }

    /// Variables for one customer at one instant
    pub fn vars(&self, ctx: &CustomerContext, now: DateTime<Utc>) -> TemplateVars {
        TemplateVars::new(ctx, &self.product, now)
    }

    /// Render all files of a component
    pub fn render(
        &self,
        component_id: &str,
        ctx: &CustomerContext,
        now: DateTime<Utc>,
    ) -> Result<Vec<GeneratedFile>> {
        self.render_with(component_id, &self.vars(ctx, now))
    }

    /// Render all files of a component with prepared variables
    pub fn render_with(&self, component_id: &str, vars: &TemplateVars) -> Result<Vec<GeneratedFile>> {
        if !self.catalog.exists(component_id) {
            return Err(Error::unknown_component(component_id));
        }
        let Some(specs) = self.table.get(component_id) else {
            return Ok(Vec::new());
        };

        let context = vars
            .to_tera_context()
            .map_err(|e| Error::template(component_id, describe(&e)))?;

        let mut files = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(field) = spec
                .requires
                .iter()
                .find(|f| vars.field(**f).trim().is_empty())
            {
                return Err(Error::template(
                    component_id,
                    format!("{} requires '{}' but it is empty", spec.path, field),
                ));
            }

            let name = template_name(component_id, &spec.path);
            debug!("Rendering template: {}", name);
            let rendered = self.tera.render(&name, &context).map_err(|e| {
                Error::template(component_id, format!("{}: {}", spec.path, describe(&e)))
            })?;
            files.push(GeneratedFile::new(name, rendered));
        }

        Ok(files)
    }

    /// Render `LICENSE.txt` for a license record
    pub fn render_license(&self, license: &LicenseRecord) -> Result<GeneratedFile> {
        if license.company_name.trim().is_empty() {
            return Err(Error::template_unattributed(format!(
                "{} requires 'company_name' but it is empty",
                LICENSE_FILENAME
            )));
        }
        self.render_top_level(LICENSE_FILENAME, &TemplateVars::from_license(license, &self.product))
    }

    /// Render the `VERSION.txt` marker
    pub fn render_version(&self, license: &LicenseRecord) -> Result<GeneratedFile> {
        self.render_top_level(VERSION_FILENAME, &TemplateVars::from_license(license, &self.product))
    }

    fn render_top_level(&self, name: &str, vars: &TemplateVars) -> Result<GeneratedFile> {
        let context = vars
            .to_tera_context()
            .map_err(|e| Error::template_unattributed(describe(&e)))?;
        debug!("Rendering template: {}", name);
        let rendered = self
            .tera
            .render(name, &context)
            .map_err(|e| Error::template_unattributed(format!("{}: {}", name, describe(&e))))?;
        Ok(GeneratedFile::new(name, rendered))
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("components", &self.catalog.len())
            .field("product", &self.product.slug)
            .finish_non_exhaustive()
    }
}

/// Register one template after checking it only interpolates variables
fn compile(tera: &mut Tera, name: &str, body: &str) -> std::result::Result<(), String> {
    validate_body(body)?;
    tera.add_raw_template(name, body).map_err(|e| describe(&e))
}

/// Archive path and Tera name of a component template
fn template_name(component: &str, path: &str) -> String {
    format!("{}/{}", component, path)
}

/// Flatten a Tera error and its sources into one line
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}
