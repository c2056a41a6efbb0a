//! # packwright-templates
//!
//! Template table and renderer for Packwright packages:
//! - Built-in templates for every catalog component, embedded at compile time
//! - Custom overlays loaded from YAML
//! - A Tera based renderer that turns a component and a customer into files

mod builtin;
pub mod overlay;
pub mod renderer;
pub mod table;
pub mod vars;

pub use overlay::{OverlayComponent, OverlayFile, TemplateOverlay};
pub use renderer::TemplateRenderer;
pub use table::{TemplateSpec, TemplateTable};
pub use vars::{ContextField, TemplateVars};
