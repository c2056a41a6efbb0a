//! Command implementations

pub mod estimate;
pub mod generate;
pub mod list;

use anyhow::{Context, Result};
use camino::Utf8Path;
use packwright_assembler::PackageAssembler;
use packwright_core::{PackwrightConfig, SelectionChange, SelectionSet};

use crate::cli::SelectionArgs;
use crate::output;

/// Load configuration and build an assembler from it
pub(crate) fn load_assembler(config_path: Option<&Utf8Path>) -> Result<PackageAssembler> {
    let config = PackwrightConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(path) = &config.config_path {
        tracing::debug!("Loaded configuration from {}", path);
    }
    PackageAssembler::from_config(&config).context("Failed to load templates")
}

/// Apply `--with` then `--without` to a fresh selection
pub(crate) fn build_selection(
    assembler: &PackageAssembler,
    args: &SelectionArgs,
) -> Result<SelectionSet> {
    let mut selection = assembler.new_selection();

    for id in &args.with {
        selection
            .insert(id)
            .with_context(|| format!("Cannot include '{}'", id))?;
    }
    for id in &args.without {
        let change = selection
            .remove(id)
            .with_context(|| format!("Cannot exclude '{}'", id))?;
        if change == SelectionChange::Unchanged && is_required(&selection, id) {
            output::warning(&format!("{} is required and stays selected", id));
        }
    }

    Ok(selection)
}

fn is_required(selection: &SelectionSet, id: &str) -> bool {
    selection.catalog().get(id).is_some_and(|c| c.required)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> PackageAssembler {
        PackageAssembler::from_config(&PackwrightConfig::default()).unwrap()
    }

    #[test]
    fn test_build_selection_with_and_without() {
        let args = SelectionArgs {
            with: vec!["docs".into(), "security".into()],
            without: vec!["security".into(), "frontend".into()],
        };
        let selection = build_selection(&assembler(), &args).unwrap();

        assert!(selection.contains("docs"));
        assert!(!selection.contains("security"));
        assert!(selection.contains("frontend"));
    }

    #[test]
    fn test_build_selection_unknown_id() {
        let args = SelectionArgs {
            with: vec!["billing".into()],
            without: vec![],
        };
        let err = build_selection(&assembler(), &args).unwrap_err();
        assert!(err.to_string().contains("billing"));
    }
}
