//! Selection set for a packaging session
//!
//! A selection always contains every required component of its catalog. The
//! removal path refuses required ids, so the invariant holds without any
//! after-the-fact check.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::types::ComponentId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Outcome of a selection mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// Nothing changed (required id, or already in the requested state)
    Unchanged,
}

/// User-controlled set of selected component ids
#[derive(Debug, Clone)]
pub struct SelectionSet {
    catalog: Arc<Catalog>,
    selected: BTreeSet<ComponentId>,
}

impl SelectionSet {
    /// Create a selection seeded with the catalog's required components
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let selected = catalog.required_ids();
        Self { catalog, selected }
    }

    /// Flip the membership of an optional component.
    ///
    /// Toggling a required component is a no-op. Unknown ids are rejected.
    pub fn toggle(&mut self, id: &str) -> Result<SelectionChange> {
        let (component_id, required) = self.lookup(id)?;
        if required {
            tracing::debug!("Ignoring toggle of required component: {}", id);
            return Ok(SelectionChange::Unchanged);
        }

        if self.selected.remove(id) {
            Ok(SelectionChange::Removed)
        } else {
            self.selected.insert(component_id);
            Ok(SelectionChange::Added)
        }
    }

    /// Add a component to the selection
    pub fn insert(&mut self, id: &str) -> Result<SelectionChange> {
        let (component_id, _) = self.lookup(id)?;
        if self.selected.insert(component_id) {
            Ok(SelectionChange::Added)
        } else {
            Ok(SelectionChange::Unchanged)
        }
    }

    /// Remove an optional component; removing a required one is a no-op
    pub fn remove(&mut self, id: &str) -> Result<SelectionChange> {
        let (_, required) = self.lookup(id)?;
        if required {
            tracing::debug!("Ignoring removal of required component: {}", id);
            return Ok(SelectionChange::Unchanged);
        }

        if self.selected.remove(id) {
            Ok(SelectionChange::Removed)
        } else {
            Ok(SelectionChange::Unchanged)
        }
    }

    /// Snapshot of the selected ids
    pub fn current(&self) -> BTreeSet<ComponentId> {
        self.selected.clone()
    }

    /// Selected ids in catalog order
    pub fn ordered(&self) -> Vec<ComponentId> {
        self.catalog
            .list_components()
            .iter()
            .filter(|c| self.selected.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Size hint for the selected components
    pub fn estimated_size(&self) -> u64 {
        self.catalog.estimate_size(&self.selected)
    }

    /// Catalog this selection validates against
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Resolve an id against the catalog: (canonical id, required flag)
    fn lookup(&self, id: &str) -> Result<(ComponentId, bool)> {
        self.catalog
            .get(id)
            .map(|c| (c.id.clone(), c.required))
            .ok_or_else(|| Error::unknown_component(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentDescriptor;

    fn scenario_catalog() -> Arc<Catalog> {
        let components = vec![
            ComponentDescriptor::new("frontend", "Frontend", "", true, 10).unwrap(),
            ComponentDescriptor::new("database", "Database", "", true, 20).unwrap(),
            ComponentDescriptor::new("docs", "Docs", "", false, 30).unwrap(),
            ComponentDescriptor::new("security", "Security", "", false, 40).unwrap(),
        ];
        Arc::new(Catalog::new(components).unwrap())
    }

    fn ids(selection: &SelectionSet) -> Vec<String> {
        selection.ordered().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_new_seeds_required() {
        let selection = SelectionSet::new(scenario_catalog());
        assert_eq!(ids(&selection), vec!["frontend", "database"]);
        assert_eq!(selection.estimated_size(), 30);
    }

    #[test]
    fn test_toggle_required_is_noop() {
        let mut selection = SelectionSet::new(scenario_catalog());
        let before = selection.current();

        assert_eq!(selection.toggle("frontend").unwrap(), SelectionChange::Unchanged);
        assert_eq!(selection.toggle("frontend").unwrap(), SelectionChange::Unchanged);
        assert_eq!(selection.current(), before);
    }

    #[test]
    fn test_toggle_optional_adds_then_removes() {
        let mut selection = SelectionSet::new(scenario_catalog());

        assert_eq!(selection.toggle("docs").unwrap(), SelectionChange::Added);
        assert!(selection.contains("docs"));

        assert_eq!(selection.toggle("docs").unwrap(), SelectionChange::Removed);
        assert!(!selection.contains("docs"));
    }

    #[test]
    fn test_toggle_unknown_is_error() {
        let mut selection = SelectionSet::new(scenario_catalog());
        let before = selection.current();

        let err = selection.toggle("billing").unwrap_err();
        assert!(matches!(err, Error::UnknownComponent { id } if id == "billing"));
        assert_eq!(selection.current(), before);
    }

    #[test]
    fn test_remove_required_is_noop() {
        let mut selection = SelectionSet::new(scenario_catalog());
        assert_eq!(selection.remove("database").unwrap(), SelectionChange::Unchanged);
        assert!(selection.contains("database"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut selection = SelectionSet::new(scenario_catalog());
        assert_eq!(selection.insert("security").unwrap(), SelectionChange::Added);
        assert_eq!(selection.insert("security").unwrap(), SelectionChange::Unchanged);
        assert_eq!(ids(&selection), vec!["frontend", "database", "security"]);

        assert_eq!(selection.remove("security").unwrap(), SelectionChange::Removed);
        assert_eq!(selection.remove("security").unwrap(), SelectionChange::Unchanged);
        assert!(selection.insert("nope").is_err());
    }

    #[test]
    fn test_required_always_present_across_toggles() {
        let catalog = scenario_catalog();
        let required = catalog.required_ids();
        let mut selection = SelectionSet::new(catalog);

        let sequence = [
            "docs", "frontend", "security", "database", "docs", "frontend", "security",
            "security", "database", "docs",
        ];
        for id in sequence {
            selection.toggle(id).unwrap();
            assert!(required.is_subset(&selection.current()));
        }
    }

    #[test]
    fn test_ordered_follows_catalog_not_insertion() {
        let mut selection = SelectionSet::new(scenario_catalog());
        selection.insert("security").unwrap();
        selection.insert("docs").unwrap();
        assert_eq!(
            ids(&selection),
            vec!["frontend", "database", "docs", "security"]
        );
    }
}
