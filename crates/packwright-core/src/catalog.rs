//! Component catalog
//!
//! The catalog is the ordered, immutable registry of every component the
//! assembler can generate. Its order is the processing order of every
//! assembly run, which is what keeps archive contents reproducible.

use crate::error::{Error, Result};
use crate::types::{ComponentDescriptor, ComponentId};
use std::collections::{BTreeSet, HashMap};

/// Built-in components: (id, name, description, required, approximate size)
const BUILTIN_COMPONENTS: &[(&str, &str, &str, bool, u64)] = &[
    (
        "frontend",
        "Web Frontend",
        "Static console bundle served by nginx",
        true,
        2_400_000,
    ),
    (
        "backend",
        "Application Server",
        "API service configuration and environment",
        true,
        18_000_000,
    ),
    (
        "database",
        "Database Scripts",
        "PostgreSQL schema, seed data and migration runner",
        true,
        350_000,
    ),
    (
        "docker",
        "Container Orchestration",
        "docker-compose stack wiring all services together",
        false,
        12_000,
    ),
    (
        "monitoring",
        "Monitoring",
        "Prometheus scrape configuration and alert rules",
        false,
        40_000,
    ),
    (
        "security",
        "Security Hardening",
        "TLS settings, firewall rules and hardening checklist",
        false,
        25_000,
    ),
    (
        "docs",
        "Documentation",
        "Installation and operations guides",
        false,
        1_200_000,
    ),
];

/// Ordered registry of generatable components
#[derive(Debug, Clone)]
pub struct Catalog {
    components: Vec<ComponentDescriptor>,
    index: HashMap<ComponentId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the given order
    pub fn new(components: Vec<ComponentDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(components.len());
        for (position, component) in components.iter().enumerate() {
            if index.insert(component.id.clone(), position).is_some() {
                return Err(Error::duplicate_component(component.id.as_str()));
            }
        }

        Ok(Self { components, index })
    }

    /// The built-in component catalog
    pub fn builtin() -> Result<Self> {
        let components = BUILTIN_COMPONENTS
            .iter()
            .map(|(id, name, description, required, size)| {
                Ok(ComponentDescriptor {
                    id: ComponentId::new(*id)?,
                    name: name.to_string(),
                    description: description.to_string(),
                    required: *required,
                    approx_size_bytes: *size,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(components)
    }

    /// Return a new catalog with extra components appended
    pub fn extended(&self, extra: Vec<ComponentDescriptor>) -> Result<Self> {
        let mut components = self.components.clone();
        components.extend(extra);
        Self::new(components)
    }

    /// All components in catalog order
    pub fn list_components(&self) -> &[ComponentDescriptor] {
        &self.components
    }

    /// Ids of every required component
    pub fn required_ids(&self) -> BTreeSet<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.required)
            .map(|c| c.id.clone())
            .collect()
    }

    /// Check whether an id is in the catalog
    pub fn exists(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a component by id
    pub fn get(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.index.get(id).map(|&position| &self.components[position])
    }

    /// Sum of the size hints of the given ids; unknown ids count as zero
    pub fn estimate_size<'a, I>(&self, ids: I) -> u64
    where
        I: IntoIterator<Item = &'a ComponentId>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id.as_str()))
            .map(|c| c.approx_size_bytes)
            .sum()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, required: bool) -> ComponentDescriptor {
        ComponentDescriptor::new(id, id, "", required, 100).unwrap()
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), BUILTIN_COMPONENTS.len());
        assert!(catalog.exists("frontend"));
        assert!(catalog.exists("docs"));
        assert!(!catalog.exists("billing"));
    }

    #[test]
    fn test_builtin_ids_are_valid() {
        for (id, ..) in BUILTIN_COMPONENTS {
            assert!(ComponentId::new(*id).is_ok(), "{} should be a valid id", id);
        }
    }

    #[test]
    fn test_required_ids() {
        let catalog = Catalog::builtin().unwrap();
        let required: Vec<_> = catalog
            .required_ids()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(required, vec!["backend", "database", "frontend"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let catalog = Catalog::new(vec![
            descriptor("zeta", false),
            descriptor("alpha", true),
            descriptor("mid", false),
        ])
        .unwrap();

        let ids: Vec<_> = catalog
            .list_components()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::new(vec![descriptor("docs", false), descriptor("docs", true)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateComponent { id } if id == "docs"));
    }

    #[test]
    fn test_get_and_estimate_size() {
        let catalog = Catalog::new(vec![descriptor("a", true), descriptor("b", false)]).unwrap();
        assert_eq!(catalog.get("b").unwrap().approx_size_bytes, 100);
        assert!(catalog.get("c").is_none());

        let ids = catalog.required_ids();
        assert_eq!(catalog.estimate_size(&ids), 100);

        let all: Vec<_> = catalog.list_components().iter().map(|c| c.id.clone()).collect();
        assert_eq!(catalog.estimate_size(&all), 200);
    }

    #[test]
    fn test_extended_appends_in_order() {
        let catalog = Catalog::new(vec![descriptor("a", true)]).unwrap();
        let extended = catalog.extended(vec![descriptor("sso", false)]).unwrap();
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.list_components()[1].id.as_str(), "sso");

        assert!(catalog.extended(vec![descriptor("a", false)]).is_err());
    }
}
