//! Rule registry: the read-only rule catalog for a run

use std::collections::HashMap;
use std::sync::Arc;

use crate::rules::Rule;
use crate::types::{Error, Result};

/// A keyed store of rules, unique by id, with a secondary index mapping
/// names and aliases back to ids.
///
/// Constructed explicitly at startup and read-only afterwards; tests build
/// their own registries instead of patching a global.
#[derive(Default, Clone)]
pub struct Registry {
    by_id: HashMap<String, Arc<dyn Rule>>,
    by_name: HashMap<String, String>,
    order: Vec<String>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated with the built-in rule set.
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        for rule in crate::rules::builtin_rules() {
            registry
                .register(rule)
                .expect("built-in rule ids are unique");
        }
        registry
    }

    /// Register a rule. Ids are unique; names and aliases must not collide
    /// with existing entries.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        let id = rule.id().to_uppercase();
        if self.by_id.contains_key(&id) {
            return Err(Error::Internal(format!("duplicate rule id: {id}")));
        }
        for name in std::iter::once(rule.name()).chain(rule.aliases().iter().copied()) {
            let key = name.to_lowercase();
            if self.by_name.contains_key(&key) {
                return Err(Error::Internal(format!("duplicate rule name: {name}")));
            }
            self.by_name.insert(key, id.clone());
        }
        self.order.push(id.clone());
        self.by_id.insert(id, rule);
        Ok(())
    }

    /// Look up a rule by canonical id.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.by_id.get(&id.to_uppercase())
    }

    /// Resolve an id, name, or alias to the canonical id.
    pub fn resolve(&self, ident: &str) -> Result<String> {
        let upper = ident.to_uppercase();
        if self.by_id.contains_key(&upper) {
            return Ok(upper);
        }
        self.by_name
            .get(&ident.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownRule(ident.to_string()))
    }

    /// Iterate rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.order.iter().map(|id| &self.by_id[id])
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.order)
            .finish()
    }
}
