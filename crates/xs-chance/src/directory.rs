//! One registry per owner of a category kind.

use std::collections::BTreeMap;
use std::fmt;

use xs_core::{SharedCategory, Variant, VariantCatalog};

use crate::config::EngineConfig;
use crate::error::ChanceResult;
use crate::persist::DirectoryState;
use crate::registry::EntryRegistry;

/// All registries of one category kind, keyed by owner.
pub struct RegistryDirectory {
    kind: String,
    category: SharedCategory,
    config: EngineConfig,
    registries: BTreeMap<String, EntryRegistry>,
}

impl fmt::Debug for RegistryDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryDirectory")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("registries", &self.registries)
            .finish_non_exhaustive()
    }
}

impl RegistryDirectory {
    /// Create an empty directory for a category.
    pub fn new(category: SharedCategory, config: EngineConfig) -> Self {
        let kind = category.borrow().stable_name().to_string();
        Self {
            kind,
            category,
            config,
            registries: BTreeMap::new(),
        }
    }

    /// Stable name of the category kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The engine configuration handed to new registries.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the category is available in the current session.
    pub fn is_active(&self) -> bool {
        self.category.borrow().is_active()
    }

    /// The registry of `owner`, created empty on first access.
    pub fn for_owner(&mut self, owner: &str) -> &mut EntryRegistry {
        let category = &self.category;
        let config = &self.config;
        let kind = &self.kind;
        self.registries.entry(owner.to_string()).or_insert_with(|| {
            log::debug!("{kind}: creating registry for {owner}");
            EntryRegistry::new(owner, category.clone(), config.clone())
        })
    }

    /// The registry of `owner`, if one exists.
    pub fn get(&self, owner: &str) -> Option<&EntryRegistry> {
        self.registries.get(owner)
    }

    /// All registries in owner order.
    pub fn registries(&self) -> impl Iterator<Item = &EntryRegistry> {
        self.registries.values()
    }

    /// Number of registries created so far.
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Returns true if no registry was created yet.
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// Owners listed by the category plus any that already have a registry.
    fn known_owners(&self) -> Vec<String> {
        let mut owners = self.category.borrow().owners();
        owners.extend(self.registries.keys().cloned());
        owners.sort();
        owners.dedup();
        owners
    }

    /// Initialize a registry for every known owner.
    pub fn initialize_all(&mut self, catalog: &VariantCatalog) -> ChanceResult<()> {
        for owner in self.known_owners() {
            self.for_owner(&owner).initialize(catalog)?;
        }
        log::info!("{}: initialized {} registries", self.kind, self.registries.len());
        Ok(())
    }

    /// Attach a variant in every registry.
    pub fn add_variant(&mut self, variant: &Variant) -> ChanceResult<()> {
        for owner in self.known_owners() {
            self.for_owner(&owner).attach(variant)?;
        }
        Ok(())
    }

    /// Remove a variant from every registry.
    pub fn remove_variant(&mut self, name: &str, catalog: &VariantCatalog) -> ChanceResult<()> {
        for owner in self.known_owners() {
            self.for_owner(&owner).remove_entry(name, catalog)?;
        }
        Ok(())
    }

    /// Reset every registry to defaults.
    pub fn reset_all(&mut self) -> ChanceResult<()> {
        for registry in self.registries.values_mut() {
            registry.reset()?;
        }
        log::info!("{}: reset {} registries", self.kind, self.registries.len());
        Ok(())
    }

    /// Saved state of every registry that differs from its default.
    pub fn expose(&self) -> Option<DirectoryState> {
        let state: DirectoryState = self
            .registries
            .iter()
            .filter_map(|(owner, registry)| Some((owner.clone(), registry.expose()?)))
            .collect();
        (!state.is_empty()).then_some(state)
    }

    /// Load saved registries, creating them as needed.
    pub fn load(&mut self, state: &DirectoryState) -> ChanceResult<()> {
        for (owner, config) in state {
            self.for_owner(owner).load(config)?;
        }
        Ok(())
    }
}
