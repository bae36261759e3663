use xs_core::{BASELINE_NAME, Variant, VariantCatalog};

use super::{EntryRegistry, passes_filter};
use crate::entry::{ChanceEntry, RAW_MAX};
use crate::error::ChanceResult;
use crate::fit::fit_in_loop;
use crate::persist::RegistryConfig;

impl EntryRegistry {
    /// Attach every variant of the catalog and resolve the distribution.
    ///
    /// Stored configurations are picked up as their variants attach. Nothing
    /// is written to the owner category until the whole registry is
    /// resolved.
    pub fn initialize(&mut self, catalog: &VariantCatalog) -> ChanceResult<()> {
        self.initialized = false;
        for variant in catalog.variants() {
            self.attach(variant)?;
        }
        self.resolve_all()?;
        self.initialized = true;
        self.sync_store();
        log::info!(
            "initialized registry {} with {} entries ({} unloaded)",
            self.owner,
            self.entries.len(),
            self.unloaded.len()
        );
        Ok(())
    }

    /// Give `variant` an entry in this registry.
    ///
    /// A stored configuration for its name is used if present, otherwise the
    /// entry starts at its default. An entry of the same name but a
    /// different variant switches identity and keeps its value.
    pub fn attach(&mut self, variant: &Variant) -> ChanceResult<()> {
        if let Some(existing) = self.entries.get(&variant.name) {
            if existing.variant() == variant {
                return Ok(());
            }
            return self.switch_entry_identity(&variant.name, variant.clone());
        }

        let config = self.unloaded.remove(&variant.name).unwrap_or_default();
        let default_value = self.default_for(variant);
        let entry = ChanceEntry::new(variant.clone(), &config, default_value);
        log::debug!(
            "{}: attached {} at {}/1000",
            self.owner,
            variant.name,
            entry.raw_value()
        );
        self.entries.insert(variant.name.clone(), entry);
        self.refresh_baseline_default();

        if self.initialized {
            self.resolve_entry(&variant.name, true)?;
        }
        Ok(())
    }

    /// Drop the entry for a variant that was deleted.
    ///
    /// If a built-in variant of the same name exists, the entry falls back
    /// to it with its configured value instead. The baseline is never
    /// removed.
    pub fn remove_entry(&mut self, name: &str, catalog: &VariantCatalog) -> ChanceResult<()> {
        let Some(entry) = self.entries.get(name) else {
            self.unloaded.remove(name);
            return Ok(());
        };
        if entry.variant().is_baseline() {
            return Ok(());
        }
        if let Some(builtin) = catalog.builtin(name) {
            if entry.variant() != builtin {
                return self.switch_entry_identity(name, builtin.clone());
            }
            return Ok(());
        }

        self.unloaded.remove(name);
        self.disable(name, true)?;
        self.entries.remove(name);
        self.refresh_baseline_default();
        log::debug!("{}: detached {}", self.owner, name);
        self.rebalance()
    }

    /// Point the entry `name` at another variant of the same name, keeping
    /// its mode and value.
    pub fn switch_entry_identity(&mut self, name: &str, variant: Variant) -> ChanceResult<()> {
        let entry = self.require(name)?;
        if entry.variant().is_baseline() {
            return Ok(());
        }
        let previous = entry.variant().clone();
        if previous.is_builtin() {
            self.publish(&previous.name, 0.0);
        }
        log::debug!(
            "{}: switching {} from {:?} to {:?}",
            self.owner,
            name,
            previous.origin,
            variant.origin
        );
        self.require_mut(name)?.set_variant(variant);
        self.resolve_entry(name, false)
    }

    /// Restore every entry to its default and the filter to its default.
    /// Stored configurations of unknown variants are discarded.
    pub fn reset(&mut self) -> ChanceResult<()> {
        self.counter = 0;
        self.distribute_among_all = false;
        self.allow_rare = self.config.allow_rare_by_default;
        self.unloaded.clear();
        for entry in self.entries.values_mut() {
            entry.reset_to_default();
        }
        self.resolve_all()?;
        self.sync_store();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Returns true if anything in this registry differs from its default.
    pub fn requires_saving(&self) -> bool {
        let epsilon = self.config.epsilon;
        self.allow_rare != self.config.allow_rare_by_default
            || !self.unloaded.is_empty()
            || self
                .entries
                .values()
                .any(|e| !e.is_absolute() || !e.is_default(epsilon))
    }

    /// Snapshot the registry for saving, or `None` if there is nothing worth
    /// saving.
    pub fn expose(&self) -> Option<RegistryConfig> {
        if self.config.skip_default_on_save && !self.requires_saving() {
            return None;
        }
        let mut entries = self.unloaded.clone();
        entries.extend(
            self.entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.config())),
        );
        Some(RegistryConfig {
            allow_rare: self.allow_rare,
            entries,
        })
    }

    /// Load a saved snapshot. Configurations of variants not attached yet
    /// are kept until they are.
    pub fn load(&mut self, config: &RegistryConfig) -> ChanceResult<()> {
        self.allow_rare = config.allow_rare;
        for (name, entry_config) in &config.entries {
            match self.entries.get_mut(name) {
                Some(entry) => entry.apply_config(entry_config),
                None => {
                    self.unloaded.insert(name.clone(), entry_config.clone());
                }
            }
        }
        if self.initialized {
            self.resolve_all()?;
            self.sync_store();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Bring the whole registry back to a valid distribution without
    /// touching user-edited relations more than needed.
    pub(super) fn resolve_all(&mut self) -> ChanceResult<()> {
        let allow_rare = self.allow_rare;
        for entry in self
            .entries
            .values_mut()
            .filter(|e| !passes_filter(allow_rare, e.variant()))
        {
            entry.set_is_absolute(true);
            entry.set_raw_value(0);
        }

        self.update_baseline();
        if self.absolute_sum() > RAW_MAX {
            let candidates = self
                .entries
                .values_mut()
                .filter(|e| e.is_absolute() && passes_filter(allow_rare, e.variant()))
                .collect();
            fit_in_loop(candidates, RAW_MAX, &mut self.counter)?;
            self.update_baseline();
        }
        self.recompute_weighted()
    }

    /// Re-run the mutation pipeline for one entry, zeroing it first if the
    /// filter rejects it.
    pub(super) fn resolve_entry(
        &mut self,
        name: &str,
        adjust_if_necessary: bool,
    ) -> ChanceResult<()> {
        if self.is_allowed(self.require(name)?) {
            self.set_entry_chance(name, adjust_if_necessary)
        } else {
            self.disable(name, adjust_if_necessary)
        }
    }

    fn default_for(&self, variant: &Variant) -> f32 {
        if variant.is_baseline() {
            return self.baseline_default();
        }
        let category = self.category.borrow();
        if variant.is_builtin() {
            category
                .find_chance(&self.owner, &variant.name)
                .unwrap_or(0.0)
        } else {
            category.default_weight_for(&self.owner, variant)
        }
    }

    fn baseline_default(&self) -> f32 {
        let others: f32 = self
            .entries
            .values()
            .filter(|e| !e.variant().is_baseline())
            .map(ChanceEntry::default_value)
            .sum();
        (1.0 - others).max(0.0)
    }

    fn refresh_baseline_default(&mut self) {
        let default = self.baseline_default();
        let epsilon = self.config.epsilon;
        if let Some(baseline) = self.entries.get_mut(BASELINE_NAME) {
            baseline.set_default_value(default, epsilon);
        }
    }

    /// Write one chance to the owner category, if propagation is on.
    pub(super) fn publish(&self, variant: &str, chance: f32) {
        if self.initialized && self.config.propagate_builtin {
            self.category
                .borrow_mut()
                .set_chance(&self.owner, variant, chance);
        }
    }
}
