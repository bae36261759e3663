//! The per-owner distribution engine.
//!
//! An [`EntryRegistry`] holds one [`ChanceEntry`] per known variant for a
//! single owner (a faction, a meme, a pawn kind, ...) and keeps the allowed
//! entries summing to exactly 100%.
//!
//! Every mutation funnels through [`EntryRegistry::set_entry_chance`], which
//! runs in fixed phases:
//!
//! 1. shrink other absolute entries so absolutes never exceed 100%, or, if
//!    the baseline itself was edited, spread its change over the others;
//! 2. derive the baseline as whatever the other absolutes leave;
//! 3. redistribute the unclaimed share over the weighted entries;
//! 4. write built-in chances back to the owner category.

mod balance;
mod lifecycle;
mod templates;

use std::collections::BTreeMap;
use std::fmt;

use xs_core::{BASELINE_NAME, SharedCategory, Variant};

use crate::config::EngineConfig;
use crate::entry::{ChanceEntry, EntryConfig, RAW_MAX};
use crate::error::{ChanceError, ChanceResult};
use crate::input::{interpret_percentage, interpret_weight};

/// All chance entries of one owner.
pub struct EntryRegistry {
    owner: String,
    category: SharedCategory,
    config: EngineConfig,
    allow_rare: bool,
    entries: BTreeMap<String, ChanceEntry>,
    unloaded: BTreeMap<String, EntryConfig>,
    distribute_among_all: bool,
    counter: usize,
    initialized: bool,
}

impl fmt::Debug for EntryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRegistry")
            .field("owner", &self.owner)
            .field("allow_rare", &self.allow_rare)
            .field("entries", &self.entries)
            .field("unloaded", &self.unloaded)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

fn passes_filter(allow_rare: bool, variant: &Variant) -> bool {
    variant.is_baseline() || allow_rare || !variant.rare
}

impl EntryRegistry {
    /// Create an empty registry for `owner`. Call [`EntryRegistry::initialize`]
    /// to attach the catalog's variants.
    pub fn new(owner: impl Into<String>, category: SharedCategory, config: EngineConfig) -> Self {
        Self {
            owner: owner.into(),
            category,
            allow_rare: config.allow_rare_by_default,
            config,
            entries: BTreeMap::new(),
            unloaded: BTreeMap::new(),
            distribute_among_all: false,
            counter: 0,
            initialized: false,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The owner this registry configures.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether [`EntryRegistry::initialize`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether rare variants may hold a chance.
    pub fn allow_rare(&self) -> bool {
        self.allow_rare
    }

    /// Look up a loaded entry.
    pub fn entry(&self, name: &str) -> Option<&ChanceEntry> {
        self.entries.get(name)
    }

    /// All loaded entries, allowed or not, in name order.
    pub fn entries(&self) -> impl Iterator<Item = &ChanceEntry> {
        self.entries.values()
    }

    /// Entries passing the current filter.
    pub fn all_allowed_entries(&self) -> impl Iterator<Item = &ChanceEntry> {
        let allow_rare = self.allow_rare;
        self.entries
            .values()
            .filter(move |e| passes_filter(allow_rare, e.variant()))
    }

    /// (variant, raw chance) pairs of every allowed entry, for weighted
    /// selection by the host.
    pub fn allowed_chances(&self) -> Vec<(&Variant, i32)> {
        self.all_allowed_entries()
            .map(|e| (e.variant(), e.raw_value()))
            .collect()
    }

    /// Stored configurations whose variant is not currently known.
    pub fn unloaded_entries(&self) -> impl Iterator<Item = (&str, &EntryConfig)> {
        self.unloaded.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if the entry passes the current filter.
    pub fn is_allowed(&self, entry: &ChanceEntry) -> bool {
        passes_filter(self.allow_rare, entry.variant())
    }

    /// Returns true if every allowed entry is absolute.
    pub fn only_absolute(&self) -> bool {
        self.all_allowed_entries().all(ChanceEntry::is_absolute)
    }

    /// Returns true if every allowed entry is weighted.
    pub fn only_weighted(&self) -> bool {
        self.all_allowed_entries().all(|e| !e.is_absolute())
    }

    /// Sum of raw values over all allowed entries.
    pub fn allowed_sum(&self) -> i32 {
        self.all_allowed_entries().map(ChanceEntry::raw_value).sum()
    }

    /// Sum of allowed absolute raw values, baseline included.
    pub fn absolute_sum(&self) -> i32 {
        self.all_allowed_entries()
            .filter(|e| e.is_absolute())
            .map(ChanceEntry::raw_value)
            .sum()
    }

    fn absolute_sum_except_baseline(&self) -> i32 {
        self.all_allowed_entries()
            .filter(|e| e.is_absolute() && !e.variant().is_baseline())
            .map(ChanceEntry::raw_value)
            .sum()
    }

    /// Raw share left for weighted entries once absolutes are subtracted.
    pub fn weighted_pool(&self) -> i32 {
        (RAW_MAX - self.absolute_sum()).max(0)
    }

    /// The baseline's chance as a fraction.
    pub fn baseline_chance(&self) -> f32 {
        self.entries
            .get(BASELINE_NAME)
            .map(ChanceEntry::value)
            .unwrap_or(1.0)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Re-resolve the distribution after `name` changed.
    ///
    /// With `adjust_if_necessary`, other absolute entries are shrunk or grown
    /// to make room for the change. Without it, only the baseline and the
    /// weighted entries follow.
    pub fn set_entry_chance(&mut self, name: &str, adjust_if_necessary: bool) -> ChanceResult<()> {
        let entry = self.require(name)?;
        let raw = entry.raw_value();
        if raw != 0 && !self.is_allowed(entry) {
            return Err(ChanceError::DisallowedEntry {
                name: name.to_string(),
                raw,
            });
        }
        let is_absolute = entry.is_absolute();
        let is_baseline = entry.variant().is_baseline();

        if is_absolute {
            if !is_baseline {
                if adjust_if_necessary {
                    self.keep_absolutes_within_bounds(name)?;
                }
                self.update_baseline();
            } else if adjust_if_necessary {
                self.fit_absolutes_to_baseline()?;
                // Snaps back when there was nothing to absorb the edit.
                self.update_baseline();
            }
        }

        self.recompute_weighted()?;
        self.sync_store();
        Ok(())
    }

    /// Set an absolute entry's raw chance and rebalance the rest.
    pub fn set_chance(&mut self, name: &str, raw: i32) -> ChanceResult<()> {
        let allow_rare = self.allow_rare;
        let entry = self.require_mut(name)?;
        if !entry.is_absolute() {
            return Err(ChanceError::NotAbsolute(name.to_string()));
        }
        if raw != 0 && !passes_filter(allow_rare, entry.variant()) {
            return Err(ChanceError::DisallowedEntry {
                name: name.to_string(),
                raw,
            });
        }
        entry.set_raw_value(raw);
        self.set_entry_chance(name, true)
    }

    /// Set an entry's weight and rebalance.
    pub fn set_weight(&mut self, name: &str, weight: f32) -> ChanceResult<()> {
        self.require_mut(name)?.set_weight(weight);
        self.set_entry_chance(name, true)
    }

    /// Apply a percentage typed by the user, keeping in-progress text.
    pub fn set_chance_text(&mut self, name: &str, text: &str) -> ChanceResult<()> {
        let parsed = interpret_percentage(text);
        self.set_chance(name, (parsed.value * RAW_MAX as f32).round() as i32)?;
        self.require_mut(name)?.set_chance_text(parsed.text);
        Ok(())
    }

    /// Apply a weight typed by the user, keeping in-progress text.
    pub fn set_weight_text(&mut self, name: &str, text: &str) -> ChanceResult<()> {
        let parsed = interpret_weight(text);
        self.set_weight(name, parsed.value)?;
        self.require_mut(name)?.set_weight_text(parsed.text);
        Ok(())
    }

    /// Switch an entry between absolute and weighted mode without a visible
    /// jump in its effective chance.
    pub fn set_entry_mode(&mut self, name: &str, absolute: bool) -> ChanceResult<()> {
        if self.switch_mode(name, absolute)? {
            self.set_entry_chance(name, true)?;
        }
        Ok(())
    }

    /// Switch every allowed entry to one mode. Lowest chances go first, so
    /// when switching to weighted the smallest entry anchors the weights.
    pub fn set_is_absolute_for_allowed(&mut self, absolute: bool) -> ChanceResult<()> {
        let mut order: Vec<(i32, String)> = self
            .all_allowed_entries()
            .map(|e| (e.raw_value(), e.name().to_string()))
            .collect();
        order.sort_by_key(|(raw, _)| *raw);

        for (_, name) in &order {
            self.switch_mode(name, absolute)?;
        }
        self.rebalance()
    }

    /// Set the same weight on every allowed weighted entry.
    pub fn set_weight_for_allowed_weighted(&mut self, weight: f32) -> ChanceResult<()> {
        let allow_rare = self.allow_rare;
        for entry in self
            .entries
            .values_mut()
            .filter(|e| !e.is_absolute() && passes_filter(allow_rare, e.variant()))
        {
            entry.set_weight(weight);
        }
        self.rebalance()
    }

    /// Toggle the rare filter. Disallowing rare variants zeroes them;
    /// allowing them lets weighted rare entries back into the pool.
    pub fn set_allow_rare(&mut self, allow: bool) -> ChanceResult<()> {
        if allow == self.allow_rare {
            return Ok(());
        }
        self.allow_rare = allow;
        if allow {
            self.rebalance()
        } else {
            self.disable_disallowed()
        }
    }

    /// Force every entry failing the filter to absolute zero.
    pub fn disable_disallowed(&mut self) -> ChanceResult<()> {
        let disallowed: Vec<String> = self
            .entries
            .values()
            .filter(|e| !self.is_allowed(e))
            .map(|e| e.name().to_string())
            .collect();
        for name in disallowed {
            self.disable(&name, true)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require(&self, name: &str) -> ChanceResult<&ChanceEntry> {
        self.entries.get(name).ok_or_else(|| ChanceError::UnknownEntry {
            owner: self.owner.clone(),
            name: name.to_string(),
        })
    }

    fn require_mut(&mut self, name: &str) -> ChanceResult<&mut ChanceEntry> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| ChanceError::UnknownEntry {
                owner: self.owner.clone(),
                name: name.to_string(),
            })
    }

    /// Flip one entry's mode, inferring a weight when it becomes weighted.
    /// Returns true if the mode changed.
    fn switch_mode(&mut self, name: &str, absolute: bool) -> ChanceResult<bool> {
        let entry = self.require_mut(name)?;
        if entry.is_absolute() == absolute {
            return Ok(false);
        }
        entry.set_is_absolute(absolute);
        if !absolute {
            self.set_weight_from_absolute_value(name)?;
        }
        Ok(true)
    }

    fn disable(&mut self, name: &str, adjust_if_necessary: bool) -> ChanceResult<()> {
        let entry = self.require_mut(name)?;
        entry.set_is_absolute(true);
        entry.set_raw_value(0);
        self.set_entry_chance(name, adjust_if_necessary)
    }

    /// Re-derive baseline and weighted entries without adjusting absolutes.
    fn rebalance(&mut self) -> ChanceResult<()> {
        self.update_baseline();
        self.recompute_weighted()?;
        self.sync_store();
        Ok(())
    }

    /// Write every resolved built-in chance to the owner category.
    fn sync_store(&self) {
        for entry in self.entries.values() {
            let variant = entry.variant();
            if variant.is_builtin() && !variant.is_baseline() {
                self.publish(&variant.name, entry.value());
            }
        }
    }
}

#[cfg(test)]
mod tests;
