use xs_core::BASELINE_NAME;

use super::{EntryRegistry, passes_filter};
use crate::entry::{ChanceEntry, RAW_MAX};
use crate::error::{ChanceError, ChanceResult};
use crate::fit::fit_in_loop;

/// Allowed absolute entry other than the baseline.
fn adjustable(allow_rare: bool, entry: &ChanceEntry) -> bool {
    entry.is_absolute()
        && !entry.variant().is_baseline()
        && passes_filter(allow_rare, entry.variant())
}

/// Allowed weighted entry.
fn weighted(allow_rare: bool, entry: &ChanceEntry) -> bool {
    !entry.is_absolute() && passes_filter(allow_rare, entry.variant())
}

impl EntryRegistry {
    /// Shrink the other absolute entries so that, together with `name`, the
    /// non-baseline absolutes do not exceed 100%.
    pub(super) fn keep_absolutes_within_bounds(&mut self, name: &str) -> ChanceResult<()> {
        if self.absolute_sum_except_baseline() <= RAW_MAX {
            return Ok(());
        }
        let own = self.require(name)?.raw_value();
        let allow_rare = self.allow_rare;
        let candidates = self
            .entries
            .values_mut()
            .filter(|e| adjustable(allow_rare, e) && e.name() != name && e.raw_value() > 0)
            .collect();
        fit_in_loop(candidates, RAW_MAX - own, &mut self.counter)
    }

    /// Derive the baseline from the other absolute entries.
    ///
    /// An absolute baseline only moves when it would overflow 100% or when
    /// there are no weighted entries to take up the remainder.
    pub(super) fn update_baseline(&mut self) {
        let others = self.absolute_sum_except_baseline();
        let only_absolute = self.only_absolute();
        let Some(baseline) = self.entries.get_mut(BASELINE_NAME) else {
            return;
        };
        if !baseline.is_absolute() {
            return;
        }
        if baseline.raw_value() + others > RAW_MAX || only_absolute {
            baseline.set_raw_value(RAW_MAX - others);
        }
    }

    /// Spread an edit of the baseline over the other absolute entries.
    ///
    /// Entries already holding a share are preferred. While none of them
    /// does, every absolute entry takes part, and keeps taking part until
    /// each has received something.
    pub(super) fn fit_absolutes_to_baseline(&mut self) -> ChanceResult<()> {
        if !self.only_absolute() && self.absolute_sum() <= RAW_MAX {
            return Ok(());
        }
        let allow_rare = self.allow_rare;
        if !self.entries.values().any(|e| adjustable(allow_rare, e)) {
            return Ok(());
        }
        let baseline = self
            .entries
            .get(BASELINE_NAME)
            .map_or(0, ChanceEntry::raw_value);

        if !self
            .entries
            .values()
            .any(|e| adjustable(allow_rare, e) && e.raw_value() > 0)
        {
            self.distribute_among_all = true;
        }

        let among_all = self.distribute_among_all;
        let candidates = self
            .entries
            .values_mut()
            .filter(|e| adjustable(allow_rare, e) && (among_all || e.raw_value() > 0))
            .collect();
        fit_in_loop(candidates, RAW_MAX - baseline, &mut self.counter)?;

        if among_all
            && self
                .entries
                .values()
                .filter(|e| adjustable(allow_rare, e))
                .all(|e| e.raw_value() > 0)
        {
            self.distribute_among_all = false;
        }
        Ok(())
    }

    /// Split the unclaimed share over the weighted entries by weight.
    pub(super) fn recompute_weighted(&mut self) -> ChanceResult<()> {
        if self.only_absolute() {
            return Ok(());
        }
        let pool = self.weighted_pool();
        let allow_rare = self.allow_rare;
        let (count, total) = self
            .entries
            .values()
            .filter(|e| weighted(allow_rare, e))
            .fold((0usize, 0.0f64), |(n, sum), e| (n + 1, sum + f64::from(e.weight())));

        for entry in self.entries.values_mut().filter(|e| weighted(allow_rare, e)) {
            let share = if total > 0.0 {
                f64::from(pool) * f64::from(entry.weight()) / total
            } else {
                f64::from(pool) / count as f64
            };
            entry.set_raw_value(share.round() as i32);
        }

        // Rounding drift goes to entries that have a share at all.
        let candidates = self
            .entries
            .values_mut()
            .filter(|e| weighted(allow_rare, e) && (total <= 0.0 || e.weight() > 0.0))
            .collect();
        fit_in_loop(candidates, pool, &mut self.counter)
    }

    /// Infer the weight that keeps a freshly weighted entry at its current
    /// chance, given the weights of the other weighted entries.
    pub fn set_weight_from_absolute_value(&mut self, name: &str) -> ChanceResult<()> {
        let entry = self.require(name)?;
        if entry.is_absolute() {
            return Err(ChanceError::NotWeighted(name.to_string()));
        }
        let raw = entry.raw_value();
        let pool = self.weighted_pool();
        let allow_rare = self.allow_rare;

        let others: Vec<f32> = self
            .entries
            .values()
            .filter(|e| weighted(allow_rare, e) && e.name() != name)
            .map(ChanceEntry::weight)
            .collect();

        let weight = if pool == 0 {
            0.0
        } else if others.is_empty() {
            1.0
        } else if raw >= pool {
            // The others held nothing, so they keep nothing.
            self.set_other_weights(name, 0.0);
            1.0
        } else {
            let mut weight_others: f64 = others.iter().copied().map(f64::from).sum();
            if weight_others <= 0.0 {
                self.set_other_weights(name, 1.0);
                weight_others = others.len() as f64;
            }
            (f64::from(raw) * weight_others / f64::from(pool - raw)) as f32
        };

        self.require_mut(name)?.set_weight(weight);
        Ok(())
    }

    /// Set the weight of every allowed weighted entry except `name`.
    fn set_other_weights(&mut self, name: &str, weight: f32) {
        let allow_rare = self.allow_rare;
        for other in self
            .entries
            .values_mut()
            .filter(|e| weighted(allow_rare, e) && e.name() != name)
        {
            other.set_weight(weight);
        }
    }
}
