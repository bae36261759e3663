//! A single distribution slot.
//!
//! Chances are stored as integer raw values in `0..=1000`, i.e. at 0.1%
//! resolution. Entries never look at their siblings: keeping the whole
//! distribution consistent is the registry's job.

use serde::{Deserialize, Serialize};
use xs_core::Variant;

/// Raw value representing 100%.
pub const RAW_MAX: i32 = 1000;

fn default_true() -> bool {
    true
}

/// The persisted configuration of one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Raw chance; `None` if the slot was never configured and should start
    /// at its default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<i32>,
    /// Absolute or weighted mode.
    #[serde(default = "default_true")]
    pub is_absolute: bool,
    /// Relative weight, only meaningful in weighted mode.
    #[serde(default)]
    pub weight: f32,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            raw: None,
            is_absolute: true,
            weight: 0.0,
        }
    }
}

impl EntryConfig {
    /// An absolute configuration.
    pub fn absolute(raw: i32) -> Self {
        Self {
            raw: Some(raw.clamp(0, RAW_MAX)),
            is_absolute: true,
            weight: 0.0,
        }
    }

    /// A weighted configuration.
    pub fn weighted(weight: f32) -> Self {
        Self {
            raw: None,
            is_absolute: false,
            weight: sanitize_weight(weight),
        }
    }

    /// Returns true if the slot contributes anything: weighted, or a nonzero
    /// absolute chance.
    pub fn is_relevant(&self) -> bool {
        !self.is_absolute || self.raw.unwrap_or(0) > 0
    }
}

fn sanitize_weight(weight: f32) -> f32 {
    if weight.is_nan() || weight < 0.0 {
        0.0
    } else {
        weight.min(f32::MAX)
    }
}

/// Format a raw value as a percentage with at most one decimal.
pub fn format_percentage(raw: i32) -> String {
    let raw = raw.clamp(0, RAW_MAX);
    if raw % 10 == 0 {
        format!("{}", raw / 10)
    } else {
        format!("{}.{}", raw / 10, raw % 10)
    }
}

/// One configurable slot of a distribution.
#[derive(Debug, Clone)]
pub struct ChanceEntry {
    variant: Variant,
    raw: i32,
    is_absolute: bool,
    weight: f32,
    default_value: f32,
    default_weight: f32,
    default_is_absolute: bool,
    chance_text: String,
    weight_text: String,
}

impl ChanceEntry {
    /// Create an entry from a stored configuration. Unconfigured slots start
    /// at `default_value` (a fraction in `0.0..=1.0`).
    pub fn new(variant: Variant, config: &EntryConfig, default_value: f32) -> Self {
        let default_value = default_value.clamp(0.0, 1.0);
        let raw = config
            .raw
            .unwrap_or_else(|| to_raw(default_value))
            .clamp(0, RAW_MAX);
        let weight = sanitize_weight(config.weight);
        Self {
            variant,
            raw,
            is_absolute: config.is_absolute,
            weight,
            default_value,
            default_weight: 1.0,
            default_is_absolute: true,
            chance_text: format_percentage(raw),
            weight_text: weight.to_string(),
        }
    }

    /// The variant this slot configures.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Shorthand for the variant's name.
    pub fn name(&self) -> &str {
        &self.variant.name
    }

    pub(crate) fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Raw chance in `0..=1000`.
    pub fn raw_value(&self) -> i32 {
        self.raw
    }

    /// Chance as a fraction in `0.0..=1.0`.
    pub fn value(&self) -> f32 {
        self.raw as f32 / RAW_MAX as f32
    }

    /// Whether the chance is a fixed percentage.
    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    /// Relative weight (weighted mode).
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Default chance as a fraction.
    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Default weight.
    pub fn default_weight(&self) -> f32 {
        self.default_weight
    }

    /// Default mode.
    pub fn default_is_absolute(&self) -> bool {
        self.default_is_absolute
    }

    /// Percentage text as shown to the user. May hold an in-progress edit.
    pub fn chance_text(&self) -> &str {
        &self.chance_text
    }

    /// Weight text as shown to the user. May hold an in-progress edit.
    pub fn weight_text(&self) -> &str {
        &self.weight_text
    }

    /// Set the raw chance, clamped to `0..=1000`. Returns true if it changed.
    pub fn set_raw_value(&mut self, raw: i32) -> bool {
        let raw = raw.clamp(0, RAW_MAX);
        if raw == self.raw {
            return false;
        }
        self.raw = raw;
        self.chance_text = format_percentage(raw);
        true
    }

    /// Set the chance from a fraction. Returns true if it changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        self.set_raw_value(to_raw(value))
    }

    /// Set the weight, clamped to be non-negative. Returns true if it changed.
    pub fn set_weight(&mut self, weight: f32) -> bool {
        let weight = sanitize_weight(weight);
        if weight == self.weight {
            return false;
        }
        self.weight = weight;
        self.weight_text = weight.to_string();
        true
    }

    /// Flip the mode. The raw value is left untouched.
    pub fn set_is_absolute(&mut self, is_absolute: bool) {
        self.is_absolute = is_absolute;
    }

    /// Replace the percentage text without touching the value.
    pub fn set_chance_text(&mut self, text: impl Into<String>) {
        self.chance_text = text.into();
    }

    /// Replace the weight text without touching the weight.
    pub fn set_weight_text(&mut self, text: impl Into<String>) {
        self.weight_text = text.into();
    }

    /// Set the default chance. An entry still sitting at its old default
    /// follows the new one.
    pub fn set_default_value(&mut self, value: f32, epsilon: f32) {
        let value = value.clamp(0.0, 1.0);
        if value == self.default_value {
            return;
        }
        let was_default = self.is_absolute && self.value_is_default(epsilon);
        self.default_value = value;
        if was_default {
            self.set_value(value);
        }
    }

    /// Set the default weight.
    pub fn set_default_weight(&mut self, weight: f32) {
        self.default_weight = sanitize_weight(weight);
    }

    /// Returns true if the absolute value matches the default within `epsilon`.
    pub fn value_is_default(&self, epsilon: f32) -> bool {
        (self.value() - self.default_value).abs() < epsilon
    }

    /// Returns true if mode and the active value both match their defaults.
    pub fn is_default(&self, epsilon: f32) -> bool {
        if self.is_absolute != self.default_is_absolute {
            return false;
        }
        if self.is_absolute {
            self.value_is_default(epsilon)
        } else {
            (self.weight - self.default_weight).abs() < epsilon
        }
    }

    /// Restore the default mode and the value of that mode.
    pub fn reset_to_default(&mut self) {
        self.is_absolute = self.default_is_absolute;
        if self.is_absolute {
            self.set_value(self.default_value);
        } else {
            self.set_weight(self.default_weight);
        }
    }

    /// Snapshot the slot's configuration.
    pub fn config(&self) -> EntryConfig {
        EntryConfig {
            raw: Some(self.raw),
            is_absolute: self.is_absolute,
            weight: self.weight,
        }
    }

    /// Overwrite the slot's configuration. A missing raw value keeps the
    /// current one.
    pub fn apply_config(&mut self, config: &EntryConfig) {
        if let Some(raw) = config.raw {
            self.set_raw_value(raw);
        }
        self.is_absolute = config.is_absolute;
        self.set_weight(config.weight);
    }
}

fn to_raw(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    (value * RAW_MAX as f32).round().clamp(0.0, RAW_MAX as f32) as i32
}
