//! Saved state of registries, directories and the template library.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::EntryConfig;
use crate::error::ChanceResult;
use crate::template::TemplateLibrary;

fn default_true() -> bool {
    true
}

/// Saved state of one registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Whether rare variants are allowed.
    #[serde(default = "default_true")]
    pub allow_rare: bool,
    /// Entry configurations by variant name, loaded or not.
    #[serde(default)]
    pub entries: BTreeMap<String, EntryConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allow_rare: true,
            entries: BTreeMap::new(),
        }
    }
}

/// Saved registries of one category kind, by owner.
pub type DirectoryState = BTreeMap<String, RegistryConfig>;

/// Everything the engine persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    /// Directory state by category kind.
    #[serde(default)]
    pub categories: BTreeMap<String, DirectoryState>,
    /// Named templates.
    #[serde(default)]
    pub templates: TemplateLibrary,
}

impl SettingsState {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ChanceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> ChanceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
