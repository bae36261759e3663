//! Portable registry snapshots and the named template library.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::EntryConfig;

/// A detachable snapshot of one registry's contributing entries.
///
/// Applies to any registry: entries are matched by variant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Whether rare variants are allowed.
    #[serde(default = "default_allow_rare")]
    pub allow_rare: bool,
    /// Entry configurations by variant name.
    #[serde(default)]
    pub entries: BTreeMap<String, EntryConfig>,
}

fn default_allow_rare() -> bool {
    true
}

impl Default for Template {
    fn default() -> Self {
        Self {
            allow_rare: true,
            entries: BTreeMap::new(),
        }
    }
}

/// Reduce a template name to its letters and digits.
pub fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Named templates, shared by every registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, Template>,
}

impl TemplateLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template, replacing any of the same name. Returns the
    /// sanitised name it was stored under, or `None` if nothing of the name
    /// survived sanitising.
    pub fn save(&mut self, name: &str, template: Template) -> Option<String> {
        let key = sanitize_name(name);
        if key.is_empty() {
            return None;
        }
        if self.templates.insert(key.clone(), template).is_some() {
            log::debug!("overwrote template {key}");
        }
        Some(key)
    }

    /// Look up a template.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(&sanitize_name(name))
    }

    /// Delete a template.
    pub fn remove(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(&sanitize_name(name))
    }

    /// Template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if the library holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
