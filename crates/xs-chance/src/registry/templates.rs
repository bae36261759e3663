use std::collections::BTreeMap;

use super::EntryRegistry;
use crate::error::ChanceResult;
use crate::template::Template;

impl EntryRegistry {
    /// Snapshot the entries that contribute anything (weighted, or a nonzero
    /// absolute chance) together with the filter flag.
    pub fn create_template(&self) -> Template {
        let mut entries: BTreeMap<_, _> = self
            .unloaded
            .iter()
            .filter(|(_, config)| config.is_relevant())
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();
        entries.extend(
            self.entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.config()))
                .filter(|(_, config)| config.is_relevant()),
        );
        Template {
            allow_rare: self.allow_rare,
            entries,
        }
    }

    /// Replace this registry's configuration with a template.
    ///
    /// Entries the template does not name are disabled. Configurations for
    /// variants that are not loaded are kept for later, unless they would
    /// contribute nothing anyway.
    pub fn apply_template(&mut self, template: &Template) -> ChanceResult<()> {
        self.allow_rare = template.allow_rare;
        self.unloaded.clear();

        for (name, config) in &template.entries {
            match self.entries.get_mut(name) {
                Some(entry) => entry.apply_config(config),
                None if config.is_relevant() => {
                    self.unloaded.insert(name.clone(), config.clone());
                }
                None => {}
            }
        }
        for (name, entry) in self.entries.iter_mut() {
            if !template.entries.contains_key(name) {
                entry.set_is_absolute(true);
                entry.set_raw_value(0);
            }
        }

        log::debug!(
            "{}: applied template with {} entries",
            self.owner,
            template.entries.len()
        );
        self.resolve_all()?;
        self.sync_store();
        Ok(())
    }
}
