//! Fan-out over every category kind.

use std::collections::BTreeMap;

use xs_core::{SharedCategory, Variant, VariantCatalog};

use crate::config::EngineConfig;
use crate::directory::RegistryDirectory;
use crate::error::{ChanceError, ChanceResult};
use crate::persist::{DirectoryState, SettingsState};
use crate::registry::EntryRegistry;
use crate::template::TemplateLibrary;

/// The directories of all supported category kinds plus the shared
/// template library.
///
/// Variant additions, removals and resets are applied to every active kind
/// at once, so a new variant is configurable for factions, memes and pawn
/// kinds alike.
#[derive(Debug, Default)]
pub struct CategorySet {
    directories: Vec<RegistryDirectory>,
    templates: TemplateLibrary,
    // Saved state of kinds that are not registered in this session.
    orphaned: BTreeMap<String, DirectoryState>,
}

impl CategorySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category kind.
    pub fn with_category(mut self, category: SharedCategory, config: EngineConfig) -> Self {
        self.add_category(category, config);
        self
    }

    /// Register a category kind. A kind registered twice replaces the
    /// earlier directory.
    pub fn add_category(&mut self, category: SharedCategory, config: EngineConfig) {
        let mut directory = RegistryDirectory::new(category, config);
        self.directories.retain(|d| d.kind() != directory.kind());
        let saved = self.orphaned.remove(directory.kind());
        if let Some(Err(err)) = saved.map(|state| directory.load(&state)) {
            log::warn!("{}: dropping saved state: {err}", directory.kind());
        }
        self.directories.push(directory);
    }

    /// The directory of a category kind.
    pub fn directory(&self, kind: &str) -> Option<&RegistryDirectory> {
        self.directories.iter().find(|d| d.kind() == kind)
    }

    /// The directory of a category kind, mutably.
    pub fn directory_mut(&mut self, kind: &str) -> Option<&mut RegistryDirectory> {
        self.directories.iter_mut().find(|d| d.kind() == kind)
    }

    /// All registered directories.
    pub fn directories(&self) -> impl Iterator<Item = &RegistryDirectory> {
        self.directories.iter()
    }

    /// The registry of `owner` in category `kind`, created on first access.
    pub fn registry(&mut self, kind: &str, owner: &str) -> ChanceResult<&mut EntryRegistry> {
        self.directory_mut(kind)
            .map(|d| d.for_owner(owner))
            .ok_or_else(|| ChanceError::UnknownCategory(kind.to_string()))
    }

    fn active_mut(&mut self) -> impl Iterator<Item = &mut RegistryDirectory> {
        self.directories.iter_mut().filter(|d| d.is_active())
    }

    /// Initialize every owner of every active kind.
    pub fn initialize_all(&mut self, catalog: &VariantCatalog) -> ChanceResult<()> {
        for directory in self.active_mut() {
            directory.initialize_all(catalog)?;
        }
        Ok(())
    }

    /// Add a user-defined variant to the catalog and to every registry.
    pub fn add_custom_variant(
        &mut self,
        catalog: &mut VariantCatalog,
        variant: Variant,
    ) -> ChanceResult<()> {
        let added = catalog.add_custom(variant)?.clone();
        self.add_variant_everywhere(&added)
    }

    /// Delete a user-defined variant from the catalog and from every
    /// registry. Registries fall back to a built-in of the same name if the
    /// catalog has one.
    pub fn remove_custom_variant(
        &mut self,
        catalog: &mut VariantCatalog,
        name: &str,
    ) -> ChanceResult<()> {
        if catalog.remove_custom(name).is_none() {
            return Ok(());
        }
        self.remove_variant_everywhere(name, catalog)
    }

    /// Attach a variant in every registry of every active kind.
    pub fn add_variant_everywhere(&mut self, variant: &Variant) -> ChanceResult<()> {
        for directory in self.active_mut() {
            directory.add_variant(variant)?;
        }
        Ok(())
    }

    /// Remove a variant from every registry of every active kind.
    pub fn remove_variant_everywhere(
        &mut self,
        name: &str,
        catalog: &VariantCatalog,
    ) -> ChanceResult<()> {
        for directory in self.active_mut() {
            directory.remove_variant(name, catalog)?;
        }
        Ok(())
    }

    /// Reset every registry of every active kind.
    pub fn reset_all(&mut self) -> ChanceResult<()> {
        for directory in self.active_mut() {
            directory.reset_all()?;
        }
        Ok(())
    }

    /// The shared template library.
    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    /// The shared template library, mutably.
    pub fn templates_mut(&mut self) -> &mut TemplateLibrary {
        &mut self.templates
    }

    /// Snapshot a registry into the template library. Returns the name the
    /// template was stored under.
    pub fn save_template(
        &mut self,
        kind: &str,
        owner: &str,
        name: &str,
    ) -> ChanceResult<Option<String>> {
        let template = self.registry(kind, owner)?.create_template();
        Ok(self.templates.save(name, template))
    }

    /// Apply a stored template to a registry.
    pub fn apply_template(&mut self, kind: &str, owner: &str, name: &str) -> ChanceResult<()> {
        let template = self
            .templates
            .get(name)
            .cloned()
            .ok_or_else(|| ChanceError::UnknownTemplate(name.to_string()))?;
        self.registry(kind, owner)?.apply_template(&template)
    }

    /// Everything worth saving.
    pub fn expose(&self) -> SettingsState {
        let mut categories = self.orphaned.clone();
        categories.extend(
            self.directories
                .iter()
                .filter_map(|d| Some((d.kind().to_string(), d.expose()?))),
        );
        SettingsState {
            categories,
            templates: self.templates.clone(),
        }
    }

    /// Load saved state. State of kinds that are not registered is kept and
    /// loaded if the kind is registered later.
    pub fn load(&mut self, state: &SettingsState) -> ChanceResult<()> {
        self.templates = state.templates.clone();
        for (kind, directory_state) in &state.categories {
            match self.directory_mut(kind) {
                Some(directory) => directory.load(directory_state)?,
                None => {
                    log::debug!("keeping saved state of unregistered category {kind}");
                    self.orphaned.insert(kind.clone(), directory_state.clone());
                }
            }
        }
        Ok(())
    }
}
