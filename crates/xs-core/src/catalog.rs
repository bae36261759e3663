use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::variant::{GeneratedKind, Variant, VariantOrigin};

/// Every variant currently known to the system, keyed by name.
///
/// A user-defined variant may shadow a built-in of the same name; removing
/// it brings the built-in back. The baseline and the generated variants are
/// always present.
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    builtins: BTreeMap<String, Variant>,
    active: BTreeMap<String, Variant>,
}

impl VariantCatalog {
    /// Build a catalog from the host's built-in variants.
    ///
    /// The baseline is added if the host did not provide one, and both
    /// generated variants are always registered.
    pub fn new(builtins: impl IntoIterator<Item = Variant>) -> Self {
        let mut builtin_map: BTreeMap<String, Variant> = builtins
            .into_iter()
            .filter(|v| v.is_builtin())
            .map(|v| (v.name.clone(), v))
            .collect();

        if builtin_map.is_empty() {
            log::warn!("no built-in variants supplied; only the baseline will be available");
        }
        let baseline = Variant::baseline();
        builtin_map
            .entry(baseline.name.clone())
            .or_insert(baseline);

        let mut active = builtin_map.clone();
        for kind in GeneratedKind::ALL {
            let generated = Variant::generated(kind);
            active.insert(generated.name.clone(), generated);
        }

        Self {
            builtins: builtin_map,
            active,
        }
    }

    /// Look up a currently active variant.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.active.get(name)
    }

    /// Look up the built-in variant of that name, even if it is shadowed.
    pub fn builtin(&self, name: &str) -> Option<&Variant> {
        self.builtins.get(name)
    }

    /// Returns true if a variant with this name is active.
    pub fn contains(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    /// Iterate all active variants in name order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.active.values()
    }

    /// Iterate the user-defined variants.
    pub fn customs(&self) -> impl Iterator<Item = &Variant> {
        self.active
            .values()
            .filter(|v| v.origin == VariantOrigin::Custom)
    }

    /// Number of active variants.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns true if the catalog has no variants. Never true in practice,
    /// since the baseline is always present.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Register a user-defined variant, shadowing any built-in of the same name.
    pub fn add_custom(&mut self, variant: Variant) -> CoreResult<&Variant> {
        if variant.origin != VariantOrigin::Custom {
            return Err(CoreError::NotCustom(variant.name));
        }
        if GeneratedKind::is_reserved(&variant.name) {
            log::warn!("refusing custom variant with reserved name {}", variant.name);
            return Err(CoreError::ReservedName(variant.name));
        }
        if variant.name == crate::variant::BASELINE_NAME {
            log::warn!("refusing custom variant that would replace the baseline");
            return Err(CoreError::BaselineOverride);
        }

        let name = variant.name.clone();
        self.active.insert(name.clone(), variant);
        Ok(&self.active[&name])
    }

    /// Remove a user-defined variant. If it shadowed a built-in, the built-in
    /// becomes active again. Returns the removed variant.
    pub fn remove_custom(&mut self, name: &str) -> Option<Variant> {
        match self.active.get(name) {
            Some(v) if v.origin == VariantOrigin::Custom => {}
            _ => return None,
        }
        let removed = self.active.remove(name)?;
        if let Some(builtin) = self.builtins.get(name) {
            self.active.insert(name.to_string(), builtin.clone());
        }
        Some(removed)
    }
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
