use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::variant::{GeneratedKind, Variant};

/// Owner key for pawns generated without any faction.
pub const FACTIONLESS_OWNER: &str = "::Generated::NoFaction";

/// One kind of owner category (factions, memes, pawn kinds, ...) and the
/// host game data behind it.
///
/// The engine reads the externally observed chance of built-in variants to
/// seed defaults, and writes resolved chances back so the host's own
/// generation code sees them.
pub trait OwnerCategory {
    /// Stable key of this kind, used to namespace persisted state.
    fn stable_name(&self) -> &str;

    /// All owners of this kind that should get a registry.
    fn owners(&self) -> Vec<String>;

    /// Whether this kind is available in the current host session.
    fn is_active(&self) -> bool {
        true
    }

    /// The chance the host data currently assigns to a built-in variant.
    fn find_chance(&self, owner: &str, variant: &str) -> Option<f32>;

    /// Write a resolved chance for a built-in variant back to the host data.
    fn set_chance(&mut self, owner: &str, variant: &str, chance: f32);

    /// Default chance for a variant the host data does not list
    /// (generated and user-defined variants).
    fn default_weight_for(&self, _owner: &str, _variant: &Variant) -> f32 {
        0.0
    }
}

/// An owner category shared by every registry of one kind.
pub type SharedCategory = Rc<RefCell<dyn OwnerCategory>>;

/// Wrap a category for sharing.
pub fn share<C: OwnerCategory + 'static>(category: C) -> SharedCategory {
    Rc::new(RefCell::new(category))
}

/// In-memory owner category.
///
/// Holds, per owner, the list of (variant, chance) pairs a game would keep
/// on its definitions. Zero chances are dropped from the list, and the
/// baseline is never stored since its share is always derived.
#[derive(Debug, Clone)]
pub struct MemoryCategory {
    name: String,
    active: bool,
    owners: BTreeSet<String>,
    chances: BTreeMap<String, Vec<(String, f32)>>,
    generated: BTreeMap<(String, GeneratedKind), f32>,
    custom_defaults: BTreeMap<String, f32>,
}

impl MemoryCategory {
    /// Create an empty category with the given stable name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            owners: BTreeSet::new(),
            chances: BTreeMap::new(),
            generated: BTreeMap::new(),
            custom_defaults: BTreeMap::new(),
        }
    }

    /// Register an owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.insert(owner.into());
        self
    }

    /// Register an owner with an initial chance for a built-in variant.
    pub fn with_chance(
        mut self,
        owner: impl Into<String>,
        variant: impl Into<String>,
        chance: f32,
    ) -> Self {
        let owner = owner.into();
        self.owners.insert(owner.clone());
        self.set_chance(&owner, &variant.into(), chance);
        self
    }

    /// Set the default chance of a generated variant for an owner.
    pub fn with_generated_chance(
        mut self,
        owner: impl Into<String>,
        kind: GeneratedKind,
        chance: f32,
    ) -> Self {
        let owner = owner.into();
        self.owners.insert(owner.clone());
        self.generated.insert((owner, kind), chance);
        self
    }

    /// Set the default chance user-defined variants get for an owner.
    pub fn with_custom_default(mut self, owner: impl Into<String>, chance: f32) -> Self {
        let owner = owner.into();
        self.owners.insert(owner.clone());
        self.custom_defaults.insert(owner, chance);
        self
    }

    /// Mark the category as unavailable in this session.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// The stored (variant, chance) pairs of an owner.
    pub fn chances_of(&self, owner: &str) -> &[(String, f32)] {
        self.chances.get(owner).map(Vec::as_slice).unwrap_or_default()
    }
}

impl OwnerCategory for MemoryCategory {
    fn stable_name(&self) -> &str {
        &self.name
    }

    fn owners(&self) -> Vec<String> {
        self.owners.iter().cloned().collect()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn find_chance(&self, owner: &str, variant: &str) -> Option<f32> {
        self.chances
            .get(owner)?
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, chance)| *chance)
    }

    fn set_chance(&mut self, owner: &str, variant: &str, chance: f32) {
        if variant == crate::variant::BASELINE_NAME {
            return;
        }
        let list = self.chances.entry(owner.to_string()).or_default();
        let index = list.iter().position(|(name, _)| name == variant);
        match (index, chance == 0.0) {
            (None, false) => list.push((variant.to_string(), chance)),
            (Some(i), false) => list[i].1 = chance,
            (Some(i), true) => {
                list.remove(i);
            }
            (None, true) => {}
        }
    }

    fn default_weight_for(&self, owner: &str, variant: &Variant) -> f32 {
        match variant.generated_kind() {
            Some(kind) => self
                .generated
                .get(&(owner.to_string(), kind))
                .copied()
                .unwrap_or(0.0),
            None => self.custom_defaults.get(owner).copied().unwrap_or(0.0),
        }
    }
}
