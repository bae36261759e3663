use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the baseline variant: "no modification".
pub const BASELINE_NAME: &str = "Baseliner";

/// The kind of a variant the engine generates on demand instead of loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedKind {
    /// A variant rolled from random traits each time it is picked.
    Random,
    /// A blend of two other variants picked from the same distribution.
    Hybrid,
}

impl GeneratedKind {
    /// All generated kinds, in catalog order.
    pub const ALL: [GeneratedKind; 2] = [GeneratedKind::Random, GeneratedKind::Hybrid];

    /// The reserved catalog key for this kind.
    pub fn key(self) -> &'static str {
        match self {
            GeneratedKind::Random => "::Generated::Random",
            GeneratedKind::Hybrid => "::Generated::Hybrid",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            GeneratedKind::Random => "Random genes",
            GeneratedKind::Hybrid => "Hybrid",
        }
    }

    /// Returns true if `name` is reserved for a generated variant.
    pub fn is_reserved(name: &str) -> bool {
        Self::ALL.iter().any(|kind| kind.key() == name)
    }
}

/// Where a variant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantOrigin {
    /// Shipped with the host's game data. Resolved chances are written back.
    Builtin,
    /// Created by the user.
    Custom,
    /// Synthesised by the engine itself.
    Generated(GeneratedKind),
}

/// A named option a chance can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Stable key, unique within the catalog.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Where the variant comes from.
    pub origin: VariantOrigin,
    /// Rare variants are hidden when a registry disallows them.
    pub rare: bool,
}

impl Variant {
    /// A built-in variant labelled with its name.
    pub fn builtin(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            origin: VariantOrigin::Builtin,
            rare: false,
        }
    }

    /// A user-defined variant labelled with its name.
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            origin: VariantOrigin::Custom,
            rare: false,
        }
    }

    /// One of the engine-generated variants.
    pub fn generated(kind: GeneratedKind) -> Self {
        Self {
            name: kind.key().to_string(),
            label: kind.label().to_string(),
            origin: VariantOrigin::Generated(kind),
            rare: false,
        }
    }

    /// The baseline variant.
    pub fn baseline() -> Self {
        Self::builtin(BASELINE_NAME)
    }

    /// Mark the variant as rare.
    pub fn rare(mut self) -> Self {
        self.rare = true;
        self
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns true for the baseline variant.
    pub fn is_baseline(&self) -> bool {
        self.origin == VariantOrigin::Builtin && self.name == BASELINE_NAME
    }

    /// Returns true if the variant is part of the host's game data.
    pub fn is_builtin(&self) -> bool {
        self.origin == VariantOrigin::Builtin
    }

    /// Returns the generated kind, if the engine synthesises this variant.
    pub fn generated_kind(&self) -> Option<GeneratedKind> {
        match self.origin {
            VariantOrigin::Generated(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
