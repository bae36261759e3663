//! Weighted selection for character generation.

use rand::Rng;
use rand::rngs::StdRng;
use xs_core::Variant;

use crate::registry::EntryRegistry;

/// Pick a variant among the registry's allowed entries, weighted by their
/// raw chance. Returns `None` if every allowed chance is zero.
pub fn pick_variant<'a>(registry: &'a EntryRegistry, rng: &mut StdRng) -> Option<&'a Variant> {
    let chances = registry.allowed_chances();
    let total: i32 = chances.iter().map(|(_, raw)| raw).sum();
    if total <= 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for (variant, raw) in chances {
        if roll < raw {
            return Some(variant);
        }
        roll -= raw;
    }
    None
}
