//! Core types for Xenospawn: variant identities, the variant catalog, and
//! the interface to the host's per-category game data.
//!
//! This crate knows nothing about chance distributions. It describes *what*
//! can be chosen ([`Variant`]), *which* variants currently exist
//! ([`VariantCatalog`]), and *where* resolved chances are read from and
//! written back to ([`OwnerCategory`]).

/// Variant catalog: built-in, user-defined, and generated variants.
pub mod catalog;
/// Owner-category capability trait and an in-memory implementation.
pub mod category;
/// Error types used throughout the crate.
pub mod error;
/// Variant identities and their origins.
pub mod variant;

/// Re-export the catalog.
pub use catalog::VariantCatalog;
/// Re-export owner-category types.
pub use category::{FACTIONLESS_OWNER, MemoryCategory, OwnerCategory, SharedCategory, share};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export variant types.
pub use variant::{BASELINE_NAME, GeneratedKind, Variant, VariantOrigin};
