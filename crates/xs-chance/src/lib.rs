//! Probability-distribution engine for variant spawn chances.
//!
//! Every owner (a faction, a meme, a pawn kind) gets an [`EntryRegistry`]
//! that assigns each known variant a chance at 0.1% resolution and keeps
//! the allowed chances summing to exactly 100%. Chances are either
//! absolute percentages or relative weights sharing whatever the absolute
//! entries leave; the baseline variant takes the remainder.
//!
//! Registries are grouped per category kind in a [`RegistryDirectory`], and
//! the kinds in a [`CategorySet`] that fans variant additions, removals,
//! resets and persistence out to all of them.

pub mod category_set;
pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod fit;
pub mod input;
pub mod persist;
pub mod pick;
pub mod registry;
pub mod template;

pub use category_set::CategorySet;
pub use config::{DEFAULT_EPSILON, EngineConfig};
pub use directory::RegistryDirectory;
pub use entry::{ChanceEntry, EntryConfig, RAW_MAX, format_percentage};
pub use error::{ChanceError, ChanceResult};
pub use fit::fit_in_loop;
pub use input::{ParsedInput, interpret_percentage, interpret_weight};
pub use persist::{DirectoryState, RegistryConfig, SettingsState};
pub use pick::pick_variant;
pub use registry::EntryRegistry;
pub use template::{Template, TemplateLibrary, sanitize_name};
