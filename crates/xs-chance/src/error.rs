//! Error types for the chance engine.

use thiserror::Error;

/// Result type for chance engine operations.
pub type ChanceResult<T> = Result<T, ChanceError>;

/// Errors raised by the chance engine.
///
/// Everything except [`ChanceError::Persistence`] and [`ChanceError::Core`]
/// signals a broken invariant or a misuse of the API and should abort the
/// operation.
#[derive(Debug, Error)]
pub enum ChanceError {
    /// The named entry is not loaded in this registry.
    #[error("entry \"{name}\" is not loaded in registry \"{owner}\"")]
    UnknownEntry {
        /// Owner the registry belongs to.
        owner: String,
        /// Name of the missing entry.
        name: String,
    },

    /// A filtered-out entry may only ever hold a chance of zero.
    #[error("entry \"{name}\" is disallowed by the current filter but holds {raw}/1000")]
    DisallowedEntry {
        /// Name of the entry.
        name: String,
        /// The offending raw value.
        raw: i32,
    },

    /// The fit loop ran out of entries before reaching its target.
    #[error(
        "not enough capacity to reach {target}/1000: \
         {delta} left over after exhausting {candidates} entries"
    )]
    InsufficientCapacity {
        /// The requested raw sum.
        target: i32,
        /// Raw units still missing (positive) or in excess (negative).
        delta: i32,
        /// Number of candidates the loop started with.
        candidates: usize,
    },

    /// A weighted-only operation was called on an absolute entry.
    #[error("entry \"{0}\" is not weighted")]
    NotWeighted(String),

    /// An absolute-only operation was called on a weighted entry.
    #[error("entry \"{0}\" is not absolute")]
    NotAbsolute(String),

    /// No directory is registered for this category kind.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// No template is stored under this name.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Settings could not be serialized or parsed.
    #[error("persistence error: {0}")]
    Persistence(#[from] serde_json::Error),

    /// Variant catalog error.
    #[error("{0}")]
    Core(#[from] xs_core::CoreError),
}
