/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the variant catalog.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The name is reserved for one of the generated variants.
    #[error("variant name is reserved: \"{0}\"")]
    ReservedName(String),

    /// User-defined variants may not replace the baseline.
    #[error("the baseline variant cannot be overridden")]
    BaselineOverride,

    /// Only user-defined variants can be added or removed at runtime.
    #[error("variant \"{0}\" is not user-defined")]
    NotCustom(String),
}
