use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that prevent a catalog from being built at all
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catalog document is not valid TOML or misses required keys
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),

    /// Catalog schema is newer than this build understands
    #[error("Unsupported catalog schema version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    /// No category of the catalog belongs to the requested provider
    #[error("Unknown provider '{provider}' (known: {known})")]
    UnknownProvider { provider: String, known: String },
}

/// A single category that was skipped while indexing.
///
/// Never fatal: the catalog is built from the categories that did load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("category {category} skipped: {reason}")]
pub struct CatalogLoadError {
    pub category: String,
    pub reason: String,
}

impl CatalogLoadError {
    pub fn new(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            reason: reason.into(),
        }
    }
}
