//! Application-wide error types.
//!
//! Modules carry specific error types via `thiserror`; this enum
//! aggregates them for callers that cross module boundaries (the session
//! facade, CLI). `main` uses `anyhow` for final reporting.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata store error
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Library list error
    #[error("Library error: {0}")]
    Library(#[from] crate::library::LibraryError),

    /// Catalog lookup error
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
