//! Catalog Error Types
//!
//! Error handling for the catalog engine.

use thiserror::Error;

/// Catalog operation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The record source failed while fetching candidates. Recoverable:
    /// re-running the cycle is the retry action.
    #[error("Store error: {0}")]
    Store(String),

    /// A configuration defect (e.g. a filter key recognized by no tab).
    /// Fails loudly at engine construction, never silently at runtime.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
