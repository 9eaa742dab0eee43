//! Error types for berthdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for berthdb operations
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("key not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("mutation attempted in a read-only transaction")]
    ReadOnly,

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("index already exists: {0}")]
    DuplicateIndex(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),

    // -------------------------------------------------------------------------
    // Store Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("store is closed")]
    Closed,

    #[error("persistent storage is not supported (path: {0})")]
    PersistenceUnsupported(String),

    // -------------------------------------------------------------------------
    // Value Errors
    // -------------------------------------------------------------------------
    #[error("value encoding error: {0}")]
    ValueEncoding(#[from] serde_json::Error),
}
