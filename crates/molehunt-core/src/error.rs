//! Core error types for molehunt-core.
//!
//! This module defines the error hierarchy using thiserror. The contract
//! from the session engine's point of view: difficulty selection errors are
//! recoverable (the prior profile stays in effect), placement failures skip
//! a single spawn cycle, and persistence failures never block ending a
//! session.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for molehunt-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Difficulty selection errors
    #[error("Difficulty error: {0}")]
    Difficulty(#[from] DifficultyError),

    /// Target placement service errors
    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    /// Score persistence service errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Difficulty selection errors.
#[derive(Error, Debug)]
pub enum DifficultyError {
    /// The label is not one of the fixed difficulty set.
    #[error("Unknown difficulty '{0}' (expected Easy, Medium or Hard)")]
    UnknownDifficulty(String),
}

/// Target placement service errors.
///
/// All of these are non-fatal for the session: a failed placement request
/// skips one spawn cycle and the scheduler re-arms.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// The placement request itself failed (network, bad URL, ...).
    #[error("Placement request failed: {0}")]
    Request(String),

    /// The response did not contain a numeric cell position.
    #[error("Malformed placement response: {0}")]
    MalformedResponse(String),

    /// The returned cell is outside the current grid.
    #[error("Placement response out of range: cell {cell} not in 1..={cells}")]
    OutOfRange { cell: u64, cells: u32 },

    /// The response arrived after the session phase changed.
    #[error("Stale placement response discarded")]
    Stale,
}

/// Score persistence service errors.
///
/// Non-fatal by contract: `end()` logs and carries on.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The save request failed (network, bad URL, ...).
    #[error("Score save request failed: {0}")]
    Request(String),

    /// The backend answered but did not accept the score.
    #[error("Score save rejected: {0}")]
    Rejected(String),

    /// The response arrived after the session phase changed.
    #[error("Stale persistence response discarded")]
    Stale,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
