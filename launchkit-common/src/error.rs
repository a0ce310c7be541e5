//! Common error types for LaunchKit

use thiserror::Error;

/// Common result type for LaunchKit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the LaunchKit crates
///
/// The HTTP mapping lives in launchkit-api; this enum stays
/// framework-free so database and domain code can use it directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Role or ownership mismatch
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Schema parse failure or business-rule violation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Operation rejected because of existing state (e.g. double review)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
