//! Error types for Basecamp operations.
//!
//! This module defines [`BasecampError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BasecampError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `BasecampError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users
//!
//! Failure severity is a property of the run sequence, not the error type:
//! a missing runtime is fatal, a dependency install failure is tolerated
//! under the best-effort policy, and anything inside the launched
//! application is deferred (surfaced, never classified).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Basecamp operations.
#[derive(Debug, Error)]
pub enum BasecampError {
    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Invalid manifest structure or values.
    #[error("Invalid manifest: {message}")]
    ManifestValidationError { message: String },

    /// No runtime candidate resolved on PATH.
    #[error("No runtime found (tried {candidates}). Download it from {download_url}")]
    RuntimeMissing {
        candidates: String,
        download_url: String,
    },

    /// A runtime binary was found but is not usable.
    #[error("Runtime at {binary} is unsuitable: {message}")]
    RuntimeUnsuitable { binary: PathBuf, message: String },

    /// A dependency install exited non-zero.
    #[error("Install of '{dependency}' failed with exit code {code:?}")]
    InstallFailed {
        dependency: String,
        code: Option<i32>,
    },

    /// A subprocess could not be spawned at all.
    #[error("Failed to spawn '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Basecamp operations.
pub type Result<T> = std::result::Result<T, BasecampError>;
