//! Error types shared by every crate in the workspace.
//!
//! [`ElccError`] separates the failure classes the engine cares about: input
//! shape mismatches (arrays of the wrong dimensions, load series of the wrong
//! length) abort a study, while convergence problems are never errors and are
//! reported through [`crate::diagnostics::Diagnostics`] instead.
//!
//! # Example
//!
//! ```
//! use elcc_core::{ElccError, ElccResult};
//!
//! fn check_hours(found: usize) -> ElccResult<()> {
//!     if found != 8760 {
//!         return Err(ElccError::shape("load series", 8760, found));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_hours(8784).is_err());
//! ```

use thiserror::Error;

/// Unified error type for ELCC operations.
#[derive(Error, Debug)]
pub enum ElccError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Array or series dimensions that do not line up
    #[error("Shape error: {0}")]
    Shape(String),

    /// Invalid or unresolved input (fleet filter, outage rate, coordinates)
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl ElccError {
    /// Shape mismatch between what a consumer expects and what it was given.
    pub fn shape(what: &str, expected: impl std::fmt::Display, found: impl std::fmt::Display) -> Self {
        ElccError::Shape(format!("{what}: expected {expected}, found {found}"))
    }
}

/// Convenience type alias for Results using ElccError.
pub type ElccResult<T> = Result<T, ElccError>;

/// Keeps the class of an [`ElccError`] that was wrapped with `anyhow` context,
/// so a shape error raised deep in a loader is still a shape error to the caller.
impl From<anyhow::Error> for ElccError {
    fn from(err: anyhow::Error) -> Self {
        let message = format!("{err:#}");
        match err.downcast_ref::<ElccError>() {
            Some(ElccError::Shape(_)) => ElccError::Shape(message),
            Some(ElccError::Input(_)) => ElccError::Input(message),
            Some(ElccError::Parse(_)) => ElccError::Parse(message),
            Some(ElccError::Config(_)) => ElccError::Config(message),
            _ => ElccError::Other(message),
        }
    }
}

impl From<String> for ElccError {
    fn from(s: String) -> Self {
        ElccError::Other(s)
    }
}

impl From<&str> for ElccError {
    fn from(s: &str) -> Self {
        ElccError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for ElccError {
    fn from(err: serde_json::Error) -> Self {
        ElccError::Parse(err.to_string())
    }
}
