//! Error types for scene synchronization.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stage and scene operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Stage file is missing, unreadable, or not a stage document
    #[error("Failed to open stage {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// No handler is registered for a node or prim type tag
    #[error("No handler registered for type '{0}'")]
    UnresolvedType(String),

    /// Parent path does not name a valid prim
    #[error("Invalid parent prim for {0}")]
    InvalidParent(String),

    /// Required geometry buffers are absent or empty
    #[error("Empty geometry at {path}: missing {missing}")]
    EmptyGeometry { path: String, missing: &'static str },

    /// Geometry buffers are present but inconsistent
    #[error("Invalid geometry at {path}: {reason}")]
    InvalidGeometry { path: String, reason: String },

    /// Prim not found at path
    #[error("Prim not found: {0}")]
    PrimNotFound(String),

    /// Variant set not found on prim
    #[error("Variant set '{set}' not found on {prim}")]
    VariantSetNotFound { prim: String, set: String },

    /// Variant not found in variant set
    #[error("Variant '{variant}' not found in set '{set}' on {prim}")]
    VariantNotFound { prim: String, set: String, variant: String },

    /// Malformed prim path or prim name
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Scene node handle does not resolve
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),

    /// Stage was opened for reading only
    #[error("Stage is read-only")]
    ReadOnly,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an open error for a path.
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open { path: path.into(), reason: reason.into() }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry { path: path.into(), reason: reason.into() }
    }

    /// Whether a traversal may log this error and carry on with the next node.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedType(_)
                | Self::InvalidParent(_)
                | Self::EmptyGeometry { .. }
                | Self::InvalidGeometry { .. }
        )
    }
}

/// Result type alias for scenebridge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::open("/tmp/missing.json", "not found");
        assert!(e.to_string().contains("missing.json"));

        let e = Error::EmptyGeometry { path: "/mesh".into(), missing: "points" };
        assert!(e.to_string().contains("/mesh"));
        assert!(e.to_string().contains("points"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_classes() {
        assert!(Error::UnresolvedType("locator".into()).is_recoverable());
        assert!(Error::InvalidParent("/a/b".into()).is_recoverable());
        assert!(Error::invalid_geometry("/c", "knots").is_recoverable());
        assert!(!Error::open("x", "y").is_recoverable());
        assert!(!Error::ReadOnly.is_recoverable());
    }
}
