//! Error taxonomy shared by services, the session store and containers.
//!
//! Containers never hand these to the view layer directly: they store the
//! rendered message in their state's `error` slot instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by services and persistence.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A required field was missing or empty.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// Operating on an id absent from current state.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Invalid credentials, or an expired or absent token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The caller cancelled the operation before it resolved.
    #[error("Operation cancelled")]
    Cancelled,

    /// Reading or writing the persisted session failed.
    #[error("Storage error at '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An upload was not an image.
    #[error("File is not an image (type '{mime}')")]
    NotAnImage { mime: String },
}

impl VaultError {
    /// Stable tag for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            VaultError::Validation { .. } => "validation_error",
            VaultError::NotFound { .. } => "not_found",
            VaultError::Auth(_) => "auth_error",
            VaultError::Cancelled => "cancelled",
            VaultError::Storage { .. } => "storage_error",
            VaultError::Serialization(_) => "serialization_error",
            VaultError::NotAnImage { .. } => "not_an_image",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, VaultError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = VaultError::Validation { field: "email" };
        assert_eq!(err.to_string(), "email is required");
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_not_found_message() {
        let err = VaultError::NotFound {
            entity: "Gallery",
            id: 42,
        };
        assert_eq!(err.to_string(), "Gallery 42 not found");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_cancelled_is_detected() {
        assert!(VaultError::Cancelled.is_cancelled());
        assert!(!VaultError::Auth("nope".into()).is_cancelled());
    }
}
