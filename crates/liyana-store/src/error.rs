//! # Store Error Types
//!
//! Error types for cart persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (storefront) ← logged; the cart keeps working in memory      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use liyana_core::ValidationError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Cart persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Session id is not usable as a storage key.
    ///
    /// ## When This Occurs
    /// - Empty id
    /// - Not a UUID (the file store refuses anything that could escape its directory)
    #[error("Invalid session id: {0}")]
    InvalidSessionId(#[from] ValidationError),

    /// Reading or writing the snapshot failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    ///
    /// ## When This Occurs
    /// - File was hand-edited into invalid JSON
    /// - File was written by an incompatible version
    #[error("Corrupted cart snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("No data directory available")]
    NoDataDir,

    /// A lock guarding the in-memory store was poisoned by a panic.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Returns true if retrying the operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::InvalidSessionId(ValidationError::Required {
            field: "session id".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid session id: session id is required");
        assert!(!err.is_transient());

        let err = StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(err.is_transient());
    }
}
