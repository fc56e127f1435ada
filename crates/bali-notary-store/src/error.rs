//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during key storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, propagated with context from the operation
    /// that hit it.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A key file or directory is readable by other users.
    #[error("insecure permissions on {path}")]
    InsecurePermissions {
        /// The offending path.
        path: String,
    },

    /// The platform cannot enforce owner-only file modes.
    #[error("cannot enforce file mode 0600 on this platform")]
    UnsupportedPlatform,

    /// The configuration directory could not be determined.
    #[error("cannot resolve the configuration directory: {0}")]
    NoConfigDir(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
