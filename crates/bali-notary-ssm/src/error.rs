//! Error types for the security module.

use thiserror::Error;

use bali_notary_core::ProtocolError;
use bali_notary_store::StoreError;

/// Errors that can occur during security module operations.
///
/// The private key never appears in an error value.
#[derive(Debug, Error)]
pub enum SsmError {
    /// The operation requires an Active module and none is.
    #[error("the security module holds no key")]
    UninitializedKey,

    /// `generate_key` was called while a key is already held; callers must
    /// rotate instead.
    #[error("the security module already holds a key")]
    AlreadyInitialized,

    /// The persisted key state could not be parsed back.
    #[error("corrupt key record: {0}")]
    Corrupt(String),

    /// Storage failure from the backing key store.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Protocol failure from the algorithm suites or artifact records.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type for security module operations.
pub type Result<T> = std::result::Result<T, SsmError>;
