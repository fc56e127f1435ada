//! Error types for the notarization protocol.

use thiserror::Error;

use bali_notary_values::ValueError;

/// Errors raised while building or consuming notarized artifacts.
///
/// Validation outcomes (a bad signature, a mismatched digest) are not
/// errors; those are returned as `false` from the verify operations.
/// These variants cover structural corruption and missing capabilities.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The input component is missing required attributes or parameters,
    /// or an attribute has the wrong kind.
    #[error("malformed component: {0}")]
    MalformedComponent(String),

    /// The artifact names a protocol with no registered algorithm suite.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// The authentication tag did not match during decryption.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Encryption could not be performed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// A value could not be constructed or parsed.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}
