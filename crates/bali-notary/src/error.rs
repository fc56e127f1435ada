//! Error types for the notary facade.

use thiserror::Error;

use bali_notary_core::ProtocolError;
use bali_notary_ssm::SsmError;

/// Errors surfaced by the notary API.
///
/// Validation outcomes are not errors: a bad signature or a mismatched
/// digest comes back as `false` from the verify operations, because
/// callers routinely test a document against many certificates.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// Failure inside the security module.
    #[error(transparent)]
    Ssm(#[from] SsmError),

    /// Structural failure in an artifact or a missing algorithm suite.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
