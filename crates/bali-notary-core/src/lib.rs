//! # Bali Notary Core
//!
//! The notarization protocol: algorithm suites, the protocol registry, and
//! the structured records that make up notarized artifacts.
//!
//! ## Artifacts
//!
//! - [`document`] - the signed envelope around any component
//! - [`certificate`] - a notary's published public key, chained across
//!   key rotations via `$previous` citations
//! - [`citation`] - a content-addressed reference to a document
//! - [`aem`] - an authenticated encrypted message
//!
//! ## Protocol Versions
//!
//! Every artifact names the protocol that produced it. The
//! [`ProtocolRegistry`] maps protocol versions to [`AlgorithmSuite`]s:
//! new artifacts use the preferred (highest) version, received artifacts
//! dispatch on their own `$protocol`.

mod access;
pub mod aem;
pub mod certificate;
pub mod citation;
pub mod document;
mod error;
mod registry;
pub mod v1;

pub use error::ProtocolError;
pub use registry::{digests_equal, AlgorithmSuite, ProtocolRegistry};
pub use v1::{SealedMessage, SuiteV1, DIGEST_SIZE, IV_SIZE, TAG_SIZE};
