//! # Bali Notary SSM
//!
//! The security module: sole holder of the notary's private key.
//!
//! Every operation that needs the private key flows through the
//! [`SecurityModule`] trait. The [`SoftwareModule`] is the reference
//! implementation backed by a [`bali_notary_store::KeyStore`]; a hardware
//! security module adapter implements the same contract.
//!
//! ## State machine
//!
//! ```text
//! Uninitialized ──generate_key──▶ Active ──rotate_key──▶ Active
//!                                   │
//!                                   └──forget_key──▶ Uninitialized
//! ```
//!
//! `sign` and `decrypt` are valid only while Active. Rotation signs the
//! new certificate with the *old* key so any party that trusts the old
//! certificate can verify the handover; only the genesis certificate is
//! self-signed.

mod error;
mod record;
mod software;
mod traits;

pub use error::{Result, SsmError};
pub use record::{new_key_record, KeyRecordView, NOTARY_KEY_TYPE};
pub use software::SoftwareModule;
pub use traits::SecurityModule;
