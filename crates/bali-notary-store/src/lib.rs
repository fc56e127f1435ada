//! # Bali Notary Store
//!
//! Durable, private storage for one notary key and its certificate.
//!
//! The [`KeyStore`] trait abstracts persistence so the security module can
//! run against the real [`FileStore`] or the in-memory [`MemoryStore`] in
//! tests. The file store keeps two files under a per-account directory,
//! `NotaryKey` and `NotaryCertificate`, with owner-only permissions and
//! atomic replacement.
//!
//! Only one store instance per directory is supported. Two processes
//! sharing a directory race on the temp files; that is a deployment
//! constraint, not something the store defends against.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyStore, StoredKey};
