//! The KeyStore trait: the abstract interface for notary key persistence.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::Result;

/// The persisted state of a notary key: the canonical text of the private
/// key record and of the certificate document.
pub struct StoredKey {
    /// Canonical text of the NotaryKey record. Held in a zeroizing buffer
    /// because it embeds the private scalar.
    pub key: Zeroizing<String>,
    /// Canonical text of the notary certificate document.
    pub certificate: String,
}

/// Async interface for notary key persistence.
///
/// # Semantics
///
/// - `load` returns `None` when no key has ever been saved; the security
///   module then stays uninitialized.
/// - `save` replaces both artifacts; each write must be durable before the
///   call returns, and the replacement of an existing key must be atomic.
/// - `delete` removes both artifacts; deleting an empty store is a no-op.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Load the persisted key and certificate, if any.
    async fn load(&self) -> Result<Option<StoredKey>>;

    /// Durably persist the key record and certificate document.
    async fn save(&self, key: &str, certificate: &str) -> Result<()>;

    /// Remove the persisted key and certificate.
    async fn delete(&self) -> Result<()>;
}
