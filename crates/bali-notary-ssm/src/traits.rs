//! The SecurityModule trait: the contract every key holder implements.

use async_trait::async_trait;

use bali_notary_values::Component;

use crate::error::Result;

/// The contract between the notary and whatever holds the private key.
///
/// Implemented by the software reference module and, eventually, by
/// hardware security module adapters. Operations that touch storage or a
/// remote device are async; within one module instance they are serialized
/// in call order.
///
/// Cancellation is only safe before the atomic persist inside
/// `generate_key` and `rotate_key`; a caller that cancels mid-rotation
/// must call `initialize` again to resync with storage.
#[async_trait]
pub trait SecurityModule: Send + Sync {
    /// Load any persisted key and certificate. Idempotent; calling twice
    /// is equivalent to calling once.
    async fn initialize(&mut self) -> Result<()>;

    /// The current notary certificate document, or `None` while
    /// uninitialized.
    fn certificate(&self) -> Option<&Component>;

    /// A citation to the current certificate document, or `None` while
    /// uninitialized.
    fn citation(&self) -> Option<&Component>;

    /// Generate the first notary key and return its self-signed
    /// certificate document. Fails with
    /// [`SsmError::AlreadyInitialized`](crate::SsmError::AlreadyInitialized)
    /// when a key is already held.
    async fn generate_key(&mut self) -> Result<Component>;

    /// Replace the notary key. The new certificate document is signed by
    /// the *old* key and chains to the old certificate via `$previous`.
    /// The old key is discarded only after the new state is durable.
    async fn rotate_key(&mut self) -> Result<Component>;

    /// Zero the in-memory key material and delete the persisted files.
    /// Valid in any state; the module ends up uninitialized.
    async fn forget_key(&mut self) -> Result<()>;

    /// Sign canonical bytes with the private key.
    async fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt an authenticated encrypted message with the private key.
    async fn decrypt(&self, aem: &Component) -> Result<Vec<u8>>;
}
