//! In-memory implementation of the KeyStore trait.
//!
//! This is primarily for testing. It has the same semantics as the file
//! store but keeps everything in memory with no persistence.

use std::sync::RwLock;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::traits::{KeyStore, StoredKey};

/// In-memory store implementation. All data is lost when the store is
/// dropped.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Option<(Zeroizing<String>, String)>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn load(&self) -> Result<Option<StoredKey>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.as_ref().map(|(key, certificate)| StoredKey {
            key: key.clone(),
            certificate: certificate.clone(),
        }))
    }

    async fn save(&self, key: &str, certificate: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        *inner = Some((Zeroizing::new(key.to_string()), certificate.to_string()));
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        *inner = None;
        Ok(())
    }
}
