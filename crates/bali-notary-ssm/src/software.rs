//! The software reference implementation of the security module.

use async_trait::async_trait;
use p256::SecretKey;
use zeroize::Zeroizing;

use bali_notary_core::aem::AemView;
use bali_notary_core::certificate::new_certificate;
use bali_notary_core::citation::{new_citation, CitationView};
use bali_notary_core::document::{attach_signature, new_document, DocumentView};
use bali_notary_core::ProtocolRegistry;
use bali_notary_store::KeyStore;
use bali_notary_values::{parse_component, Component, Moment, Tag, Version};

use crate::error::{Result, SsmError};
use crate::record::{new_key_record, KeyRecordView};
use crate::traits::SecurityModule;

/// The in-memory state of an Active module.
///
/// The private scalar lives inside [`SecretKey`], which zeroes itself on
/// drop, so forgetting the key or dropping the module wipes it.
struct ActiveKey {
    secret: SecretKey,
    public: Vec<u8>,
    tag: Tag,
    version: Version,
    citation: Component,
    certificate: Component,
}

/// The software security module.
///
/// Holds at most one notary key for one account. Only one module instance
/// per storage directory is supported.
pub struct SoftwareModule<S: KeyStore> {
    store: S,
    registry: ProtocolRegistry,
    account_id: Tag,
    state: Option<ActiveKey>,
}

impl<S: KeyStore> SoftwareModule<S> {
    /// Create an uninitialized module for `account_id` backed by `store`.
    pub fn new(account_id: Tag, store: S) -> Self {
        Self::with_registry(account_id, store, ProtocolRegistry::default())
    }

    /// Create a module with an explicit protocol registry.
    pub fn with_registry(account_id: Tag, store: S, registry: ProtocolRegistry) -> Self {
        Self {
            store,
            registry,
            account_id,
            state: None,
        }
    }

    /// The account this module notarizes for.
    pub fn account_id(&self) -> &Tag {
        &self.account_id
    }

    /// Generation and rotation share one flow; the difference is which key
    /// signs the new certificate document and where tag and version come
    /// from.
    async fn refresh_key(&mut self) -> Result<Component> {
        let suite = self.registry.preferred().clone();
        let protocol = suite.protocol();
        let (public, secret) = suite.generate_keypair();

        let (tag, version, previous) = match &self.state {
            Some(active) => (
                active.tag,
                active.version.next(),
                Some(active.citation.clone()),
            ),
            None => (Tag::random(), Version::initial(), None),
        };

        let timestamp = Moment::now();
        let certificate = new_certificate(
            protocol.clone(),
            timestamp,
            self.account_id,
            public.clone(),
            tag,
            version.clone(),
            previous.clone(),
        );
        let mut document = new_document(certificate, protocol.clone(), timestamp, previous);

        // A rotated certificate must be verifiable by anyone who only
        // trusts the old one, so the old key signs it. The genesis
        // certificate has no predecessor and signs itself.
        let unsigned = document.to_canonical_string();
        let signature = match &self.state {
            Some(active) => suite.sign(&active.secret, unsigned.as_bytes()),
            None => suite.sign(&secret, unsigned.as_bytes()),
        };
        attach_signature(&mut document, signature)?;

        let document_text = document.to_canonical_string();
        let digest = suite.digest(document_text.as_bytes());
        let citation = new_citation(
            protocol.clone(),
            Moment::now(),
            tag,
            version.clone(),
            Some(digest.to_vec()),
        );

        let record = new_key_record(
            protocol,
            Moment::now(),
            self.account_id,
            public.clone(),
            secret.to_bytes().to_vec(),
            citation.clone(),
        );
        let record_text = Zeroizing::new(record.to_canonical_string());

        // The swap happens only after the new state is durable; a failed
        // save leaves the old key in place.
        self.store.save(&record_text, &document_text).await?;

        let rotated = self.state.is_some();
        self.state = Some(ActiveKey {
            secret,
            public,
            tag,
            version: version.clone(),
            citation,
            certificate: document.clone(),
        });
        tracing::info!(%tag, %version, rotated, "notary key refreshed");
        Ok(document)
    }
}

#[async_trait]
impl<S: KeyStore> SecurityModule for SoftwareModule<S> {
    async fn initialize(&mut self) -> Result<()> {
        if self.state.is_some() {
            return Ok(());
        }
        let Some(stored) = self.store.load().await? else {
            return Ok(());
        };

        let record =
            parse_component(&stored.key).map_err(|e| SsmError::Corrupt(e.to_string()))?;
        let view = KeyRecordView::parse(&record)?;
        let secret = SecretKey::from_slice(view.private_key)
            .map_err(|_| SsmError::Corrupt("$privateKey is not a P-256 scalar".into()))?;

        let citation = view.certificate.clone();
        let reference = CitationView::parse(&citation)?;
        let tag = *reference.tag;
        let version = reference.version.clone();

        let certificate = parse_component(&stored.certificate)
            .map_err(|e| SsmError::Corrupt(e.to_string()))?;
        DocumentView::parse(&certificate)?;

        self.state = Some(ActiveKey {
            secret,
            public: view.public_key.to_vec(),
            tag,
            version,
            citation,
            certificate,
        });
        tracing::debug!(%tag, "restored notary key from storage");
        Ok(())
    }

    fn certificate(&self) -> Option<&Component> {
        self.state.as_ref().map(|active| &active.certificate)
    }

    fn citation(&self) -> Option<&Component> {
        self.state.as_ref().map(|active| &active.citation)
    }

    async fn generate_key(&mut self) -> Result<Component> {
        if self.state.is_some() {
            return Err(SsmError::AlreadyInitialized);
        }
        self.refresh_key().await
    }

    async fn rotate_key(&mut self) -> Result<Component> {
        if self.state.is_none() {
            return Err(SsmError::UninitializedKey);
        }
        self.refresh_key().await
    }

    async fn forget_key(&mut self) -> Result<()> {
        // Dropping the state zeroes the scalar.
        self.state = None;
        self.store.delete().await?;
        tracing::info!("notary key forgotten");
        Ok(())
    }

    async fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let active = self.state.as_ref().ok_or(SsmError::UninitializedKey)?;
        Ok(self.registry.preferred().sign(&active.secret, bytes))
    }

    async fn decrypt(&self, aem: &Component) -> Result<Vec<u8>> {
        let active = self.state.as_ref().ok_or(SsmError::UninitializedKey)?;
        let view = AemView::parse(aem)?;
        let suite = self.registry.suite(view.protocol)?;
        Ok(suite.decrypt(&active.secret, view.seed, &view.iv, &view.auth, view.ciphertext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bali_notary_core::certificate::CertificateView;
    use bali_notary_core::ProtocolError;
    use bali_notary_store::MemoryStore;

    fn make_module() -> SoftwareModule<MemoryStore> {
        SoftwareModule::new(Tag::random(), MemoryStore::new())
    }

    #[tokio::test]
    async fn test_uninitialized_refuses_sign_and_rotate() {
        let mut module = make_module();
        assert!(matches!(
            module.sign(b"bytes").await,
            Err(SsmError::UninitializedKey)
        ));
        assert!(matches!(
            module.rotate_key().await,
            Err(SsmError::UninitializedKey)
        ));
        assert!(module.certificate().is_none());
        assert!(module.citation().is_none());
    }

    #[tokio::test]
    async fn test_generate_key_produces_genesis_certificate() {
        let mut module = make_module();
        let document = module.generate_key().await.unwrap();

        let view = DocumentView::parse(&document).unwrap();
        assert!(view.certificate.is_none(), "genesis is self-signed");

        let certificate = CertificateView::parse(view.content).unwrap();
        assert_eq!(certificate.version, &Version::initial());
        assert!(certificate.previous.is_none());
        assert_eq!(certificate.account_id, module.account_id());
    }

    #[tokio::test]
    async fn test_generate_twice_is_already_initialized() {
        let mut module = make_module();
        module.generate_key().await.unwrap();
        assert!(matches!(
            module.generate_key().await,
            Err(SsmError::AlreadyInitialized)
        ));
    }

    #[tokio::test]
    async fn test_rotation_chains_and_keeps_the_tag() {
        let mut module = make_module();
        let genesis = module.generate_key().await.unwrap();
        let genesis_view = DocumentView::parse(&genesis).unwrap();
        let genesis_certificate = CertificateView::parse(genesis_view.content).unwrap();
        let stable_tag = *genesis_certificate.tag;

        let rotated = module.rotate_key().await.unwrap();
        let rotated_view = DocumentView::parse(&rotated).unwrap();
        let rotated_certificate = CertificateView::parse(rotated_view.content).unwrap();

        assert_eq!(rotated_certificate.tag, &stable_tag);
        assert_eq!(rotated_certificate.version, &Version::initial().next());
        assert!(rotated_view.certificate.is_some());

        let previous = CitationView::parse(rotated_certificate.previous.unwrap()).unwrap();
        assert_eq!(previous.tag, &stable_tag);
        assert_eq!(previous.version, &Version::initial());
    }

    #[tokio::test]
    async fn test_versions_increase_across_many_rotations() {
        let mut module = make_module();
        module.generate_key().await.unwrap();
        let mut last = Version::initial();
        for _ in 0..5 {
            let document = module.rotate_key().await.unwrap();
            let view = DocumentView::parse(&document).unwrap();
            let certificate = CertificateView::parse(view.content).unwrap();
            assert!(certificate.version > &last);
            last = certificate.version.clone();
        }
    }

    #[tokio::test]
    async fn test_forget_key_is_final() {
        let mut module = make_module();
        module.generate_key().await.unwrap();
        module.forget_key().await.unwrap();

        assert!(module.certificate().is_none());
        assert!(matches!(
            module.sign(b"bytes").await,
            Err(SsmError::UninitializedKey)
        ));

        // The store no longer holds anything either.
        assert!(module.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_initialize_restores_persisted_state() {
        let account = Tag::random();
        let store = MemoryStore::new();
        let mut module = SoftwareModule::new(account, store);
        module.generate_key().await.unwrap();
        let certificate = module.certificate().unwrap().clone();
        let citation = module.citation().unwrap().clone();
        let signature = module.sign(b"probe").await.unwrap();

        // A fresh module over the same store resumes where we left off.
        let SoftwareModule { store, .. } = module;
        let mut restored = SoftwareModule::new(account, store);
        restored.initialize().await.unwrap();

        assert_eq!(restored.certificate(), Some(&certificate));
        assert_eq!(restored.citation(), Some(&citation));

        // Both instances sign under the same public key.
        let view = DocumentView::parse(&certificate).unwrap();
        let public = CertificateView::parse(view.content).unwrap().public_key;
        let registry = ProtocolRegistry::default();
        assert!(registry.preferred().verify(public, b"probe", &signature));
        let signature = restored.sign(b"probe").await.unwrap();
        assert!(registry.preferred().verify(public, b"probe", &signature));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let mut module = make_module();
        module.generate_key().await.unwrap();
        let certificate = module.certificate().unwrap().clone();

        module.initialize().await.unwrap();
        module.initialize().await.unwrap();
        assert_eq!(module.certificate(), Some(&certificate));
    }

    #[tokio::test]
    async fn test_initialize_without_persisted_key_stays_uninitialized() {
        let mut module = make_module();
        module.initialize().await.unwrap();
        assert!(module.certificate().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_rejected() {
        let store = MemoryStore::new();
        store.save("not a component ]", "also wrong").await.unwrap();
        let mut module = SoftwareModule::new(Tag::random(), store);
        assert!(matches!(
            module.initialize().await,
            Err(SsmError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_decrypt_requires_supported_protocol() {
        let mut module = make_module();
        module.generate_key().await.unwrap();

        // An AEM claiming an unregistered protocol is refused.
        let aem = bali_notary_core::aem::new_aem(
            Version::from_text("99").unwrap(),
            Moment::now(),
            bali_notary_core::SealedMessage {
                seed: vec![0x04; 65],
                iv: [0; 12],
                auth: [0; 16],
                ciphertext: vec![1, 2, 3],
            },
        );
        assert!(matches!(
            module.decrypt(&aem).await,
            Err(SsmError::Protocol(ProtocolError::UnsupportedProtocol(_)))
        ));
    }
}
