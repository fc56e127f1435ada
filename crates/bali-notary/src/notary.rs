//! The Notary: the caller-facing API over the security module and the
//! algorithm suites.

use bali_notary_core::aem::{new_aem, AemView};
use bali_notary_core::certificate::CertificateView;
use bali_notary_core::citation::{new_citation, CitationView};
use bali_notary_core::document::{attach_signature, new_document, without_signature, DocumentView};
use bali_notary_core::{digests_equal, ProtocolError, ProtocolRegistry};
use bali_notary_ssm::{SecurityModule, SsmError};
use bali_notary_values::{parse_component, Component, Moment};

use crate::error::NotaryError;

type Result<T> = std::result::Result<T, NotaryError>;

/// The parameters every notarized component must carry.
const REQUIRED_PARAMETERS: [&str; 4] = ["tag", "version", "permissions", "previous"];

/// The digital notary for one account.
///
/// Generic over the [`SecurityModule`] so the same API runs against the
/// software reference module or a hardware adapter. The notary owns its
/// protocol registry: new artifacts use the preferred (highest) protocol,
/// received artifacts dispatch on their own `$protocol`.
pub struct Notary<M: SecurityModule> {
    ssm: M,
    registry: ProtocolRegistry,
}

impl<M: SecurityModule> Notary<M> {
    /// Create a notary over a security module with the default registry.
    pub fn new(ssm: M) -> Self {
        Self::with_registry(ssm, ProtocolRegistry::default())
    }

    /// Create a notary with an explicit protocol registry.
    pub fn with_registry(ssm: M, registry: ProtocolRegistry) -> Self {
        Self { ssm, registry }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Key Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Load any persisted key state. Idempotent.
    pub async fn initialize(&mut self) -> Result<()> {
        Ok(self.ssm.initialize().await?)
    }

    /// Generate the first notary key; returns its self-signed certificate
    /// document.
    pub async fn generate_key(&mut self) -> Result<Component> {
        Ok(self.ssm.generate_key().await?)
    }

    /// Rotate the notary key; returns the new certificate document, signed
    /// by the old key and chained via `$previous`.
    pub async fn rotate_key(&mut self) -> Result<Component> {
        Ok(self.ssm.rotate_key().await?)
    }

    /// Zero the key material and delete the persisted key files.
    pub async fn forget_key(&mut self) -> Result<()> {
        Ok(self.ssm.forget_key().await?)
    }

    /// The current notary certificate document, if any.
    pub fn certificate(&self) -> Option<&Component> {
        self.ssm.certificate()
    }

    /// A citation to the current certificate document, if any.
    pub fn citation(&self) -> Option<&Component> {
        self.ssm.citation()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notarization
    // ─────────────────────────────────────────────────────────────────────

    /// Notarize a component: envelope it, sign it with the notary key, and
    /// return the signed document.
    ///
    /// The component must carry the `$tag`, `$version`, `$permissions` and
    /// `$previous` parameters. Timestamps are embedded but carry no replay
    /// protection; callers that need it put a nonce in the component.
    pub async fn notarize(&self, component: Component) -> Result<Component> {
        // Validate the component before touching the module, so a
        // malformed input changes no state anywhere.
        for name in REQUIRED_PARAMETERS {
            if component.parameter(name).is_none() {
                return Err(ProtocolError::MalformedComponent(format!(
                    "a notarized component requires the ${name} parameter"
                ))
                .into());
            }
        }
        let citation = self
            .ssm
            .citation()
            .ok_or(SsmError::UninitializedKey)?
            .clone();

        let protocol = self.registry.preferred().protocol();
        let mut document = new_document(component, protocol, Moment::now(), Some(citation));
        let signature = self
            .ssm
            .sign(document.to_canonical_string().as_bytes())
            .await?;
        attach_signature(&mut document, signature)?;
        Ok(document)
    }

    /// Build a citation to a signed document.
    pub fn cite(&self, document: &Component) -> Result<Component> {
        let view = DocumentView::parse(document)?;
        let tag = *view
            .content
            .parameter("tag")
            .and_then(Component::as_tag)
            .ok_or_else(|| {
                ProtocolError::MalformedComponent("cited component has no $tag parameter".into())
            })?;
        let version = view
            .content
            .parameter("version")
            .and_then(Component::as_version)
            .ok_or_else(|| {
                ProtocolError::MalformedComponent(
                    "cited component has no $version parameter".into(),
                )
            })?
            .clone();

        let suite = self.registry.preferred();
        let digest = suite.digest(document.to_canonical_string().as_bytes());
        Ok(new_citation(
            suite.protocol(),
            Moment::now(),
            tag,
            version,
            Some(digest.to_vec()),
        ))
    }

    /// Whether a citation matches a document: the digest is recomputed and
    /// compared in constant time. A proto-citation matches nothing.
    pub fn citation_matches(&self, citation: &Component, document: &Component) -> Result<bool> {
        let view = CitationView::parse(citation)?;
        let suite = self.registry.suite(view.protocol)?;
        let Some(expected) = view.digest else {
            return Ok(false);
        };
        let digest = suite.digest(document.to_canonical_string().as_bytes());
        Ok(digests_equal(expected, &digest))
    }

    /// Whether a document's signature verifies under a certificate.
    ///
    /// Every recoverable mismatch is `false`; only a missing algorithm
    /// suite or structural corruption is an error. Certificate chains
    /// verify pairwise: `document_valid(cert_n, cert_n_minus_1_document)`,
    /// with the genesis certificate validating against its own document.
    pub fn document_valid(
        &self,
        document: &Component,
        certificate_document: &Component,
    ) -> Result<bool> {
        let view = DocumentView::parse(document)?;
        let suite = self.registry.suite(view.protocol)?;

        let certificate = DocumentView::parse(certificate_document)?;
        let public_key = CertificateView::parse(certificate.content)?.public_key;

        let stripped = without_signature(document)?;
        Ok(suite.verify(
            public_key,
            stripped.to_canonical_string().as_bytes(),
            view.signature,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Encryption
    // ─────────────────────────────────────────────────────────────────────

    /// Encrypt a component so only the holder of the certificate's private
    /// key can read it.
    pub fn encrypt_component(
        &self,
        component: &Component,
        certificate_document: &Component,
    ) -> Result<Component> {
        let certificate = DocumentView::parse(certificate_document)?;
        let public_key = CertificateView::parse(certificate.content)?.public_key;

        let suite = self.registry.preferred();
        let sealed = suite.encrypt(public_key, component.to_canonical_string().as_bytes())?;
        Ok(new_aem(suite.protocol(), Moment::now(), sealed))
    }

    /// Decrypt an authenticated encrypted message addressed to this
    /// notary's key.
    pub async fn decrypt_component(&self, aem: &Component) -> Result<Component> {
        let view = AemView::parse(aem)?;
        let current = self.registry.preferred().protocol();
        if view.protocol != &current {
            return Err(ProtocolError::UnsupportedProtocol(view.protocol.to_string()).into());
        }

        let plaintext = self.ssm.decrypt(aem).await?;
        let text = String::from_utf8(plaintext).map_err(|_| {
            ProtocolError::MalformedComponent("decrypted payload is not UTF-8".into())
        })?;
        Ok(parse_component(&text).map_err(ProtocolError::from)?)
    }
}
