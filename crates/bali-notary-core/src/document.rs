//! Documents: the signed envelope around any structured component.
//!
//! A document is immutable once signed. The signature covers the canonical
//! bytes of the envelope with the `$signature` attribute absent; everything
//! else, including the payload component and its parameters, is covered.

use bali_notary_values::{Catalog, Component, Moment, Parameters, Value, Version};

use crate::access;
use crate::error::ProtocolError;

/// The parameterized type of document envelopes.
pub const DOCUMENT_TYPE: &str = "/bali/notary/Document/v1";

/// The type prefix any verifiable document must carry.
pub const DOCUMENT_TYPE_PREFIX: &str = "/bali/notary/Document/v";

/// Build an unsigned document envelope around `content`.
///
/// `certificate` cites the signing certificate; it is `None` only when the
/// content *is* the first, self-signed certificate.
pub fn new_document(
    content: Component,
    protocol: Version,
    timestamp: Moment,
    certificate: Option<Component>,
) -> Component {
    let mut catalog = Catalog::new();
    catalog.set("component", content);
    catalog.set("protocol", Component::from(protocol));
    catalog.set("timestamp", Component::from(timestamp));
    catalog.set("certificate", certificate.unwrap_or_else(Component::none));

    let mut parameters = Parameters::new();
    parameters.set("type", Component::name(DOCUMENT_TYPE));
    Component::with_parameters(Value::Catalog(catalog), parameters)
}

/// Attach a signature to an unsigned envelope, finalizing it.
pub fn attach_signature(document: &mut Component, signature: Vec<u8>) -> Result<(), ProtocolError> {
    let catalog = document
        .as_catalog_mut()
        .ok_or_else(|| access::malformed("document is not a catalog"))?;
    catalog.set("signature", Component::binary(signature));
    Ok(())
}

/// A copy of the document with `$signature` removed: the exact bytes the
/// signature covers.
pub fn without_signature(document: &Component) -> Result<Component, ProtocolError> {
    let mut stripped = document.clone();
    let catalog = stripped
        .as_catalog_mut()
        .ok_or_else(|| access::malformed("document is not a catalog"))?;
    catalog.remove("signature");
    Ok(stripped)
}

/// Typed view over a finalized document envelope.
pub struct DocumentView<'a> {
    /// The payload component.
    pub content: &'a Component,
    /// The protocol that produced the document.
    pub protocol: &'a Version,
    /// When the document was notarized.
    pub timestamp: &'a Moment,
    /// Citation to the signing certificate; `None` for the self-signed
    /// genesis certificate document.
    pub certificate: Option<&'a Component>,
    /// The DER signature bytes.
    pub signature: &'a [u8],
}

impl<'a> DocumentView<'a> {
    /// Validate the envelope structure and expose its attributes.
    pub fn parse(document: &'a Component) -> Result<Self, ProtocolError> {
        access::require_type(document, DOCUMENT_TYPE_PREFIX)?;
        let catalog = access::catalog(document)?;

        let certificate = access::attribute(catalog, "certificate")?;
        Ok(Self {
            content: access::attribute(catalog, "component")?,
            protocol: access::version(catalog, "protocol")?,
            timestamp: access::moment(catalog, "timestamp")?,
            certificate: (!certificate.is_none()).then_some(certificate),
            signature: access::binary(catalog, "signature")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bali_notary_values::parse_component;

    fn make_document() -> Component {
        let mut content = Catalog::new();
        content.set("foo", Component::text("bar"));
        new_document(
            Component::from(content),
            Version::initial(),
            Moment::from_millis(1736870400000).unwrap(),
            None,
        )
    }

    #[test]
    fn test_envelope_shape() {
        let mut document = make_document();
        attach_signature(&mut document, vec![1, 2, 3]).unwrap();

        let view = DocumentView::parse(&document).unwrap();
        assert_eq!(view.protocol, &Version::initial());
        assert!(view.certificate.is_none());
        assert_eq!(view.signature, &[1, 2, 3]);
    }

    #[test]
    fn test_signature_is_excluded_from_signed_bytes() {
        let mut document = make_document();
        let unsigned = document.to_canonical_string();
        attach_signature(&mut document, vec![9; 72]).unwrap();

        let stripped = without_signature(&document).unwrap();
        assert_eq!(stripped.to_canonical_string(), unsigned);
        assert_ne!(document.to_canonical_string(), unsigned);
    }

    #[test]
    fn test_unsigned_envelope_is_not_a_valid_view() {
        let document = make_document();
        assert!(DocumentView::parse(&document).is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let component = parse_component("[\n    $foo: \"bar\"\n]($type: /bali/notary/Citation/v1)")
            .unwrap();
        assert!(matches!(
            DocumentView::parse(&component),
            Err(ProtocolError::MalformedComponent(_))
        ));
    }

    #[test]
    fn test_canonical_roundtrip() {
        let mut document = make_document();
        attach_signature(&mut document, vec![0xab; 70]).unwrap();
        let text = document.to_canonical_string();
        let parsed = parse_component(&text).unwrap();
        assert_eq!(parsed, document);
        assert!(DocumentView::parse(&parsed).is_ok());
    }
}
