//! Certificates: a notary's published public key.
//!
//! A certificate binds a public key to an account. The `$tag` parameter is
//! the notary key's stable identifier and never changes across rotations;
//! `$version` increases with every rotation and `$previous` cites the
//! certificate the new one supersedes.

use bali_notary_values::{Catalog, Component, Moment, Parameters, Tag, Value, Version};

use crate::access;
use crate::citation;
use crate::error::ProtocolError;

/// The parameterized type of certificate records.
pub const CERTIFICATE_TYPE: &str = "/bali/notary/Certificate/v1";

/// The type prefix any certificate must carry.
pub const CERTIFICATE_TYPE_PREFIX: &str = "/bali/notary/Certificate/v";

/// Notary certificates are always publicly readable; a restricted
/// certificate could not be used for verification.
pub const PUBLIC_PERMISSIONS: &str = "/bali/permissions/public/v1";

/// Build a certificate record.
///
/// `previous` cites the superseded certificate document; the genesis
/// certificate carries the `none` sentinel instead.
pub fn new_certificate(
    protocol: Version,
    timestamp: Moment,
    account_id: Tag,
    public_key: Vec<u8>,
    tag: Tag,
    version: Version,
    previous: Option<Component>,
) -> Component {
    let mut catalog = Catalog::new();
    catalog.set("protocol", Component::from(protocol));
    catalog.set("timestamp", Component::from(timestamp));
    catalog.set("accountId", Component::from(account_id));
    catalog.set("publicKey", Component::binary(public_key));

    let mut parameters = Parameters::new();
    parameters.set("type", Component::name(CERTIFICATE_TYPE));
    parameters.set("tag", Component::from(tag));
    parameters.set("version", Component::from(version));
    parameters.set("permissions", Component::name(PUBLIC_PERMISSIONS));
    parameters.set("previous", previous.unwrap_or_else(Component::none));
    Component::with_parameters(Value::Catalog(catalog), parameters)
}

/// Typed view over a certificate record.
pub struct CertificateView<'a> {
    pub protocol: &'a Version,
    pub timestamp: &'a Moment,
    pub account_id: &'a Tag,
    /// The uncompressed P-256 public point.
    pub public_key: &'a [u8],
    /// The notary key's stable identifier.
    pub tag: &'a Tag,
    /// The certificate version, strictly increasing across rotations.
    pub version: &'a Version,
    /// Citation to the prior certificate; `None` for the genesis.
    pub previous: Option<&'a Component>,
}

impl<'a> CertificateView<'a> {
    /// Validate the record structure and expose its attributes.
    pub fn parse(certificate: &'a Component) -> Result<Self, ProtocolError> {
        access::require_type(certificate, CERTIFICATE_TYPE_PREFIX)?;
        let catalog = access::catalog(certificate)?;

        let previous = certificate
            .parameter("previous")
            .ok_or_else(|| access::malformed("missing $previous parameter"))?;
        if !previous.is_none() {
            // Anything other than the sentinel must be a real citation.
            citation::CitationView::parse(previous)?;
        }

        Ok(Self {
            protocol: access::version(catalog, "protocol")?,
            timestamp: access::moment(catalog, "timestamp")?,
            account_id: access::tag(catalog, "accountId")?,
            public_key: access::binary(catalog, "publicKey")?,
            tag: access::tag_parameter(certificate, "tag")?,
            version: access::version_parameter(certificate, "version")?,
            previous: (!previous.is_none()).then_some(previous),
        })
    }
}
