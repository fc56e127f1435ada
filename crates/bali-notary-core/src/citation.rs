//! Citations: content-addressed references to documents.
//!
//! A citation names a document by the tag and version of its payload plus
//! the digest of its canonical bytes. A citation whose digest is the
//! `none` sentinel is a proto-citation; it appears only in the genesis
//! certificate's `$previous` slot.

use bali_notary_values::{Catalog, Component, Moment, Parameters, Tag, Value, Version};

use crate::access;
use crate::error::ProtocolError;

/// The parameterized type of citation records.
pub const CITATION_TYPE: &str = "/bali/notary/Citation/v1";

/// The type prefix any citation must carry.
pub const CITATION_TYPE_PREFIX: &str = "/bali/notary/Citation/v";

/// Build a citation record. A `digest` of `None` builds a proto-citation.
pub fn new_citation(
    protocol: Version,
    timestamp: Moment,
    tag: Tag,
    version: Version,
    digest: Option<Vec<u8>>,
) -> Component {
    let mut catalog = Catalog::new();
    catalog.set("protocol", Component::from(protocol));
    catalog.set("timestamp", Component::from(timestamp));
    catalog.set("tag", Component::from(tag));
    catalog.set("version", Component::from(version));
    catalog.set(
        "digest",
        digest.map(Component::binary).unwrap_or_else(Component::none),
    );

    let mut parameters = Parameters::new();
    parameters.set("type", Component::name(CITATION_TYPE));
    Component::with_parameters(Value::Catalog(catalog), parameters)
}

/// Typed view over a citation record.
pub struct CitationView<'a> {
    pub protocol: &'a Version,
    pub timestamp: &'a Moment,
    /// The tag of the cited component.
    pub tag: &'a Tag,
    /// The version of the cited component.
    pub version: &'a Version,
    /// The digest of the cited document's canonical bytes; `None` for a
    /// proto-citation.
    pub digest: Option<&'a [u8]>,
}

impl<'a> CitationView<'a> {
    /// Validate the record structure and expose its attributes.
    pub fn parse(citation: &'a Component) -> Result<Self, ProtocolError> {
        access::require_type(citation, CITATION_TYPE_PREFIX)?;
        let catalog = access::catalog(citation)?;

        let digest = access::attribute(catalog, "digest")?;
        let digest = if digest.is_none() {
            None
        } else {
            Some(digest.as_binary().ok_or_else(|| {
                access::malformed("$digest is not a binary string")
            })?)
        };

        Ok(Self {
            protocol: access::version(catalog, "protocol")?,
            timestamp: access::moment(catalog, "timestamp")?,
            tag: access::tag(catalog, "tag")?,
            version: access::version(catalog, "version")?,
            digest,
        })
    }
}
