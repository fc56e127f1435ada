//! The persisted NotaryKey record.
//!
//! The record pairs the private scalar with everything needed to restore
//! an Active module: the public key, the owning account, and a citation to
//! the current certificate document.

use bali_notary_core::citation::CitationView;
use bali_notary_core::ProtocolError;
use bali_notary_values::{Catalog, Component, Moment, Parameters, Tag, Value, Version};

use crate::error::SsmError;

/// The parameterized type of persisted key records.
pub const NOTARY_KEY_TYPE: &str = "/bali/notary/NotaryKey/v1";

/// The type prefix any key record must carry.
pub const NOTARY_KEY_TYPE_PREFIX: &str = "/bali/notary/NotaryKey/v";

/// Build a NotaryKey record.
pub fn new_key_record(
    protocol: Version,
    timestamp: Moment,
    account_id: Tag,
    public_key: Vec<u8>,
    private_key: Vec<u8>,
    certificate: Component,
) -> Component {
    let mut catalog = Catalog::new();
    catalog.set("protocol", Component::from(protocol));
    catalog.set("timestamp", Component::from(timestamp));
    catalog.set("accountId", Component::from(account_id));
    catalog.set("publicKey", Component::binary(public_key));
    catalog.set("privateKey", Component::binary(private_key));
    catalog.set("certificate", certificate);

    let mut parameters = Parameters::new();
    parameters.set("type", Component::name(NOTARY_KEY_TYPE));
    Component::with_parameters(Value::Catalog(catalog), parameters)
}

/// Typed view over a NotaryKey record.
pub struct KeyRecordView<'a> {
    pub protocol: &'a Version,
    pub account_id: &'a Tag,
    pub public_key: &'a [u8],
    pub private_key: &'a [u8],
    /// Citation to the current certificate document.
    pub certificate: &'a Component,
}

impl<'a> KeyRecordView<'a> {
    /// Validate the record structure and expose its attributes.
    pub fn parse(record: &'a Component) -> std::result::Result<Self, SsmError> {
        let type_name = record
            .parameter("type")
            .and_then(Component::as_name)
            .unwrap_or_default();
        if !type_name.starts_with(NOTARY_KEY_TYPE_PREFIX) {
            return Err(SsmError::Corrupt(format!(
                "unexpected record type: {type_name}"
            )));
        }
        let catalog = record
            .as_catalog()
            .ok_or_else(|| SsmError::Corrupt("key record is not a catalog".into()))?;

        let certificate = attribute(catalog, "certificate")?;
        CitationView::parse(certificate).map_err(corrupt)?;

        Ok(Self {
            protocol: attribute(catalog, "protocol")?
                .as_version()
                .ok_or_else(|| SsmError::Corrupt("$protocol is not a version".into()))?,
            account_id: attribute(catalog, "accountId")?
                .as_tag()
                .ok_or_else(|| SsmError::Corrupt("$accountId is not a tag".into()))?,
            public_key: attribute(catalog, "publicKey")?
                .as_binary()
                .ok_or_else(|| SsmError::Corrupt("$publicKey is not binary".into()))?,
            private_key: attribute(catalog, "privateKey")?
                .as_binary()
                .ok_or_else(|| SsmError::Corrupt("$privateKey is not binary".into()))?,
            certificate,
        })
    }
}

fn attribute<'a>(catalog: &'a Catalog, key: &str) -> std::result::Result<&'a Component, SsmError> {
    catalog
        .get(key)
        .ok_or_else(|| SsmError::Corrupt(format!("missing ${key} attribute")))
}

fn corrupt(error: ProtocolError) -> SsmError {
    SsmError::Corrupt(error.to_string())
}
