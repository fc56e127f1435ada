//! Authenticated encrypted messages.
//!
//! An AEM carries everything the holder of the recipient's private scalar
//! needs to recover the plaintext: the ephemeral public key (`$seed`), the
//! initialization vector, the authentication tag, and the ciphertext.

use bali_notary_values::{Catalog, Component, Moment, Parameters, Value, Version};

use crate::access;
use crate::error::ProtocolError;
use crate::v1::{SealedMessage, IV_SIZE, TAG_SIZE};

/// The parameterized type of AEM records.
pub const AEM_TYPE: &str = "/bali/notary/AEM/v1";

/// The type prefix any AEM must carry.
pub const AEM_TYPE_PREFIX: &str = "/bali/notary/AEM/v";

/// Build an AEM record from the output of an algorithm suite.
pub fn new_aem(protocol: Version, timestamp: Moment, sealed: SealedMessage) -> Component {
    let mut catalog = Catalog::new();
    catalog.set("protocol", Component::from(protocol));
    catalog.set("timestamp", Component::from(timestamp));
    catalog.set("seed", Component::binary(sealed.seed));
    catalog.set("iv", Component::binary(sealed.iv.to_vec()));
    catalog.set("auth", Component::binary(sealed.auth.to_vec()));
    catalog.set("ciphertext", Component::binary(sealed.ciphertext));

    let mut parameters = Parameters::new();
    parameters.set("type", Component::name(AEM_TYPE));
    Component::with_parameters(Value::Catalog(catalog), parameters)
}

/// Typed view over an AEM record.
pub struct AemView<'a> {
    pub protocol: &'a Version,
    pub timestamp: &'a Moment,
    /// The ephemeral ECDH public key.
    pub seed: &'a [u8],
    pub iv: [u8; IV_SIZE],
    pub auth: [u8; TAG_SIZE],
    pub ciphertext: &'a [u8],
}

impl<'a> AemView<'a> {
    /// Validate the record structure and expose its attributes.
    pub fn parse(aem: &'a Component) -> Result<Self, ProtocolError> {
        access::require_type(aem, AEM_TYPE_PREFIX)?;
        let catalog = access::catalog(aem)?;

        Ok(Self {
            protocol: access::version(catalog, "protocol")?,
            timestamp: access::moment(catalog, "timestamp")?,
            seed: access::binary(catalog, "seed")?,
            iv: access::binary_array(catalog, "iv")?,
            auth: access::binary_array(catalog, "auth")?,
            ciphertext: access::binary(catalog, "ciphertext")?,
        })
    }

    /// Reassemble the suite-level sealed message.
    pub fn to_sealed(&self) -> SealedMessage {
        SealedMessage {
            seed: self.seed.to_vec(),
            iv: self.iv,
            auth: self.auth,
            ciphertext: self.ciphertext.to_vec(),
        }
    }
}
