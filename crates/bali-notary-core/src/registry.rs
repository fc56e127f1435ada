//! The protocol registry: protocol versions mapped to algorithm suites.

use std::collections::BTreeMap;

use p256::SecretKey;
use subtle::ConstantTimeEq;

use bali_notary_values::Version;

use crate::error::ProtocolError;
use crate::v1::{SealedMessage, SuiteV1, DIGEST_SIZE, IV_SIZE, TAG_SIZE};

/// The closed set of algorithm suites. Adding a protocol version means
/// adding a variant here and registering it.
#[derive(Debug, Clone)]
pub enum AlgorithmSuite {
    /// P-256 ECDSA over SHA-512, ECDH + AES-256-GCM.
    V1(SuiteV1),
}

impl AlgorithmSuite {
    /// The protocol version this suite implements.
    pub fn protocol(&self) -> Version {
        match self {
            Self::V1(_) => Version::initial(),
        }
    }

    pub fn digest(&self, bytes: &[u8]) -> [u8; DIGEST_SIZE] {
        match self {
            Self::V1(suite) => suite.digest(bytes),
        }
    }

    pub fn generate_keypair(&self) -> (Vec<u8>, SecretKey) {
        match self {
            Self::V1(suite) => suite.generate_keypair(),
        }
    }

    pub fn sign(&self, secret: &SecretKey, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::V1(suite) => suite.sign(secret, bytes),
        }
    }

    pub fn verify(&self, public_key: &[u8], bytes: &[u8], signature_der: &[u8]) -> bool {
        match self {
            Self::V1(suite) => suite.verify(public_key, bytes, signature_der),
        }
    }

    pub fn encrypt(
        &self,
        recipient_public: &[u8],
        plaintext: &[u8],
    ) -> Result<SealedMessage, ProtocolError> {
        match self {
            Self::V1(suite) => suite.encrypt(recipient_public, plaintext),
        }
    }

    pub fn decrypt(
        &self,
        secret: &SecretKey,
        seed: &[u8],
        iv: &[u8; IV_SIZE],
        auth: &[u8; TAG_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        match self {
            Self::V1(suite) => suite.decrypt(secret, seed, iv, auth, ciphertext),
        }
    }
}

/// Maps protocol versions to algorithm suites.
///
/// The map is ordered, so the preferred protocol (the highest registered
/// version) is a deterministic function of the registry contents and
/// survives restarts. Keeping an old suite registered keeps the documents
/// it produced verifiable.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    suites: BTreeMap<Version, AlgorithmSuite>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        let mut registry = Self {
            suites: BTreeMap::new(),
        };
        registry.register(AlgorithmSuite::V1(SuiteV1));
        registry
    }
}

impl ProtocolRegistry {
    /// Register a suite under its own protocol version.
    pub fn register(&mut self, suite: AlgorithmSuite) {
        self.suites.insert(suite.protocol(), suite);
    }

    /// The suite used for every operation that produces a new artifact.
    pub fn preferred(&self) -> &AlgorithmSuite {
        self.suites
            .last_key_value()
            .map(|(_, suite)| suite)
            .expect("the registry always contains at least one suite")
    }

    /// Look up the suite named by a received artifact's `$protocol`.
    pub fn suite(&self, protocol: &Version) -> Result<&AlgorithmSuite, ProtocolError> {
        self.suites
            .get(protocol)
            .ok_or_else(|| ProtocolError::UnsupportedProtocol(protocol.to_string()))
    }

    /// The registered protocol versions, lowest first.
    pub fn protocols(&self) -> impl Iterator<Item = &Version> {
        self.suites.keys()
    }
}

/// Constant-time equality on digest bytes.
///
/// Citation matching compares attacker-suppliable digests, so the
/// comparison must not leak the position of the first mismatch.
pub fn digests_equal(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}
