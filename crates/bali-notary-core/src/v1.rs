//! Algorithm suite `v1`: P-256 ECDSA over SHA-512, ECDH + AES-256-GCM.
//!
//! The parameters are fixed. Signatures are DER encoded. The symmetric key
//! for encryption is the first 32 bytes of the ECDH shared secret (the
//! x-coordinate of the shared point); no further derivation is applied, so
//! independent implementations interoperate.

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use p256::ecdh::{diffie_hellman, EphemeralSecret};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::error::ProtocolError;

/// SHA-512 output size in bytes.
pub const DIGEST_SIZE: usize = 64;

/// AES-256-GCM initialization vector size in bytes (96 bits).
pub const IV_SIZE: usize = 12;

/// AES-256-GCM authentication tag size in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// The output of [`SuiteV1::encrypt`]: everything a recipient needs to
/// recover the plaintext with their private scalar.
#[derive(Debug, Clone)]
pub struct SealedMessage {
    /// The ephemeral ECDH public key, uncompressed.
    pub seed: Vec<u8>,
    /// The random initialization vector.
    pub iv: [u8; IV_SIZE],
    /// The GCM authentication tag.
    pub auth: [u8; TAG_SIZE],
    /// The ciphertext without the tag.
    pub ciphertext: Vec<u8>,
}

/// The version 1 algorithm suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteV1;

impl SuiteV1 {
    /// Compute the SHA-512 digest of the given bytes.
    pub fn digest(&self, bytes: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(Sha512::digest(bytes).as_slice());
        digest
    }

    /// Generate a fresh P-256 key pair. The public key is returned as an
    /// uncompressed SEC1 point (65 bytes, `0x04` prefixed).
    pub fn generate_keypair(&self) -> (Vec<u8>, SecretKey) {
        let secret = SecretKey::random(&mut rand::thread_rng());
        let public = secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        (public, secret)
    }

    /// Sign bytes with the private scalar: ECDSA over the SHA-512 digest,
    /// DER encoded.
    pub fn sign(&self, secret: &SecretKey, bytes: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::from(secret);
        let signature: Signature = signing_key
            .sign_prehash(Sha512::digest(bytes).as_slice())
            .expect("a 64-byte prehash is always signable");
        signature.to_der().as_bytes().to_vec()
    }

    /// Verify a DER signature over bytes against an uncompressed public
    /// point. Malformed points and signatures are simply invalid.
    pub fn verify(&self, public_key: &[u8], bytes: &[u8], signature_der: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_der(signature_der) else {
            return false;
        };
        verifying_key
            .verify_prehash(Sha512::digest(bytes).as_slice(), &signature)
            .is_ok()
    }

    /// Encrypt plaintext for the holder of the private scalar matching
    /// `recipient_public`.
    pub fn encrypt(
        &self,
        recipient_public: &[u8],
        plaintext: &[u8],
    ) -> Result<SealedMessage, ProtocolError> {
        let recipient = PublicKey::from_sec1_bytes(recipient_public).map_err(|_| {
            ProtocolError::MalformedComponent("recipient public key is not a P-256 point".into())
        })?;

        let ephemeral = EphemeralSecret::random(&mut rand::thread_rng());
        let seed = ephemeral
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        let shared = ephemeral.diffie_hellman(&recipient);

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&shared.raw_secret_bytes()[..32]));

        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let sealed = cipher
            .encrypt(GenericArray::from_slice(&iv), plaintext)
            .map_err(|e| ProtocolError::Encryption(e.to_string()))?;

        // The aead crate appends the tag to the ciphertext; the artifact
        // layer carries them as separate attributes.
        let split = sealed.len() - TAG_SIZE;
        let auth: [u8; TAG_SIZE] = sealed[split..]
            .try_into()
            .expect("GCM output always ends with a full tag");

        Ok(SealedMessage {
            seed,
            iv,
            auth,
            ciphertext: sealed[..split].to_vec(),
        })
    }

    /// Decrypt a sealed message with the recipient's private scalar.
    ///
    /// Fails with [`ProtocolError::AuthenticationFailed`] when any byte of
    /// the ciphertext, IV or tag has been altered.
    pub fn decrypt(
        &self,
        secret: &SecretKey,
        seed: &[u8],
        iv: &[u8; IV_SIZE],
        auth: &[u8; TAG_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        let ephemeral = PublicKey::from_sec1_bytes(seed).map_err(|_| {
            ProtocolError::MalformedComponent("$seed is not a P-256 point".into())
        })?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&shared.raw_secret_bytes()[..32]));

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(auth);

        cipher
            .decrypt(GenericArray::from_slice(iv), sealed.as_slice())
            .map_err(|_| ProtocolError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let suite = SuiteV1;
        assert_eq!(suite.digest(b"test data"), suite.digest(b"test data"));
        assert_ne!(suite.digest(b"test data"), suite.digest(b"other data"));
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let suite = SuiteV1;
        let (public, secret) = suite.generate_keypair();
        let message = b"hello world";
        let signature = suite.sign(&secret, message);

        assert!(suite.verify(&public, message, &signature));
        assert!(!suite.verify(&public, b"hello worlD", &signature));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let suite = SuiteV1;
        let (_, secret) = suite.generate_keypair();
        let (other_public, _) = suite.generate_keypair();
        let signature = suite.sign(&secret, b"message");
        assert!(!suite.verify(&other_public, b"message", &signature));
    }

    #[test]
    fn test_verify_malformed_inputs_are_false() {
        let suite = SuiteV1;
        let (public, secret) = suite.generate_keypair();
        let signature = suite.sign(&secret, b"message");

        assert!(!suite.verify(b"not a point", b"message", &signature));
        assert!(!suite.verify(&public, b"message", b"not a signature"));
        assert!(!suite.verify(&public, b"message", &[]));
    }

    #[test]
    fn test_public_key_is_uncompressed_sec1() {
        let suite = SuiteV1;
        let (public, _) = suite.generate_keypair();
        assert_eq!(public.len(), 65);
        assert_eq!(public[0], 0x04);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let suite = SuiteV1;
        let (public, secret) = suite.generate_keypair();
        let plaintext = b"This is a test...";

        let sealed = suite.encrypt(&public, plaintext).unwrap();
        let recovered = suite
            .decrypt(&secret, &sealed.seed, &sealed.iv, &sealed.auth, &sealed.ciphertext)
            .unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_decrypt_detects_tampering() {
        let suite = SuiteV1;
        let (public, secret) = suite.generate_keypair();
        let sealed = suite.encrypt(&public, b"secret message").unwrap();

        // Flip one byte of the ciphertext.
        let mut tampered = sealed.ciphertext.clone();
        tampered[0] ^= 0x01;
        let result = suite.decrypt(&secret, &sealed.seed, &sealed.iv, &sealed.auth, &tampered);
        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));

        // Flip one byte of the IV.
        let mut iv = sealed.iv;
        iv[0] ^= 0x01;
        let result = suite.decrypt(&secret, &sealed.seed, &iv, &sealed.auth, &sealed.ciphertext);
        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));

        // Flip one byte of the tag.
        let mut auth = sealed.auth;
        auth[0] ^= 0x01;
        let result = suite.decrypt(&secret, &sealed.seed, &sealed.iv, &auth, &sealed.ciphertext);
        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let suite = SuiteV1;
        let (public, _) = suite.generate_keypair();
        let (_, other_secret) = suite.generate_keypair();
        let sealed = suite.encrypt(&public, b"secret").unwrap();

        let result = suite.decrypt(
            &other_secret,
            &sealed.seed,
            &sealed.iv,
            &sealed.auth,
            &sealed.ciphertext,
        );
        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));
    }

    #[test]
    fn test_ephemeral_keys_are_unique() {
        let suite = SuiteV1;
        let (public, _) = suite.generate_keypair();
        let first = suite.encrypt(&public, b"same message").unwrap();
        let second = suite.encrypt(&public, b"same message").unwrap();
        assert_ne!(first.seed, second.seed);
        assert_ne!(first.ciphertext, second.ciphertext);
    }
}
