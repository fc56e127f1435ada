//! Tags: 20-byte random identifiers rendered `#<base32>`.

use std::fmt;

use rand::RngCore;

use crate::base32;
use crate::error::ValueError;

/// The number of raw bytes in a tag.
pub const TAG_SIZE: usize = 20;

/// A 20-byte identifier. 160 bits encode to exactly 32 base-32 characters,
/// so the rendered form is always `#` plus 32 characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Generate a new random tag.
    pub fn random() -> Self {
        let mut bytes = [0u8; TAG_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }

    /// Parse the text form, without the leading `#`.
    pub fn from_base32(text: &str) -> Result<Self, ValueError> {
        let bytes = base32::decode(text)?;
        let array: [u8; TAG_SIZE] = bytes
            .try_into()
            .map_err(|_| ValueError::InvalidTagLength(text.len()))?;
        Ok(Self(array))
    }

    /// The text form, without the leading `#`.
    pub fn to_base32(&self) -> String {
        base32::encode(&self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_base32())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(#{})", &self.to_base32()[..8])
    }
}
