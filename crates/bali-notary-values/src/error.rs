//! Error types for the values crate.

use thiserror::Error;

/// Errors raised while constructing or parsing structured values.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("character '{0}' is not in the base-32 alphabet")]
    InvalidBase32(char),

    #[error("base-32 padding bits must be zero")]
    InvalidPadding,

    #[error("a tag requires 20 bytes, text had {0} characters")]
    InvalidTagLength(usize),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("invalid moment: {0}")]
    InvalidMoment(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("nesting exceeds the maximum depth of {0}")]
    TooDeep(usize),
}
