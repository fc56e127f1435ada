//! # Bali Notary Values
//!
//! Structured values for the digital notary: the typed leaves (tags,
//! versions, moments, binary strings, names), insertion-ordered catalogs,
//! parameterized components, and the canonical text notation that binds
//! them to a deterministic byte sequence.
//!
//! ## Canonical Notation
//!
//! Every component has exactly one textual rendering. Same logical value,
//! same bytes, same digest. The rules:
//!
//! - catalogs render one entry per line, nested levels indented four spaces
//! - parameters render in parentheses after the value, comma separated
//! - binary strings render as `'<base32>'`, tags as `#<base32>`
//! - the sentinel renders as `none`, an empty catalog as `[:]`
//!
//! [`parse_component`] round-trips the canonical form exactly.

pub mod base32;
mod component;
mod error;
mod format;
mod moment;
mod parse;
mod tag;
mod version;

pub use component::{Catalog, Component, Parameters, Value};
pub use error::ValueError;
pub use moment::Moment;
pub use parse::parse_component;
pub use tag::Tag;
pub use version::Version;

/// Maximum nesting depth accepted by the parser.
pub const MAX_DEPTH: usize = 32;
