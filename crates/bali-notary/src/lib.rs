//! # Bali Notary
//!
//! A digital notary: binds structured components to cryptographic
//! identities via detached signatures, cites documents by content address,
//! and encrypts messages for a recipient's public key.
//!
//! ## Example
//!
//! ```no_run
//! use bali_notary::{MemoryStore, Notary, SoftwareModule, Tag};
//! use bali_notary_values::{Catalog, Component, Parameters, Value, Version};
//!
//! # async fn example() -> Result<(), bali_notary::NotaryError> {
//! let module = SoftwareModule::new(Tag::random(), MemoryStore::new());
//! let mut notary = Notary::new(module);
//! notary.generate_key().await?;
//!
//! let mut content = Catalog::new();
//! content.set("foo", Component::text("bar"));
//! let mut parameters = Parameters::new();
//! parameters.set("tag", Component::from(Tag::random()));
//! parameters.set("version", Component::from(Version::initial()));
//! parameters.set("permissions", Component::name("/bali/permissions/public/v1"));
//! parameters.set("previous", Component::none());
//! let component = Component::with_parameters(Value::Catalog(content), parameters);
//!
//! let document = notary.notarize(component).await?;
//! let certificate = notary.certificate().expect("key was generated").clone();
//! assert!(notary.document_valid(&document, &certificate)?);
//! # Ok(())
//! # }
//! ```

mod error;
mod notary;

pub use error::NotaryError;
pub use notary::Notary;

pub use bali_notary_core::{AlgorithmSuite, ProtocolRegistry};
pub use bali_notary_ssm::{SecurityModule, SoftwareModule, SsmError};
pub use bali_notary_store::{FileStore, KeyStore, MemoryStore, StoreError};
pub use bali_notary_values::{Component, Moment, Tag, Version};
