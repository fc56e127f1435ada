//! Shared helpers for reading typed attributes out of artifact records.

use bali_notary_values::{Catalog, Component, Moment, Tag, Version};

use crate::error::ProtocolError;

pub(crate) fn malformed(message: impl Into<String>) -> ProtocolError {
    ProtocolError::MalformedComponent(message.into())
}

/// The catalog behind an artifact component.
pub(crate) fn catalog(component: &Component) -> Result<&Catalog, ProtocolError> {
    component
        .as_catalog()
        .ok_or_else(|| malformed("artifact is not a catalog"))
}

/// Check that the `$type` parameter is a name starting with `prefix`.
pub(crate) fn require_type(component: &Component, prefix: &str) -> Result<(), ProtocolError> {
    let name = component
        .parameter("type")
        .and_then(Component::as_name)
        .ok_or_else(|| malformed("missing $type parameter"))?;
    if !name.starts_with(prefix) {
        return Err(malformed(format!("expected a {prefix}.. type, got {name}")));
    }
    Ok(())
}

pub(crate) fn attribute<'a>(
    catalog: &'a Catalog,
    key: &str,
) -> Result<&'a Component, ProtocolError> {
    catalog
        .get(key)
        .ok_or_else(|| malformed(format!("missing ${key} attribute")))
}

pub(crate) fn version<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Version, ProtocolError> {
    attribute(catalog, key)?
        .as_version()
        .ok_or_else(|| malformed(format!("${key} is not a version")))
}

pub(crate) fn moment<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Moment, ProtocolError> {
    attribute(catalog, key)?
        .as_moment()
        .ok_or_else(|| malformed(format!("${key} is not a moment")))
}

pub(crate) fn tag<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Tag, ProtocolError> {
    attribute(catalog, key)?
        .as_tag()
        .ok_or_else(|| malformed(format!("${key} is not a tag")))
}

pub(crate) fn binary<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a [u8], ProtocolError> {
    attribute(catalog, key)?
        .as_binary()
        .ok_or_else(|| malformed(format!("${key} is not a binary string")))
}

/// A fixed-size binary attribute.
pub(crate) fn binary_array<const N: usize>(
    catalog: &Catalog,
    key: &str,
) -> Result<[u8; N], ProtocolError> {
    binary(catalog, key)?
        .try_into()
        .map_err(|_| malformed(format!("${key} must be {N} bytes")))
}

/// A parameter that must be a tag.
pub(crate) fn tag_parameter<'a>(
    component: &'a Component,
    key: &str,
) -> Result<&'a Tag, ProtocolError> {
    component
        .parameter(key)
        .and_then(Component::as_tag)
        .ok_or_else(|| malformed(format!("missing ${key} tag parameter")))
}

/// A parameter that must be a version.
pub(crate) fn version_parameter<'a>(
    component: &'a Component,
    key: &str,
) -> Result<&'a Version, ProtocolError> {
    component
        .parameter(key)
        .and_then(Component::as_version)
        .ok_or_else(|| malformed(format!("missing ${key} version parameter")))
}
