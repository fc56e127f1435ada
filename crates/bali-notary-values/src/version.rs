//! Versions: ordered lists of positive integers rendered `v1` or `v1.2.3`.

use std::fmt;

use crate::error::ValueError;

/// A version number. Ordering is lexicographic on the component list, so
/// `v1 < v1.1 < v2`, which is the ordering key rotation relies on.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(Vec<u32>);

impl Version {
    /// The first version, `v1`.
    pub fn initial() -> Self {
        Self(vec![1])
    }

    /// Create from explicit components. Components must be nonzero.
    pub fn new(components: Vec<u32>) -> Result<Self, ValueError> {
        if components.is_empty() || components.contains(&0) {
            return Err(ValueError::InvalidVersion(format!("{components:?}")));
        }
        Ok(Self(components))
    }

    /// The next version: the last component incremented by one.
    pub fn next(&self) -> Self {
        let mut components = self.0.clone();
        *components.last_mut().expect("versions are non-empty") += 1;
        Self(components)
    }

    /// The version components.
    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Parse the text form, without the leading `v`.
    pub fn from_text(text: &str) -> Result<Self, ValueError> {
        let components = text
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ValueError::InvalidVersion(text.to_string()))?;
        Self::new(components)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({self})")
    }
}
