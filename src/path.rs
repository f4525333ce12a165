//! Derivation paths
//!
//! Path is a sequence of child indexes, written as `m/44H/0H/0H/0/7`. The leading `m` (or `M`)
//! is optional, hardened indexes are marked with any of `H`, `h`, `'` or `p` suffixes.

use core::{fmt, str::FromStr};

use crate::{errors::ParsePathError, ChildIndex};

/// Sequence of child indexes leading from some node to its descendant
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Empty path pointing to the node itself
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a path extended by one more index
    pub fn child(&self, child_index: impl Into<ChildIndex>) -> Self {
        let mut path = self.0.clone();
        path.push(child_index.into());
        Self(path)
    }

    /// Iterates over indexes of the path
    pub fn iter(&self) -> impl Iterator<Item = ChildIndex> + '_ {
        self.0.iter().copied()
    }

    /// Number of indexes in the path, which is also a depth difference
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indexes of the path
    pub fn as_slice(&self) -> &[ChildIndex] {
        &self.0
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(path: Vec<ChildIndex>) -> Self {
        Self(path)
    }
}

impl<I: Into<ChildIndex>> FromIterator<I> for DerivationPath {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for DerivationPath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = match s.strip_prefix(['m', 'M']) {
            Some("") => return Ok(Self::root()),
            Some(rest) if rest.starts_with('/') => &rest[1..],
            _ if s.is_empty() => return Ok(Self::root()),
            // `m1` is reported as invalid first component
            _ => s,
        };

        s.split('/')
            .enumerate()
            .map(|(position, component)| {
                if component.is_empty() {
                    return Err(ParsePathError::EmptyComponent { position });
                }
                component
                    .parse::<ChildIndex>()
                    .map_err(|source| ParsePathError::InvalidIndex { position, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Formats the path as `m/44H/0H/0`
impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child_index in &self.0 {
            write!(f, "/{child_index}")?;
        }
        Ok(())
    }
}
