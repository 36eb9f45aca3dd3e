//! Sets of requested algorithms

use super::HashAlgorithm;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of algorithms requested for one run
///
/// Duplicates collapse and iteration is always in canonical order, so the
/// insertion order never changes a result. An empty selection can be built
/// but is rejected by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmSelection {
    algorithms: BTreeSet<HashAlgorithm>,
}

impl AlgorithmSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection containing every known algorithm
    pub fn all() -> Self {
        HashAlgorithm::ALL.into_iter().collect()
    }

    /// Add an algorithm; returns false when it was already selected
    pub fn insert(&mut self, algorithm: HashAlgorithm) -> bool {
        self.algorithms.insert(algorithm)
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, algorithm: HashAlgorithm) -> Self {
        self.insert(algorithm);
        self
    }

    pub fn contains(&self, algorithm: HashAlgorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.algorithms.iter().copied()
    }
}

impl From<HashAlgorithm> for AlgorithmSelection {
    fn from(algorithm: HashAlgorithm) -> Self {
        Self::new().with(algorithm)
    }
}

impl<const N: usize> From<[HashAlgorithm; N]> for AlgorithmSelection {
    fn from(algorithms: [HashAlgorithm; N]) -> Self {
        algorithms.into_iter().collect()
    }
}

impl FromIterator<HashAlgorithm> for AlgorithmSelection {
    fn from_iter<I: IntoIterator<Item = HashAlgorithm>>(iter: I) -> Self {
        Self {
            algorithms: iter.into_iter().collect(),
        }
    }
}

impl Extend<HashAlgorithm> for AlgorithmSelection {
    fn extend<I: IntoIterator<Item = HashAlgorithm>>(&mut self, iter: I) {
        self.algorithms.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AlgorithmSelection {
    type Item = HashAlgorithm;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, HashAlgorithm>>;

    fn into_iter(self) -> Self::IntoIter {
        self.algorithms.iter().copied()
    }
}

impl std::fmt::Display for AlgorithmSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, algorithm) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{algorithm}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for AlgorithmSelection {
    type Err = Error;

    /// Parse a comma separated list such as `"md5,sha256"`
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<HashAlgorithm>)
            .collect()
    }
}
