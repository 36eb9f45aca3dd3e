//! Hash calculation for the filehash core library
//!
//! Algorithms are pluggable through the [`AlgorithmRegistry`]; a run feeds
//! every chunk of a file to one accumulator per requested algorithm and
//! produces a single [`FileHash`] snapshot.

use crate::{Error, Result, error::ValidationError};
use serde::{Deserialize, Serialize};

mod accumulator;
mod algorithms;
mod engine;
mod registry;
mod selection;
mod snapshot;
mod strategies;
mod traits;

pub use algorithms::{Adler32Algorithm, Crc32Algorithm, DigestAlgorithm};
pub use engine::HashEngine;
pub use registry::AlgorithmRegistry;
pub use selection::AlgorithmSelection;
pub use snapshot::{FileHash, HashDigest};
pub use strategies::StrategyHint;
pub use traits::{HashAlgorithmImpl, StreamingHasher};

/// Hash algorithms known to the library
///
/// The declaration order is the canonical ordering used for selections,
/// snapshots and registry listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md2,
    Md4,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Crc32,
    Adler32,
}

impl HashAlgorithm {
    /// Every algorithm in canonical order
    pub const ALL: [HashAlgorithm; 10] = [
        HashAlgorithm::Md2,
        HashAlgorithm::Md4,
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Crc32,
        HashAlgorithm::Adler32,
    ];

    /// Stable lowercase identifier
    pub fn id(self) -> &'static str {
        match self {
            HashAlgorithm::Md2 => "md2",
            HashAlgorithm::Md4 => "md4",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Adler32 => "adler32",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == normalized)
            .ok_or_else(|| Error::Validation(ValidationError::unsupported_algorithm(s)))
    }
}
