//! Immutable result of a completed run

use super::HashAlgorithm;
use crate::{Result, error::InternalError};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Digest of one algorithm: raw bytes plus lowercase hex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDigest {
    bytes: Vec<u8>,
    hex: String,
}

impl HashDigest {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        // Rendered byte by byte, so the host byte order never leaks in
        let hex = hex::encode(&bytes);
        Self { bytes, hex }
    }

    /// Raw digest bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex, two characters per byte
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl std::fmt::Display for HashDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}

impl Serialize for HashDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

/// Snapshot of every digest computed for one file
///
/// Created exactly once, when a run reaches end of file. It covers every
/// algorithm of the selection and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHash {
    #[serde(rename = "hashes")]
    digests: BTreeMap<HashAlgorithm, HashDigest>,
    bytes_processed: u64,
    duration: Duration,
}

impl FileHash {
    pub(crate) fn new(
        digests: BTreeMap<HashAlgorithm, HashDigest>,
        bytes_processed: u64,
        duration: Duration,
    ) -> Self {
        Self {
            digests,
            bytes_processed,
            duration,
        }
    }

    /// Digest for `algorithm`, failing when it was not selected
    pub fn digest(&self, algorithm: HashAlgorithm) -> Result<&HashDigest> {
        self.digests
            .get(&algorithm)
            .ok_or_else(|| InternalError::not_computed(algorithm).into())
    }

    /// Digest for `algorithm`, if it was selected
    pub fn get(&self, algorithm: HashAlgorithm) -> Option<&HashDigest> {
        self.digests.get(&algorithm)
    }

    /// Lowercase hex digest for `algorithm`
    pub fn hex(&self, algorithm: HashAlgorithm) -> Result<&str> {
        self.digest(algorithm).map(HashDigest::hex)
    }

    /// Raw digest bytes for `algorithm`
    pub fn bytes(&self, algorithm: HashAlgorithm) -> Result<&[u8]> {
        self.digest(algorithm).map(HashDigest::bytes)
    }

    /// CRC32 checksum as an integer, if it was selected
    pub fn crc32(&self) -> Option<u32> {
        self.checksum(HashAlgorithm::Crc32)
    }

    /// Adler-32 checksum as an integer, if it was selected
    pub fn adler32(&self) -> Option<u32> {
        self.checksum(HashAlgorithm::Adler32)
    }

    fn checksum(&self, algorithm: HashAlgorithm) -> Option<u32> {
        let bytes: [u8; 4] = self.get(algorithm)?.bytes().try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }

    /// Algorithms covered, in canonical order
    pub fn algorithms(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.digests.keys().copied()
    }

    /// Digests in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (HashAlgorithm, &HashDigest)> + '_ {
        self.digests.iter().map(|(algorithm, digest)| (*algorithm, digest))
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Bytes fed to every accumulator
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Wall time of the run
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Throughput in MB/s
    pub fn throughput_mbps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes_processed as f64 / (1024.0 * 1024.0) / secs
    }
}
