//! CRC32 checksum implementation

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crc32fast::Hasher as Crc32Hasher;

pub struct Crc32Algorithm;

/// CRC32 streaming hasher
struct Crc32StreamingHasher {
    hasher: Crc32Hasher,
}

impl StreamingHasher for Crc32StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        // Big-endian so the hex rendering reads like the usual checksum
        self.hasher.finalize().to_be_bytes().to_vec()
    }
}

impl HashAlgorithmImpl for Crc32Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Crc32
    }

    fn display_name(&self) -> &'static str {
        "CRC32"
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Crc32StreamingHasher {
            hasher: Crc32Hasher::new(),
        })
    }
}
