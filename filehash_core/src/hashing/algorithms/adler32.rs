//! Adler-32 checksum implementation (RFC 1950)

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};

/// Largest prime smaller than 2^16
const MOD_ADLER: u32 = 65521;

/// Most bytes that can be summed before `b` may overflow a u32
const NMAX: usize = 5552;

pub struct Adler32Algorithm;

/// Adler-32 running state
#[derive(Debug, Clone, Copy)]
struct Adler32StreamingHasher {
    a: u32,
    b: u32,
}

impl Default for Adler32StreamingHasher {
    fn default() -> Self {
        Self { a: 1, b: 0 }
    }
}

impl Adler32StreamingHasher {
    fn checksum(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

impl StreamingHasher for Adler32StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        for block in data.chunks(NMAX) {
            for &byte in block {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.checksum().to_be_bytes().to_vec()
    }
}

impl HashAlgorithmImpl for Adler32Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Adler32
    }

    fn display_name(&self) -> &'static str {
        "Adler32"
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Adler32StreamingHasher::default())
    }
}
