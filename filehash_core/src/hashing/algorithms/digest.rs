//! Adapter for RustCrypto `Digest` implementations

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use ::digest::Digest;
use std::marker::PhantomData;

/// Any RustCrypto digest exposed as a registry entry
pub struct DigestAlgorithm<D> {
    algorithm: HashAlgorithm,
    display_name: &'static str,
    _digest: PhantomData<fn() -> D>,
}

impl<D> DigestAlgorithm<D>
where
    D: Digest + Send + 'static,
{
    pub fn new(algorithm: HashAlgorithm, display_name: &'static str) -> Self {
        Self {
            algorithm,
            display_name,
            _digest: PhantomData,
        }
    }
}

/// Streaming hasher over a `Digest` state
struct DigestStreamingHasher<D> {
    hasher: D,
}

impl<D> StreamingHasher for DigestStreamingHasher<D>
where
    D: Digest + Send,
{
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.hasher.finalize().to_vec()
    }
}

impl<D> HashAlgorithmImpl for DigestAlgorithm<D>
where
    D: Digest + Send + 'static,
{
    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn digest_size(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(DigestStreamingHasher { hasher: D::new() })
    }
}
