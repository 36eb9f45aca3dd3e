//! Core traits for the hash algorithm extensibility system

use super::HashAlgorithm;

/// Core trait that all hash algorithms must implement
///
/// Implementations are stateless descriptors; all mutable state lives in
/// the [`StreamingHasher`] they create.
pub trait HashAlgorithmImpl: Send + Sync {
    /// Algorithm this implementation provides
    fn algorithm(&self) -> HashAlgorithm;

    /// Unique identifier for this algorithm
    fn id(&self) -> &'static str {
        self.algorithm().id()
    }

    /// Display name for user interfaces
    fn display_name(&self) -> &'static str;

    /// Digest length in bytes, known without processing any data
    fn digest_size(&self) -> usize;

    /// Create a new streaming hasher instance
    fn create_hasher(&self) -> Box<dyn StreamingHasher>;

    /// Calculate the digest of in-memory data
    fn hash_bytes(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.create_hasher();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Trait for streaming hash calculation
pub trait StreamingHasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash calculation and return the raw digest
    fn finalize(self: Box<Self>) -> Vec<u8>;
}
