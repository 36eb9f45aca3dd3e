//! Hash algorithm implementations

use super::HashAlgorithm;
use super::registry::AlgorithmRegistry;

mod adler32;
mod crc32;
mod digest;

pub use adler32::Adler32Algorithm;
pub use crc32::Crc32Algorithm;
pub use digest::DigestAlgorithm;

/// Register all built-in algorithms with the registry
pub(crate) fn register_all(registry: &mut AlgorithmRegistry) {
    registry.register(DigestAlgorithm::<md2::Md2>::new(HashAlgorithm::Md2, "MD2"));
    registry.register(DigestAlgorithm::<md4::Md4>::new(HashAlgorithm::Md4, "MD4"));
    registry.register(DigestAlgorithm::<md5::Md5>::new(HashAlgorithm::Md5, "MD5"));
    registry.register(DigestAlgorithm::<sha1::Sha1>::new(HashAlgorithm::Sha1, "SHA1"));
    registry.register(DigestAlgorithm::<sha2::Sha224>::new(
        HashAlgorithm::Sha224,
        "SHA224",
    ));
    registry.register(DigestAlgorithm::<sha2::Sha256>::new(
        HashAlgorithm::Sha256,
        "SHA256",
    ));
    registry.register(DigestAlgorithm::<sha2::Sha384>::new(
        HashAlgorithm::Sha384,
        "SHA384",
    ));
    registry.register(DigestAlgorithm::<sha2::Sha512>::new(
        HashAlgorithm::Sha512,
        "SHA512",
    ));
    registry.register(Crc32Algorithm);
    registry.register(Adler32Algorithm);
}
