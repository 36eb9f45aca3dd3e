//! Common test utilities for integration tests

#![allow(dead_code)]

use filehash_core::{HashAlgorithm, HashConfig, HashEngine, StrategyHint};

/// Known digests of the empty input
pub const EMPTY_DIGESTS: [(HashAlgorithm, &str); 10] = [
    (HashAlgorithm::Md2, "8350e5a3e24c153df2275c9f80692773"),
    (HashAlgorithm::Md4, "31d6cfe0d16ae931b73c59d7e0c089c0"),
    (HashAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e"),
    (HashAlgorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
    (
        HashAlgorithm::Sha224,
        "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
    ),
    (
        HashAlgorithm::Sha256,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    ),
    (
        HashAlgorithm::Sha384,
        "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b",
    ),
    (
        HashAlgorithm::Sha512,
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
    ),
    (HashAlgorithm::Crc32, "00000000"),
    (HashAlgorithm::Adler32, "00000001"),
];

/// Engine with a fixed chunk size and strategy
pub fn engine(chunk_size: usize, strategy: StrategyHint) -> HashEngine {
    HashEngine::with_config(
        HashConfig::default()
            .with_chunk_size(chunk_size)
            .with_strategy(strategy),
    )
    .expect("test configuration is valid")
}
