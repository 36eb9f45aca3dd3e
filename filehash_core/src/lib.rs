//! Filehash Core Library
//!
//! Computes several digests of a file in a single streaming pass with
//! bounded memory, progress reporting and cooperative cancellation.
//!
//! ```no_run
//! use filehash_core::{AlgorithmSelection, HashAlgorithm, HashEngine};
//!
//! let engine = HashEngine::new();
//! let selection: AlgorithmSelection = [HashAlgorithm::Md5, HashAlgorithm::Sha256].into();
//!
//! if let Some(hash) = engine.compute("movie.mkv", &selection) {
//!     println!("{}", hash.hex(HashAlgorithm::Sha256).unwrap());
//! }
//! ```

pub mod buffer;
pub mod error;
pub mod file_io;
pub mod hashing;
pub mod progress;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use buffer::{
    BUFFERS_IN_FLIGHT, DEFAULT_CHUNK_SIZE, DEFAULT_MEMORY_LIMIT, MAX_CHUNK_SIZE, MemoryTracker,
};
pub use error::{Error, Result};
pub use file_io::ChunkedReader;
pub use hashing::{
    AlgorithmRegistry, AlgorithmSelection, FileHash, HashAlgorithm, HashAlgorithmImpl, HashDigest,
    HashEngine, StrategyHint, StreamingHasher,
};
pub use progress::{
    ChannelAdapter, DeadlineProvider, NullProvider, ProgressControl, ProgressProvider,
    ProgressReport,
};

/// Files at least this large may be hashed in parallel (8MB)
pub const DEFAULT_PARALLEL_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Hash engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Bytes read per chunk
    pub chunk_size: usize,
    /// Strategy override
    pub strategy: StrategyHint,
    /// Smallest file for which automatic selection goes parallel
    pub parallel_threshold: u64,
    /// Upper bound for chunk buffers held by an engine
    pub memory_limit: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: StrategyHint::Automatic,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl HashConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyHint) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the configuration before an engine is built from it
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(error::ValidationError::invalid_parameter(
                "chunk_size",
                &format!("must be between 1 and {MAX_CHUNK_SIZE} bytes"),
            )
            .into());
        }

        if self.memory_limit < self.chunk_size {
            return Err(error::ValidationError::invalid_parameter(
                "memory_limit",
                &format!(
                    "{} bytes cannot hold a single {} byte chunk",
                    self.memory_limit, self.chunk_size
                ),
            )
            .into());
        }

        let parallel_footprint = self.chunk_size.saturating_mul(BUFFERS_IN_FLIGHT);
        if self.strategy == StrategyHint::Parallel && self.memory_limit < parallel_footprint {
            return Err(error::ValidationError::invalid_parameter(
                "memory_limit",
                &format!(
                    "parallel hashing needs {parallel_footprint} bytes for {BUFFERS_IN_FLIGHT} \
                     chunks of {} bytes, limit is {}",
                    self.chunk_size, self.memory_limit
                ),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_default_config() {
        let config = HashConfig::default();
        assert_eq!(config.chunk_size, 512 * 1024);
        assert_eq!(config.strategy, StrategyHint::Automatic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_size_bounds() {
        assert!(HashConfig::default().with_chunk_size(1).validate().is_ok());
        assert!(
            HashConfig::default()
                .with_chunk_size(MAX_CHUNK_SIZE + 1)
                .validate()
                .is_err()
        );

        let error = HashConfig::default().with_chunk_size(0).validate().unwrap_err();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::InvalidParameter { ref parameter, .. }) if parameter == "chunk_size"
        ));
    }

    #[test]
    fn test_memory_limit_must_fit_a_chunk() {
        let config = HashConfig {
            chunk_size: 4096,
            memory_limit: 4095,
            ..HashConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("memory_limit"));
    }

    #[test]
    fn test_forced_parallel_must_fit_every_buffer() {
        let config = HashConfig {
            chunk_size: 4096,
            memory_limit: 4096,
            strategy: StrategyHint::Parallel,
            ..HashConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("memory_limit"));

        let fits = HashConfig {
            memory_limit: 3 * 4096,
            ..config.clone()
        };
        assert!(fits.validate().is_ok());

        // The same limit is fine when parallel hashing is only an option
        let sequential = config.clone().with_strategy(StrategyHint::Sequential);
        let automatic = config.with_strategy(StrategyHint::Automatic);
        assert!(sequential.validate().is_ok());
        assert!(automatic.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: HashConfig =
            serde_json::from_str(r#"{"chunk_size": 1024, "strategy": "parallel"}"#).unwrap();

        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.strategy, StrategyHint::Parallel);
        assert_eq!(config.memory_limit, DEFAULT_MEMORY_LIMIT);
    }
}
