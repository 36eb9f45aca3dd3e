//! Internal library error types

use crate::HashAlgorithm;
use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug)]
pub enum InternalError {
    /// A digest was requested for an algorithm that was not part of the run
    #[error("No digest computed for algorithm '{algorithm}': it was not part of the selection")]
    NotComputed { algorithm: HashAlgorithm },

    /// Memory limit exceeded
    #[error(
        "Memory limit exceeded: current usage {current} bytes would exceed limit of {limit} bytes"
    )]
    MemoryLimitExceeded { limit: usize, current: usize },

    /// A hashing worker thread failed
    #[error("Hash worker for '{algorithm}' failed: {message}")]
    WorkerFailed { algorithm: String, message: String },
}

impl InternalError {
    /// Create a not computed error
    pub fn not_computed(algorithm: HashAlgorithm) -> Self {
        Self::NotComputed { algorithm }
    }

    /// Create a memory limit exceeded error
    pub fn memory_limit_exceeded(limit: usize, current: usize) -> Self {
        Self::MemoryLimitExceeded { limit, current }
    }

    /// Create a worker failure error
    pub fn worker_failed(algorithm: &str, message: &str) -> Self {
        Self::WorkerFailed {
            algorithm: algorithm.to_string(),
            message: message.to_string(),
        }
    }
}
