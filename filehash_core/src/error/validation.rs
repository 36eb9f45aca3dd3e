//! Validation related error types
//!
//! Everything in here is detected before the target file is opened.

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The algorithm has no registry entry, or its name is unknown
    #[error("Unsupported hash algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    /// No algorithm was requested
    #[error("Algorithm selection is empty: at least one hash algorithm must be requested")]
    EmptySelection,

    /// Invalid input parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },
}

impl ValidationError {
    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(name: &str) -> Self {
        Self::UnsupportedAlgorithm {
            name: name.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }
}
