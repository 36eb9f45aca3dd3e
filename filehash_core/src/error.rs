//! Error types for the filehash core library
//!
//! Errors are organized into categories: I/O failures while opening or
//! reading the target file, validation failures detected before any I/O,
//! internal failures, and cooperative cancellation.

use thiserror::Error;

pub mod internal;
pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the filehash core library
///
/// None of these conditions are fatal to the process. Every one of them
/// means "no digest was produced" and leaves no resources allocated.
#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be opened or read
    #[error(transparent)]
    Io(#[from] IoError),

    /// The request was rejected before any I/O happened
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Library internal errors
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// The progress callback asked the run to stop
    #[error("Hashing cancelled after {processed_bytes} of {total_bytes} bytes")]
    Cancelled {
        processed_bytes: u64,
        total_bytes: u64,
    },
}

impl Error {
    /// Create a cancellation error at the given progress point
    pub fn cancelled(processed_bytes: u64, total_bytes: u64) -> Self {
        Self::Cancelled {
            processed_bytes,
            total_bytes,
        }
    }

    /// Whether the run ended because the caller requested it
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Whether the target file could not be opened or read
    pub fn is_file_not_accessible(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashAlgorithm;
    use std::error::Error as StdError;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_file_not_found_error_creation() {
        let path = Path::new("/non/existent/file.bin");
        let error = Error::Io(IoError::file_not_found(path));

        assert!(error.is_file_not_accessible());
        assert!(!error.is_cancelled());
        match error {
            Error::Io(io_err) => {
                assert_eq!(io_err.kind, IoErrorKind::FileNotFound);
                assert_eq!(io_err.path, Some(path.to_path_buf()));
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_cancelled_error() {
        let error = Error::cancelled(1024, 4096);

        assert!(error.is_cancelled());
        assert!(!error.is_file_not_accessible());
        assert!(error.to_string().contains("1024"));
        assert!(error.to_string().contains("4096"));
    }

    #[test]
    fn test_empty_selection_error() {
        let error = Error::Validation(ValidationError::EmptySelection);

        assert!(matches!(
            error,
            Error::Validation(ValidationError::EmptySelection)
        ));
        assert!(error.to_string().contains("at least one"));
    }

    #[test]
    fn test_unsupported_algorithm_error() {
        let error = Error::Validation(ValidationError::unsupported_algorithm("whirlpool"));

        assert!(error.to_string().contains("Unsupported hash algorithm"));
        assert!(error.to_string().contains("whirlpool"));
    }

    #[test]
    fn test_not_computed_error() {
        let error = Error::Internal(InternalError::not_computed(HashAlgorithm::Sha512));

        assert!(matches!(
            error,
            Error::Internal(InternalError::NotComputed { .. })
        ));
        assert!(error.to_string().contains("sha512"));
    }

    #[test]
    fn test_memory_limit_exceeded_error() {
        let error = Error::Internal(InternalError::memory_limit_exceeded(1000, 1500));

        assert!(error.to_string().contains("Memory limit exceeded"));
        assert!(error.to_string().contains("1000"));
        assert!(error.to_string().contains("1500"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();

        match error {
            Error::Io(io_err) => {
                assert_eq!(io_err.kind, IoErrorKind::FileNotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let path = Path::new("/test/file.bin");
        let error = Error::Io(IoError::permission_denied(path, io_error));

        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Io(IoError::file_not_found(Path::new("test.bin"))),
            Error::Io(IoError::is_directory(Path::new("/tmp"))),
            Error::Validation(ValidationError::EmptySelection),
            Error::Validation(ValidationError::invalid_parameter(
                "chunk_size",
                "must be positive",
            )),
            Error::Internal(InternalError::worker_failed("md5", "panicked")),
            Error::cancelled(0, 0),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
