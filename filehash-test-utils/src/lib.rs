//! Test utilities for filehash
//!
//! This crate provides file builders and scripted progress providers for
//! testing the hashing engine.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{TestFileBuilder, deterministic_bytes};
pub use mocks::{PanickingProvider, RecordingProvider, drain_reports};
