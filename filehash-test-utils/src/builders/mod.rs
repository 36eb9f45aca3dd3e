//! Test data builders

mod test_file;

pub use test_file::{TestFileBuilder, deterministic_bytes};
