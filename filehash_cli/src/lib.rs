//! Building blocks of the `filehash` command line tool
//!
//! The binary in `main.rs` wires these together; they live in a library so
//! integration tests can exercise them directly.

pub mod config;
pub mod output;
pub mod progress;
pub mod terminal;
