mod formatters;

pub use formatters::{JsonFormatter, TextFormatter};

use anyhow::Result;
use filehash_core::FileHash;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the digests of one file
    fn format_single(&self, path: &Path, hash: &FileHash) -> Result<String>;
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
