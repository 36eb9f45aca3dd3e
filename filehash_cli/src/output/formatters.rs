use super::OutputFormatter;
use anyhow::Result;
use colored::*;
use filehash_core::FileHash;
use serde_json::{Map, json};
use std::path::Path;

/// Text formatter, one `ALGORITHM: hex` line per digest
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_single(&self, _path: &Path, hash: &FileHash) -> Result<String> {
        let lines: Vec<String> = hash
            .iter()
            .map(|(algorithm, digest)| {
                let label = self.colorize(&algorithm.id().to_uppercase(), |s| s.yellow());
                let hex = self.colorize(digest.hex(), |s| s.cyan());
                format!("{label}: {hex}")
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_single(&self, path: &Path, hash: &FileHash) -> Result<String> {
        let hashes: Map<String, serde_json::Value> = hash
            .iter()
            .map(|(algorithm, digest)| (algorithm.id().to_string(), json!(digest.hex())))
            .collect();

        let value = json!({
            "path": path.to_string_lossy(),
            "bytes_processed": hash.bytes_processed(),
            "processing_time_ms": hash.duration().as_millis() as u64,
            "hashes": hashes,
        });

        if self.pretty {
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(serde_json::to_string(&value)?)
        }
    }
}
