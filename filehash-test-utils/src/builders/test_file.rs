//! Builder for files used as hashing input

use filehash_core::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reproducible pseudo-random content
///
/// The same `(size, seed)` pair always yields the same bytes.
pub fn deterministic_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed ^ 0x9e37_79b9_7f4a_7c15;
    let mut content = Vec::with_capacity(size);

    for _ in 0..size {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        content.push((state >> 56) as u8);
    }

    content
}

/// Test file builder for creating input files
pub struct TestFileBuilder {
    base_dir: PathBuf,
    generated_files: Vec<PathBuf>,
    // Keeps the temporary directory alive for as long as the builder
    _temp_dir: Option<TempDir>,
}

impl TestFileBuilder {
    /// Builder writing into an existing directory
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            generated_files: Vec::new(),
            _temp_dir: None,
        }
    }

    /// Builder writing into a fresh temporary directory
    ///
    /// The directory and every generated file are removed when the builder
    /// is dropped.
    pub fn in_temp_dir() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        Ok(Self {
            base_dir: temp_dir.path().to_path_buf(),
            generated_files: Vec::new(),
            _temp_dir: Some(temp_dir),
        })
    }

    /// Directory files are written to
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Paths generated so far, in creation order
    pub fn generated_files(&self) -> &[PathBuf] {
        &self.generated_files
    }

    /// Write `content` verbatim
    pub fn write_file(&mut self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.base_dir.join(name);
        std::fs::write(&file_path, content)?;

        self.generated_files.push(file_path.clone());
        Ok(file_path)
    }

    /// Generate a file of `size` zero bytes
    pub fn generate_test_file(&mut self, name: &str, size: usize) -> Result<PathBuf> {
        self.write_file(name, &vec![0u8; size])
    }

    /// Generate a deterministic file with specific size and seed
    pub fn generate_deterministic_file(
        &mut self,
        name: &str,
        size: usize,
        seed: u64,
    ) -> Result<PathBuf> {
        self.write_file(name, &deterministic_bytes(size, seed))
    }

    /// Generate a file repeating `pattern` until `size` bytes are written
    pub fn generate_pattern_file(
        &mut self,
        name: &str,
        pattern: &[u8],
        size: usize,
    ) -> Result<PathBuf> {
        let content: Vec<u8> = pattern.iter().copied().cycle().take(size).collect();
        self.write_file(name, &content)
    }

    /// Path inside the base directory that is guaranteed not to exist
    pub fn missing_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.missing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_bytes_are_reproducible() {
        assert_eq!(deterministic_bytes(1000, 7), deterministic_bytes(1000, 7));
        assert_ne!(deterministic_bytes(1000, 7), deterministic_bytes(1000, 8));
        assert_eq!(deterministic_bytes(0, 7).len(), 0);
    }

    #[test]
    fn test_files_are_written_and_tracked() {
        let mut builder = TestFileBuilder::in_temp_dir().unwrap();

        let zeros = builder.generate_test_file("zeros.bin", 100).unwrap();
        let pattern = builder
            .generate_pattern_file("pattern.bin", b"abc", 7)
            .unwrap();

        assert_eq!(std::fs::read(&zeros).unwrap(), vec![0u8; 100]);
        assert_eq!(std::fs::read(&pattern).unwrap(), b"abcabca");
        assert_eq!(builder.generated_files(), &[zeros, pattern]);
        assert!(!builder.missing_path("nothing").exists());
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let builder = TestFileBuilder::in_temp_dir().unwrap();
        let dir = builder.base_dir().to_path_buf();
        assert!(dir.is_dir());

        drop(builder);
        assert!(!dir.exists());
    }
}
