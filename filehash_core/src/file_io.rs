//! Chunked file reading
//!
//! [`ChunkedReader`] opens a file and hands out its contents as a lazy,
//! forward-only sequence of fixed-size chunks backed by a single reusable
//! buffer. Peak memory is one chunk, independent of the file size. The file
//! handle and the buffer are released when the reader is dropped.

use crate::buffer::{MemoryTracker, TrackedBuffer};
use crate::{
    Error, Result,
    error::{IoError, ValidationError},
};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Lazy chunk sequence over a file
pub struct ChunkedReader {
    path: PathBuf,
    source: Box<dyn Read>,
    buffer: TrackedBuffer,
    total_size: u64,
    bytes_read: u64,
    finished: bool,
}

impl std::fmt::Debug for ChunkedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedReader")
            .field("path", &self.path)
            .field("chunk_size", &self.buffer.len())
            .field("total_size", &self.total_size)
            .field("bytes_read", &self.bytes_read)
            .field("finished", &self.finished)
            .finish()
    }
}

impl ChunkedReader {
    /// Open `path` for chunked reading
    ///
    /// Fails with an I/O error when the path is missing, unreadable, or a
    /// directory. The total size is taken from the file metadata at open
    /// time and is advisory only.
    pub fn open(path: &Path, chunk_size: usize, tracker: &MemoryTracker) -> Result<Self> {
        validate_chunk_size(chunk_size)?;

        let file = File::open(path).map_err(|e| IoError::from_std(e).with_path(path))?;
        let metadata = file
            .metadata()
            .map_err(|e| IoError::from_std(e).with_path(path))?;

        if metadata.is_dir() {
            return Err(Error::Io(IoError::is_directory(path)));
        }

        let buffer = tracker.allocate(chunk_size)?;
        log::trace!(
            "Opened {} ({} bytes) with {} byte chunks",
            path.display(),
            metadata.len(),
            chunk_size
        );

        Ok(Self {
            path: path.to_path_buf(),
            source: Box::new(file),
            buffer,
            total_size: metadata.len(),
            bytes_read: 0,
            finished: false,
        })
    }

    /// Build a reader over an arbitrary byte source
    ///
    /// `label` is only used in error messages.
    pub fn from_reader(
        source: Box<dyn Read>,
        total_size: u64,
        label: &Path,
        chunk_size: usize,
        tracker: &MemoryTracker,
    ) -> Result<Self> {
        validate_chunk_size(chunk_size)?;
        let buffer = tracker.allocate(chunk_size)?;

        Ok(Self {
            path: label.to_path_buf(),
            source,
            buffer,
            total_size,
            bytes_read: 0,
            finished: false,
        })
    }

    /// Size reported when the reader was opened
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes handed out so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Path being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next chunk
    ///
    /// Every chunk except the last is exactly `chunk_size` bytes. Returns
    /// `Ok(None)` once the source is exhausted; the sequence cannot be
    /// restarted. The returned slice is only valid until the next call.
    pub fn next_chunk(&mut self) -> Result<Option<&[u8]>> {
        if self.finished {
            return Ok(None);
        }

        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.source.read(&mut self.buffer[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(Error::Io(IoError::from_std(e).with_path(&self.path)));
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        self.bytes_read += filled as u64;
        Ok(Some(&self.buffer[..filled]))
    }
}

fn validate_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::Validation(ValidationError::invalid_parameter(
            "chunk_size",
            "must be at least one byte",
        )));
    }
    Ok(())
}
