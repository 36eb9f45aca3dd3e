//! Chunk buffer allocation with memory tracking
//!
//! Every chunk buffer a reader holds is accounted against a
//! [`MemoryTracker`]. Buffers are handed out as [`TrackedBuffer`] guards so
//! the accounting is undone on every exit path, including early returns
//! and cancellation. Runs sharing an engine are admitted against a
//! [`RunBudget`] first, so they queue for memory instead of failing.

use crate::{
    Error, Result,
    error::{InternalError, ValidationError},
};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Default chunk size for file reads (512KB)
pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;

/// Largest chunk a single read may use (1GB)
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024 * 1024;

/// Default memory limit (500MB)
pub const DEFAULT_MEMORY_LIMIT: usize = 500 * 1024 * 1024;

/// Chunk buffers a parallel run holds at once: the reader's plus two shared copies
pub const BUFFERS_IN_FLIGHT: usize = 3;

/// Memory tracker for managing memory allocation limits
///
/// Clones share the same counters, so one tracker can bound the combined
/// footprint of concurrent runs.
#[derive(Debug, Clone)]
pub struct MemoryTracker {
    /// Current memory usage
    memory_used: Arc<AtomicUsize>,
    /// Highest usage observed
    peak_used: Arc<AtomicUsize>,
    /// Memory limit
    memory_limit: usize,
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LIMIT)
    }
}

impl MemoryTracker {
    /// Create a new memory tracker with the specified limit
    pub fn new(limit: usize) -> Self {
        Self {
            memory_used: Arc::new(AtomicUsize::new(0)),
            peak_used: Arc::new(AtomicUsize::new(0)),
            memory_limit: limit,
        }
    }

    /// Get the current memory limit
    pub fn limit(&self) -> usize {
        self.memory_limit
    }

    /// Get current memory usage
    pub fn used(&self) -> usize {
        self.memory_used.load(Ordering::Acquire)
    }

    /// Get the highest memory usage seen so far
    pub fn peak(&self) -> usize {
        self.peak_used.load(Ordering::Acquire)
    }

    /// Allocate a zeroed buffer with memory tracking
    pub fn allocate(&self, size: usize) -> Result<TrackedBuffer> {
        if size > MAX_CHUNK_SIZE {
            return Err(Error::Validation(ValidationError::invalid_parameter(
                "chunk_size",
                &format!(
                    "{} MB in a single buffer exceeds the {} MB maximum",
                    size / 1024 / 1024,
                    MAX_CHUNK_SIZE / 1024 / 1024
                ),
            )));
        }

        let mut old_value = self.memory_used.load(Ordering::Relaxed);
        loop {
            let new_value = old_value.saturating_add(size);
            if new_value > self.memory_limit {
                return Err(Error::Internal(InternalError::memory_limit_exceeded(
                    self.memory_limit,
                    new_value,
                )));
            }

            match self.memory_used.compare_exchange_weak(
                old_value,
                new_value,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak_used.fetch_max(new_value, Ordering::AcqRel);
                    break;
                }
                Err(actual) => old_value = actual,
            }
        }

        Ok(TrackedBuffer {
            data: vec![0u8; size],
            accounted: size,
            tracker: self.clone(),
        })
    }

    fn release(&self, size: usize) {
        // fetch_update never fails with a closure that always returns Some
        let _ = self
            .memory_used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_sub(size))
            });
    }
}

/// A buffer whose size is accounted against a [`MemoryTracker`] until dropped
#[derive(Debug)]
pub struct TrackedBuffer {
    data: Vec<u8>,
    accounted: usize,
    tracker: MemoryTracker,
}

impl Deref for TrackedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for TrackedBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.tracker.release(self.accounted);
    }
}

/// Memory budget shared by every run of one engine and its clones
///
/// A run is admitted once its buffers fit next to those of the runs
/// already in flight. Admission blocks; growing an admitted run never
/// does, so runs cannot wait on each other while holding memory.
#[derive(Debug, Clone)]
pub(crate) struct RunBudget {
    inner: Arc<BudgetState>,
}

#[derive(Debug)]
struct BudgetState {
    limit: usize,
    reserved: Mutex<usize>,
    released: Condvar,
}

impl RunBudget {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(BudgetState {
                limit,
                reserved: Mutex::new(0),
                released: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.inner
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Bytes currently reserved by admitted runs
    pub(crate) fn reserved(&self) -> usize {
        *self.lock()
    }

    /// Wait until `size` bytes fit, then reserve them
    ///
    /// Fails immediately when `size` alone exceeds the limit.
    pub(crate) fn admit(&self, size: usize) -> Result<Admission> {
        if size > self.inner.limit {
            return Err(Error::Internal(InternalError::memory_limit_exceeded(
                self.inner.limit,
                size,
            )));
        }

        let mut reserved = self.lock();
        if reserved.saturating_add(size) > self.inner.limit {
            log::debug!(
                "Waiting for {size} bytes, {} of {} reserved by other runs",
                *reserved,
                self.inner.limit
            );
        }
        while reserved.saturating_add(size) > self.inner.limit {
            reserved = self
                .inner
                .released
                .wait(reserved)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *reserved += size;

        Ok(Admission {
            budget: self.clone(),
            size,
        })
    }
}

/// Reservation held by one admitted run, returned to the budget on drop
#[derive(Debug)]
pub(crate) struct Admission {
    budget: RunBudget,
    size: usize,
}

impl Admission {
    /// Reserve `extra` more bytes without waiting
    ///
    /// Returns `false` and leaves the reservation unchanged when the bytes
    /// are held by other runs.
    pub(crate) fn try_grow(&mut self, extra: usize) -> bool {
        let mut reserved = self.budget.lock();
        let wanted = reserved.saturating_add(extra);
        if wanted > self.budget.inner.limit {
            return false;
        }
        *reserved = wanted;
        self.size += extra;
        true
    }
}

impl Drop for Admission {
    fn drop(&mut self) {
        let mut reserved = self.budget.lock();
        *reserved = reserved.saturating_sub(self.size);
        self.budget.inner.released.notify_all();
    }
}
