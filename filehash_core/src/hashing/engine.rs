//! Hash engine driving a single-pass, multi-algorithm run
//!
//! A run resolves the selection through the registry, opens a
//! [`ChunkedReader`], feeds every chunk to one accumulator per algorithm and
//! finalizes them into a [`FileHash`]. Every entry point blocks the calling
//! thread until the run finishes, fails, or is cancelled by the progress
//! provider.

use super::accumulator::AccumulatorSet;
use super::registry::AlgorithmRegistry;
use super::strategies::{StrategySelector, panic_message};
use super::traits::HashAlgorithmImpl;
use super::{AlgorithmSelection, FileHash};
use crate::buffer::{Admission, MemoryTracker, RunBudget};
use crate::file_io::ChunkedReader;
use crate::progress::{NullProvider, ProgressControl, ProgressProvider, ProgressReport};
use crate::{Error, HashConfig, Result, error::ValidationError};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of a single run
///
/// `Idle -> Opened -> Reading(n) -> Finalizing -> Done`, with `Cancelled`
/// and `Failed` as the other terminal states. Runs are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Idle,
    Opened,
    Reading(u64),
    Finalizing,
    Done,
    Cancelled,
    Failed,
}

impl RunState {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }

    fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;

        if self.is_terminal() {
            return false;
        }

        match (self, next) {
            (Idle, Opened | Failed) => true,
            (Opened, Reading(_) | Finalizing | Cancelled | Failed) => true,
            (Reading(before), Reading(after)) => after >= before,
            (Reading(_), Finalizing | Cancelled | Failed) => true,
            (Finalizing, Done | Failed) => true,
            _ => false,
        }
    }

    pub(crate) fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.can_transition_to(next),
            "invalid run state transition {self:?} -> {next:?}"
        );
        log::trace!("Run state {self:?} -> {next:?}");
        *self = next;
    }
}

/// Keeps a misbehaving progress provider from unwinding through the engine
///
/// A panic is logged and turned into [`ProgressControl::Stop`]; the
/// provider is not called again afterwards.
struct GuardedProgress<'a> {
    inner: &'a mut dyn ProgressProvider,
    panicked: bool,
}

impl<'a> GuardedProgress<'a> {
    fn new(inner: &'a mut dyn ProgressProvider) -> Self {
        Self {
            inner,
            panicked: false,
        }
    }
}

impl ProgressProvider for GuardedProgress<'_> {
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        if self.panicked {
            return ProgressControl::Stop;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.report(report))) {
            Ok(control) => control,
            Err(payload) => {
                log::warn!(
                    "Progress callback panicked at {} of {} bytes, cancelling: {}",
                    report.processed_bytes,
                    report.total_bytes,
                    panic_message(payload.as_ref())
                );
                self.panicked = true;
                ProgressControl::Stop
            }
        }
    }
}

/// Blocking multi-algorithm file hasher
///
/// Engines are cheap to clone and hold no per-run state, so one engine can
/// serve concurrent runs from several threads. Clones share the memory
/// budget: a run that does not fit next to the runs in flight waits for
/// them to release their buffers instead of failing.
#[derive(Clone)]
pub struct HashEngine {
    registry: Arc<AlgorithmRegistry>,
    config: HashConfig,
    selector: StrategySelector,
    memory_tracker: MemoryTracker,
    budget: RunBudget,
}

impl std::fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("memory_limit", &self.memory_tracker.limit())
            .field("memory_used", &self.memory_tracker.used())
            .field("memory_reserved", &self.budget.reserved())
            .finish()
    }
}

impl Default for HashEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HashEngine {
    /// Engine with the default configuration and every bundled algorithm
    pub fn new() -> Self {
        Self::from_valid_config(HashConfig::default())
    }

    /// Engine with a custom configuration
    ///
    /// Fails with `InvalidParameter` when the configuration is invalid.
    pub fn with_config(config: HashConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: HashConfig) -> Self {
        Self {
            registry: Arc::new(AlgorithmRegistry::global().clone()),
            selector: StrategySelector::from_config(&config),
            memory_tracker: MemoryTracker::new(config.memory_limit),
            budget: RunBudget::new(config.memory_limit),
            config,
        }
    }

    /// Replace the algorithm registry
    pub fn with_registry(mut self, registry: Arc<AlgorithmRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Account buffers against a tracker shared with other engines
    ///
    /// Only runs of this engine and its clones queue for memory; buffers
    /// held by other users of the tracker make a run fail instead.
    pub fn with_memory_tracker(mut self, memory_tracker: MemoryTracker) -> Self {
        self.memory_tracker = memory_tracker;
        self
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn memory_tracker(&self) -> &MemoryTracker {
        &self.memory_tracker
    }

    /// Hash `path` with every algorithm in `selection`
    ///
    /// Returns `None` when no result was produced; the reason is logged.
    /// Use [`try_compute`](Self::try_compute) to inspect it.
    pub fn compute(
        &self,
        path: impl AsRef<Path>,
        selection: &AlgorithmSelection,
    ) -> Option<FileHash> {
        self.compute_with_progress(path, selection, &mut NullProvider)
    }

    /// Hash `path`, reporting progress after every chunk
    ///
    /// Returning [`ProgressControl::Stop`] from the provider abandons the
    /// run and yields `None`.
    pub fn compute_with_progress(
        &self,
        path: impl AsRef<Path>,
        selection: &AlgorithmSelection,
        progress: &mut dyn ProgressProvider,
    ) -> Option<FileHash> {
        let path = path.as_ref();
        match self.try_compute_with_progress(path, selection, progress) {
            Ok(hash) => Some(hash),
            Err(e) if e.is_cancelled() => {
                log::debug!("Hashing {} stopped: {e}", path.display());
                None
            }
            Err(e) => {
                log::warn!("Hashing {} failed: {e}", path.display());
                None
            }
        }
    }

    /// Like [`compute`](Self::compute), but reports why no result was produced
    pub fn try_compute(
        &self,
        path: impl AsRef<Path>,
        selection: &AlgorithmSelection,
    ) -> Result<FileHash> {
        self.try_compute_with_progress(path, selection, &mut NullProvider)
    }

    /// Like [`compute_with_progress`](Self::compute_with_progress), but
    /// reports why no result was produced
    pub fn try_compute_with_progress(
        &self,
        path: impl AsRef<Path>,
        selection: &AlgorithmSelection,
        progress: &mut dyn ProgressProvider,
    ) -> Result<FileHash> {
        let path = path.as_ref();
        let mut state = RunState::Idle;

        let opened = self.resolve(selection).and_then(|implementations| {
            let admission = self.budget.admit(self.config.chunk_size)?;
            let reader =
                ChunkedReader::open(path, self.config.chunk_size, &self.memory_tracker)?;
            Ok((implementations, admission, reader))
        });
        let (implementations, mut admission, reader) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                state.transition(RunState::Failed);
                return Err(e);
            }
        };
        state.transition(RunState::Opened);

        log::debug!(
            "Hashing {} ({} bytes) with [{selection}]",
            path.display(),
            reader.total_size()
        );
        self.run(reader, &implementations, &mut admission, progress, &mut state)
    }

    /// Resolve every requested algorithm before touching the file
    fn resolve(&self, selection: &AlgorithmSelection) -> Result<Vec<Arc<dyn HashAlgorithmImpl>>> {
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        selection
            .iter()
            .map(|algorithm| self.registry.resolve(algorithm))
            .collect()
    }

    /// Drive an opened reader to completion
    ///
    /// `admission` must already cover the reader's buffer. The reader is
    /// consumed and released before this returns, whatever the outcome.
    pub(crate) fn run(
        &self,
        mut reader: ChunkedReader,
        implementations: &[Arc<dyn HashAlgorithmImpl>],
        admission: &mut Admission,
        progress: &mut dyn ProgressProvider,
        state: &mut RunState,
    ) -> Result<FileHash> {
        let start = Instant::now();
        let accumulators = AccumulatorSet::new(implementations);
        let strategy = self.selector.select(
            accumulators.len(),
            reader.total_size(),
            &self.memory_tracker,
            admission,
        );
        log::trace!(
            "Using {} strategy for {}",
            strategy.name(),
            reader.path().display()
        );

        let mut guarded = GuardedProgress::new(progress);
        let outcome = strategy.execute(&mut reader, accumulators, &mut guarded, state);
        let bytes_processed = reader.bytes_read();
        drop(reader);

        let accumulators = match outcome {
            Ok(accumulators) => accumulators,
            Err(e) => {
                state.transition(if e.is_cancelled() {
                    RunState::Cancelled
                } else {
                    RunState::Failed
                });
                return Err(e);
            }
        };

        state.transition(RunState::Finalizing);
        debug_assert_eq!(accumulators.bytes_fed(), bytes_processed);
        let hash = FileHash::new(accumulators.finalize(), bytes_processed, start.elapsed());
        state.transition(RunState::Done);

        log::debug!(
            "Hashed {bytes_processed} bytes in {:?} ({:.2} MB/s)",
            hash.duration(),
            hash.throughput_mbps()
        );
        Ok(hash)
    }
}
