//! Parallel hash calculation strategy
//!
//! One scoped worker thread per accumulator. The calling thread keeps
//! reading and polling progress; each chunk is copied once into a shared,
//! tracked buffer and handed to every worker through a rendezvous channel,
//! so the reader is never more than one chunk ahead of the slowest worker
//! and every accumulator sees chunks in file order.

use super::{HashingStrategy, drive, panic_message};
use crate::buffer::{MemoryTracker, TrackedBuffer};
use crate::error::InternalError;
use crate::file_io::ChunkedReader;
use crate::hashing::accumulator::AccumulatorSet;
use crate::hashing::engine::RunState;
use crate::progress::ProgressProvider;
use crate::{Error, Result};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread;

/// Parallel strategy - one hashing thread per algorithm
#[derive(Debug, Clone)]
pub(crate) struct ParallelStrategy {
    tracker: MemoryTracker,
}

impl ParallelStrategy {
    pub(crate) fn new(tracker: MemoryTracker) -> Self {
        Self { tracker }
    }
}

impl HashingStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute(
        &self,
        reader: &mut ChunkedReader,
        accumulators: AccumulatorSet,
        progress: &mut dyn ProgressProvider,
        state: &mut RunState,
    ) -> Result<AccumulatorSet> {
        thread::scope(|scope| {
            let mut senders: Vec<(&'static str, Sender<Arc<TrackedBuffer>>)> = Vec::new();
            let mut workers = Vec::new();

            for accumulator in accumulators.into_inner() {
                let algorithm = accumulator.algorithm();
                let (tx, rx) = crossbeam_channel::bounded::<Arc<TrackedBuffer>>(0);

                let handle = thread::Builder::new()
                    .name(format!("filehash-{algorithm}"))
                    .spawn_scoped(scope, move || {
                        let mut accumulator = accumulator;
                        for chunk in rx {
                            accumulator.update(&chunk);
                        }
                        accumulator
                    })
                    .map_err(|e| InternalError::worker_failed(algorithm.id(), &e.to_string()))?;

                senders.push((algorithm.id(), tx));
                workers.push((algorithm.id(), handle));
            }
            log::trace!("Started {} hash workers", workers.len());

            let fed = drive(reader, progress, state, |chunk| {
                let mut shared = self.tracker.allocate(chunk.len())?;
                shared.copy_from_slice(chunk);
                let shared = Arc::new(shared);

                for (algorithm, tx) in &senders {
                    tx.send(Arc::clone(&shared)).map_err(|_| {
                        InternalError::worker_failed(algorithm, "worker stopped receiving chunks")
                    })?;
                }
                Ok(())
            });

            // Closing the channels lets every worker drain and exit
            drop(senders);

            let mut finished = Vec::with_capacity(workers.len());
            let mut failure: Option<Error> = None;
            for (algorithm, handle) in workers {
                match handle.join() {
                    Ok(accumulator) => finished.push(accumulator),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::warn!("Hash worker for {algorithm} panicked: {message}");
                        if failure.is_none() {
                            failure =
                                Some(InternalError::worker_failed(algorithm, &message).into());
                        }
                    }
                }
            }

            if let Some(error) = failure {
                return Err(error);
            }
            fed?;

            Ok(AccumulatorSet::from(finished))
        })
    }
}
