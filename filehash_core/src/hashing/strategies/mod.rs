//! Hash calculation strategies
//!
//! Every strategy reads the file on the calling thread and polls the
//! progress provider there once per chunk; they differ only in where the
//! accumulators are updated:
//!
//! - `SequentialStrategy`: the calling thread feeds every accumulator
//! - `ParallelStrategy`: one worker thread per accumulator
//!
//! The selector picks a strategy from the configured [`StrategyHint`],
//! the number of algorithms and the file size.

use super::accumulator::AccumulatorSet;
use super::engine::RunState;
use crate::file_io::ChunkedReader;
use crate::progress::{ProgressProvider, ProgressReport};
use crate::{Error, Result};
use std::any::Any;

mod parallel;
mod selector;
mod sequential;

pub(crate) use parallel::ParallelStrategy;
pub(crate) use selector::StrategySelector;
pub use selector::StrategyHint;
pub(crate) use sequential::SequentialStrategy;

/// Core trait for hash calculation strategies
pub(crate) trait HashingStrategy: Send + Sync {
    /// Strategy identifier for logging
    fn name(&self) -> &'static str;

    /// Feed the whole reader through `accumulators`
    ///
    /// Returns the accumulators once the reader hits end of file. On error
    /// or cancellation the accumulators are dropped.
    fn execute(
        &self,
        reader: &mut ChunkedReader,
        accumulators: AccumulatorSet,
        progress: &mut dyn ProgressProvider,
        state: &mut RunState,
    ) -> Result<AccumulatorSet>;
}

/// Shared read loop
///
/// Reports `(total, 0)` before the first chunk and `(total, processed)`
/// after each chunk has been handed to `feed`. Termination is driven by
/// end of file only; the total is never used to stop reading.
pub(crate) fn drive<F>(
    reader: &mut ChunkedReader,
    progress: &mut dyn ProgressProvider,
    state: &mut RunState,
    mut feed: F,
) -> Result<u64>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    let total = reader.total_size();
    let mut processed = 0u64;

    if progress.report(ProgressReport::new(total, 0)).is_stop() {
        return Err(Error::cancelled(0, total));
    }

    while let Some(chunk) = reader.next_chunk()? {
        feed(chunk)?;
        processed += chunk.len() as u64;
        state.transition(RunState::Reading(processed));

        if progress
            .report(ProgressReport::new(total, processed))
            .is_stop()
        {
            return Err(Error::cancelled(processed, total));
        }
    }

    Ok(processed)
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
