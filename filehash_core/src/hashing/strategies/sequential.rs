//! Sequential hash calculation strategy
//!
//! Reads a chunk, then feeds it to every accumulator on the calling
//! thread. Needs exactly one chunk buffer.

use super::{HashingStrategy, drive};
use crate::Result;
use crate::file_io::ChunkedReader;
use crate::hashing::accumulator::AccumulatorSet;
use crate::hashing::engine::RunState;
use crate::progress::ProgressProvider;

/// Sequential strategy - single-threaded processing
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SequentialStrategy;

impl HashingStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(
        &self,
        reader: &mut ChunkedReader,
        mut accumulators: AccumulatorSet,
        progress: &mut dyn ProgressProvider,
        state: &mut RunState,
    ) -> Result<AccumulatorSet> {
        drive(reader, progress, state, |chunk| {
            accumulators.update(chunk);
            Ok(())
        })?;

        Ok(accumulators)
    }
}
