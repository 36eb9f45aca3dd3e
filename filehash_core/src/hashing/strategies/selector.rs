//! Strategy selection logic
//!
//! Parallel hashing only pays off when several algorithms share a large
//! file and there are cores to run them on; everything else is hashed
//! sequentially. A parallel run also needs room for the shared chunk
//! copies; when concurrent runs hold that memory it falls back to
//! sequential hashing, which gives the same digests.

use super::{HashingStrategy, ParallelStrategy, SequentialStrategy};
use crate::buffer::{Admission, BUFFERS_IN_FLIGHT, MemoryTracker};
use crate::{Error, HashConfig, Result, error::ValidationError};
use serde::{Deserialize, Serialize};
use std::thread;

/// Hints that can be provided to influence strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyHint {
    /// Let the selector decide
    #[default]
    Automatic,
    /// Always hash on the calling thread
    Sequential,
    /// Use one worker thread per algorithm whenever the memory budget
    /// is not taken by concurrent runs
    Parallel,
}

impl std::fmt::Display for StrategyHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyHint::Automatic => write!(f, "automatic"),
            StrategyHint::Sequential => write!(f, "sequential"),
            StrategyHint::Parallel => write!(f, "parallel"),
        }
    }
}

impl std::str::FromStr for StrategyHint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "automatic" | "auto" => Ok(StrategyHint::Automatic),
            "sequential" => Ok(StrategyHint::Sequential),
            "parallel" => Ok(StrategyHint::Parallel),
            _ => Err(Error::Validation(ValidationError::invalid_parameter(
                "strategy",
                &format!("unknown strategy '{s}', expected automatic, sequential or parallel"),
            ))),
        }
    }
}

/// Selector for choosing the hashing strategy of a run
#[derive(Debug, Clone)]
pub(crate) struct StrategySelector {
    hint: StrategyHint,
    parallel_threshold: u64,
    chunk_size: usize,
    memory_limit: usize,
}

impl StrategySelector {
    pub(crate) fn from_config(config: &HashConfig) -> Self {
        Self {
            hint: config.strategy,
            parallel_threshold: config.parallel_threshold,
            chunk_size: config.chunk_size,
            memory_limit: config.memory_limit,
        }
    }

    /// Select the strategy for a run
    ///
    /// `admission` covers the reader's buffer; it is grown by the shared
    /// copies when the parallel strategy is chosen.
    pub(crate) fn select(
        &self,
        algorithms: usize,
        file_size: u64,
        tracker: &MemoryTracker,
        admission: &mut Admission,
    ) -> Box<dyn HashingStrategy> {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());

        if self.prefers_parallel(algorithms, file_size, cores) {
            let copies = self.chunk_size.saturating_mul(BUFFERS_IN_FLIGHT - 1);
            if admission.try_grow(copies) {
                return Box::new(ParallelStrategy::new(tracker.clone()));
            }
            log::debug!("Memory budget held by concurrent runs, hashing sequentially");
        }

        Box::new(SequentialStrategy)
    }

    fn prefers_parallel(&self, algorithms: usize, file_size: u64, cores: usize) -> bool {
        match self.hint {
            StrategyHint::Sequential => false,
            StrategyHint::Parallel => true,
            StrategyHint::Automatic => {
                algorithms > 1
                    && cores > 1
                    && file_size >= self.parallel_threshold
                    && self.memory_limit >= self.chunk_size.saturating_mul(BUFFERS_IN_FLIGHT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RunBudget;

    fn selector(hint: StrategyHint) -> StrategySelector {
        StrategySelector::from_config(&HashConfig {
            strategy: hint,
            parallel_threshold: 1000,
            chunk_size: 100,
            memory_limit: 10_000,
        })
    }

    #[test]
    fn test_automatic_selection() {
        let selector = selector(StrategyHint::Automatic);

        assert!(selector.prefers_parallel(2, 1000, 4));
        // Single algorithm gains nothing from workers
        assert!(!selector.prefers_parallel(1, 1_000_000, 4));
        // Small file
        assert!(!selector.prefers_parallel(3, 999, 4));
        // Single core host
        assert!(!selector.prefers_parallel(3, 1_000_000, 1));
    }

    #[test]
    fn test_automatic_respects_memory_limit() {
        let selector = StrategySelector::from_config(&HashConfig {
            strategy: StrategyHint::Automatic,
            parallel_threshold: 0,
            chunk_size: 100,
            memory_limit: 250,
        });
        assert!(!selector.prefers_parallel(4, 1_000_000, 8));
    }

    #[test]
    fn test_hints_force_strategy() {
        assert!(selector(StrategyHint::Parallel).prefers_parallel(1, 0, 1));
        assert!(!selector(StrategyHint::Sequential).prefers_parallel(8, u64::MAX, 64));
    }

    #[test]
    fn test_select_names() {
        let tracker = MemoryTracker::default();
        let budget = RunBudget::new(10_000);

        let mut admission = budget.admit(100).unwrap();
        assert_eq!(
            selector(StrategyHint::Sequential)
                .select(3, 1 << 30, &tracker, &mut admission)
                .name(),
            "sequential"
        );
        assert_eq!(budget.reserved(), 100);

        assert_eq!(
            selector(StrategyHint::Parallel)
                .select(1, 0, &tracker, &mut admission)
                .name(),
            "parallel"
        );
        assert_eq!(budget.reserved(), 300);
    }

    #[test]
    fn test_parallel_falls_back_when_budget_is_taken() {
        let tracker = MemoryTracker::default();
        let budget = RunBudget::new(300);
        let _other_run = budget.admit(100).unwrap();
        let mut admission = budget.admit(100).unwrap();

        let strategy = selector(StrategyHint::Parallel).select(2, 0, &tracker, &mut admission);

        assert_eq!(strategy.name(), "sequential");
        assert_eq!(budget.reserved(), 200);
    }

    #[test]
    fn test_hint_parsing() {
        assert_eq!("auto".parse::<StrategyHint>().unwrap(), StrategyHint::Automatic);
        assert_eq!(
            "Parallel".parse::<StrategyHint>().unwrap(),
            StrategyHint::Parallel
        );
        assert!("fastest".parse::<StrategyHint>().is_err());
        assert_eq!(StrategyHint::Sequential.to_string(), "sequential");
    }
}
