//! Per-run incremental hash state

use super::traits::{HashAlgorithmImpl, StreamingHasher};
use super::{HashAlgorithm, HashDigest};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Incremental state for one algorithm, owned by exactly one run
pub(crate) struct Accumulator {
    algorithm: HashAlgorithm,
    hasher: Box<dyn StreamingHasher>,
    bytes_fed: u64,
}

impl Accumulator {
    pub(crate) fn new(implementation: &dyn HashAlgorithmImpl) -> Self {
        Self {
            algorithm: implementation.algorithm(),
            hasher: implementation.create_hasher(),
            bytes_fed: 0,
        }
    }

    pub(crate) fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub(crate) fn bytes_fed(&self) -> u64 {
        self.bytes_fed
    }

    pub(crate) fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes_fed += chunk.len() as u64;
    }

    fn finalize(self) -> (HashAlgorithm, HashDigest) {
        (self.algorithm, HashDigest::new(self.hasher.finalize()))
    }
}

/// One accumulator per requested algorithm, in canonical order
pub(crate) struct AccumulatorSet {
    accumulators: Vec<Accumulator>,
}

impl AccumulatorSet {
    pub(crate) fn new(implementations: &[Arc<dyn HashAlgorithmImpl>]) -> Self {
        implementations
            .iter()
            .map(|implementation| Accumulator::new(implementation.as_ref()))
            .collect::<Vec<_>>()
            .into()
    }

    pub(crate) fn len(&self) -> usize {
        self.accumulators.len()
    }

    /// Feed one chunk to every accumulator
    pub(crate) fn update(&mut self, chunk: &[u8]) {
        for accumulator in &mut self.accumulators {
            accumulator.update(chunk);
        }
    }

    pub(crate) fn into_inner(self) -> Vec<Accumulator> {
        self.accumulators
    }

    /// Bytes fed so far; identical for every accumulator
    pub(crate) fn bytes_fed(&self) -> u64 {
        let fed = self.accumulators.first().map_or(0, Accumulator::bytes_fed);
        debug_assert!(self.accumulators.iter().all(|a| a.bytes_fed() == fed));
        fed
    }

    /// Consume the set and produce one digest per algorithm
    pub(crate) fn finalize(self) -> BTreeMap<HashAlgorithm, HashDigest> {
        self.accumulators
            .into_iter()
            .map(Accumulator::finalize)
            .collect()
    }
}

impl From<Vec<Accumulator>> for AccumulatorSet {
    fn from(mut accumulators: Vec<Accumulator>) -> Self {
        accumulators.sort_by_key(Accumulator::algorithm);
        Self { accumulators }
    }
}
