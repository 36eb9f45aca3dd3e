//! Central registry for hash algorithm implementations

use super::HashAlgorithm;
use super::traits::HashAlgorithmImpl;
use crate::{Result, error::ValidationError};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability table mapping algorithm ids to implementations
///
/// Registries are built up front and then shared read-only, so lookups
/// need no locking.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<HashAlgorithm, Arc<dyn HashAlgorithmImpl>>,
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.list())
            .finish()
    }
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every bundled algorithm
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::algorithms::register_all(&mut registry);
        registry
    }

    /// Get the global registry instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceCell<AlgorithmRegistry> = OnceCell::new();
        INSTANCE.get_or_init(Self::with_builtins)
    }

    /// Register an algorithm, replacing any previous entry for its id
    pub fn register(&mut self, algorithm: impl HashAlgorithmImpl + 'static) {
        let id = algorithm.algorithm();
        if self.algorithms.insert(id, Arc::new(algorithm)).is_some() {
            log::debug!("Replaced registry entry for {id}");
        }
    }

    /// Get algorithm by id
    pub fn get(&self, algorithm: HashAlgorithm) -> Option<Arc<dyn HashAlgorithmImpl>> {
        self.algorithms.get(&algorithm).cloned()
    }

    /// Get algorithm by id, failing when it is not registered
    pub fn resolve(&self, algorithm: HashAlgorithm) -> Result<Arc<dyn HashAlgorithmImpl>> {
        self.get(algorithm)
            .ok_or_else(|| ValidationError::unsupported_algorithm(algorithm.id()).into())
    }

    /// Whether an implementation is registered for `algorithm`
    pub fn contains(&self, algorithm: HashAlgorithm) -> bool {
        self.algorithms.contains_key(&algorithm)
    }

    /// List all registered algorithms in canonical order
    pub fn list(&self) -> Vec<HashAlgorithm> {
        let mut ids: Vec<_> = self.algorithms.keys().copied().collect();
        ids.sort();
        ids
    }
}
