//! Write-once result collection

use crate::proxy::models::{Candidate, ValidationResult};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Concurrent map from candidate to its single validation result
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Mutex<HashMap<Candidate, ValidationResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for its candidate.
    ///
    /// # Panics
    ///
    /// If a result for the same candidate was already stored. Workers only
    /// write results for candidates they claimed from the work queue, so this
    /// means the queue handed out a candidate twice.
    pub fn put(&self, result: ValidationResult) {
        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        let key = result.candidate.clone();
        let previous = results.insert(key, result);
        assert!(
            previous.is_none(),
            "validation result for {} written twice",
            previous.map(|p| p.candidate.url()).unwrap_or_default()
        );
    }

    /// Number of results stored so far
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored result. Meant to be read once all workers joined.
    pub fn snapshot(&self) -> HashMap<Candidate, ValidationResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::models::{ProxyType, Reachability};

    fn result(port: u16, reachable: bool) -> ValidationResult {
        ValidationResult::new(
            Candidate::new("10.0.0.1", port, ProxyType::Http),
            Reachability {
                reachable,
                latency_ms: 5,
            },
        )
    }

    #[test]
    fn test_put_and_snapshot() {
        let store = ResultStore::new();
        assert!(store.is_empty());

        store.put(result(80, true));
        store.put(result(81, false));
        assert_eq!(store.len(), 2);

        let snapshot = store.snapshot();
        let key = Candidate::new("10.0.0.1", 80, ProxyType::Http);
        assert!(snapshot[&key].reachable);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn test_double_put_panics() {
        let store = ResultStore::new();
        store.put(result(80, true));
        store.put(result(80, false));
    }
}
