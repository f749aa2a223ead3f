//! In-memory store of learned patterns, keyed by address.
//!
//! Each `put` swaps the whole pattern set for an address under one write
//! lock, so a reader sees either the previous set or the new one. Keys are
//! lowercased on the way in and on lookup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

use crate::types::Pattern;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("pattern store lock poisoned")]
    LockPoisoned,
}

/// Shared, process-lifetime pattern cache.
#[derive(Debug, Default)]
pub struct PatternStore {
    entries: RwLock<HashMap<String, Arc<[Pattern]>>>,
}

impl PatternStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pattern set for `address`.
    pub fn put(&self, address: &str, patterns: Vec<Pattern>) -> Result<(), StoreError> {
        let key = normalize(address);
        let patterns: Arc<[Pattern]> = patterns.into();
        debug!("Storing {} patterns for {key}", patterns.len());

        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key, patterns);
        Ok(())
    }

    /// Current pattern set for `address`, if one was learned.
    pub fn get(&self, address: &str) -> Result<Option<Arc<[Pattern]>>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(&normalize(address)).cloned())
    }

    pub fn remove(&self, address: &str) -> Result<Option<Arc<[Pattern]>>, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.remove(&normalize(address)))
    }

    /// Addresses with a learned pattern set, sorted.
    pub fn addresses(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Number of addresses stored. A poisoned lock reads as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternType;
    use std::thread;

    const ADDR: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn patterns(tag: &str, n: u32) -> Vec<Pattern> {
        (0..n)
            .map(|i| {
                Pattern::new(PatternType::Timing, format!("{tag}-{i}"))
                    .with_confidence(0.5)
                    .with_occurrences(i)
            })
            .collect()
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_put_then_get_round_trips() {
        let store = PatternStore::new();
        let set = patterns("a", 3);
        assert_eq!(store.put(ADDR, set.clone()), Ok(()));

        let stored = store.get(ADDR).expect("lock is healthy").expect("set was stored");
        assert_eq!(&stored[..], &set[..]);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_lookup_ignores_case() {
        let store = PatternStore::new();
        store.put(ADDR, patterns("a", 1)).expect("lock is healthy");

        assert!(store.get(&ADDR.to_lowercase()).expect("lock is healthy").is_some());
        assert!(store.get(&ADDR.to_uppercase().replace("0X", "0x")).expect("lock is healthy").is_some());
        assert_eq!(store.addresses().expect("lock is healthy"), vec![ADDR.to_lowercase()]);
    }

    #[test]
    fn test_unknown_address_is_absent() {
        let store = PatternStore::new();
        assert_eq!(store.get(ADDR), Ok(None));
        assert!(store.is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_put_overwrites_without_merging() {
        let store = PatternStore::new();
        store.put(ADDR, patterns("old", 4)).expect("lock is healthy");
        store.put(&ADDR.to_lowercase(), patterns("new", 1)).expect("lock is healthy");

        let stored = store.get(ADDR).expect("lock is healthy").expect("set was stored");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "new-0");
        assert_eq!(store.len(), 1);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_remove_drops_entry() {
        let store = PatternStore::new();
        store.put(ADDR, patterns("a", 2)).expect("lock is healthy");
        assert_eq!(store.remove(ADDR).expect("lock is healthy").map(|p| p.len()), Some(2));
        assert_eq!(store.get(ADDR), Ok(None));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_concurrent_writers_never_mix_sets() {
        let store = Arc::new(PatternStore::new());
        let handles: Vec<_> = (0..8u32)
            .map(|w| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store
                            .put(ADDR, patterns(&format!("w{w}"), w + 1))
                            .expect("lock is healthy");
                        if let Some(seen) = store.get(ADDR).expect("lock is healthy") {
                            let tag = seen[0].description.split('-').next().unwrap_or("");
                            assert!(seen.iter().all(|p| p.description.starts_with(tag)));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread panicked");
        }
        assert_eq!(store.len(), 1);
    }
}
