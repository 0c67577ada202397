use super::KvStore;
use crate::error::{Result, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory key-value store for testing.
///
/// Uses `RefCell` for interior mutability since staykeep is single-threaded.
/// Can simulate a storage quota and failing writes, the two ways a browser's
/// local storage rejects a `setItem`.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    simulate_write_error: RefCell<bool>,
    failing_prefixes: RefCell<Vec<String>>,
    unreadable_keys: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size (keys plus values, in bytes) the store accepts.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Enable write error simulation for every key.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make writes to keys starting with `prefix` fail.
    pub fn fail_writes_with_prefix(&self, prefix: &str) {
        self.failing_prefixes.borrow_mut().push(prefix.to_string());
    }

    /// Make reads of `key` fail, as a corrupt file would.
    pub fn fail_reads_of(&self, key: &str) {
        self.unreadable_keys.borrow_mut().push(key.to_string());
    }

    /// The stored value, ignoring simulated read failures.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unreadable_keys.borrow().iter().any(|k| k == key) {
            return Err(StoreError::Store(format!("Simulated read error for {}", key)));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StoreError::Store("Simulated write error".to_string()));
        }
        if self
            .failing_prefixes
            .borrow()
            .iter()
            .any(|p| key.starts_with(p.as_str()))
        {
            return Err(StoreError::Store(format!("Simulated write error for {}", key)));
        }
        if let Some(quota) = self.quota {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}
