use super::{KeyValueStore, StoreKey};
use crate::error::{Result, VitrineError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory key-value store.
///
/// Uses `RefCell` for interior mutability since vitrine is single-threaded.
/// This keeps the `KeyValueStore` trait on `&self` without paying for a lock.
#[derive(Default)]
pub struct MemStore {
    entries: RefCell<HashMap<StoreKey, Vec<u8>>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw bytes under `key`, for assertions.
    pub fn raw(&self, key: StoreKey) -> Option<Vec<u8>> {
        self.entries.borrow().get(&key).cloned()
    }
}

impl KeyValueStore for MemStore {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &[u8]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(VitrineError::Store("Simulated write error".to_string()));
        }
        self.entries.borrow_mut().insert(key, value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
