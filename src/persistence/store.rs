use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{FinanceError, FinanceResult};

/// String key-value persistence in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> FinanceResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> FinanceResult<()>;

    /// Writes several entries as one unit. Backends that can stage writes
    /// should override this so a failure leaves every key untouched.
    fn set_items(&self, items: &[(&str, String)]) -> FinanceResult<()> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

/// In-process store. Clones share the same entries, which lets tests keep a
/// handle after giving one to a repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_items`/`set_item` batches.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following write fail, as a full quota would.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> FinanceResult<Option<String>> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> FinanceResult<()> {
        self.set_items(&[(key, value.to_string())])
    }

    fn set_items(&self, items: &[(&str, String)]) -> FinanceResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(FinanceError::Persistence("storage quota exceeded".into()));
        }
        for (key, value) in items {
            state.entries.insert((*key).to_string(), value.clone());
        }
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.set_item("debts", "[]").unwrap();
        assert_eq!(handle.get_item("debts").unwrap().as_deref(), Some("[]"));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn failing_batch_writes_nothing() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let err = store
            .set_items(&[("a", "1".into()), ("b", "2".into())])
            .unwrap_err();
        assert!(matches!(err, FinanceError::Persistence(_)));
        assert!(store.keys().is_empty());
        assert_eq!(store.write_count(), 0);
    }
}
