//! In-memory key-value store

use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::StorageError;

/// `HashMap`-backed store; can be told to fail writes
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
    fail_removes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (storage unavailable)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make only `remove` fail, leaving `set` working
    pub fn set_fail_removes(&mut self, fail: bool) {
        self.fail_removes = fail;
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        if self.fail_removes {
            return Err(StorageError::Unavailable(format!("cannot remove `{}`", key)));
        }
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_writes_keep_old_value() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.set_fail_writes(true);
        assert!(store.set("k", "w").is_err());
        assert!(store.remove("k").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
