use std::collections::HashMap;

use super::KeyValueStorage;
use crate::error::StorageError;

/// In-process storage with an optional byte quota, mirroring browser `localStorage`.
///
/// The quota covers the summed length of every key and value. A write that
/// would exceed it is refused and the slot keeps its previous value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that refuses writes past `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Raw value of a slot, bypassing the `Result` of the trait
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let current = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let needed = self.used_bytes() - current + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
