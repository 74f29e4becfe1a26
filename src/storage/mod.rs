mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// Synchronous string key-value medium.
///
/// Each `set` is a single overwrite of one slot: it either replaces the whole
/// value or fails and leaves the previous value in place.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, `Ok(None)` if the slot is empty
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
