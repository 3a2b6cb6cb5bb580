use crate::error::StoreError;
use std::cell::RefCell;
use std::collections::HashMap;

pub mod file_store;

pub use file_store::FileKvStore;

/// Snapshot key for the serialized task list.
pub const TASKS_KEY: &str = "tasks";
/// Snapshot key for the serialized profile record.
pub const PROFILE_KEY: &str = "profile";

/// Opaque synchronous key-value persistence. Last-write-wins, no
/// transactional guarantees. `get` of an absent key is `Ok(None)`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory backend. Interior mutability keeps the trait `&self` based,
/// matching the single-threaded execution model.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
