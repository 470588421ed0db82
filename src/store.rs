//! Key-value store collaborator: JSON values by string key.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Persistence boundary for preferences and aliases. Implementations are shared
/// between the UI thread and background loads, so they take `&self`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Read `key` and deserialize it, falling back to `T::default()` when unset.
pub fn load_or_default<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    store.set(key, serde_json::to_value(value)?)
}

/// Process-local store, used by the terminal host and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip_and_default() {
        let store = MemoryStore::new();
        let empty: Vec<String> = load_or_default(&store, "ids").unwrap();
        assert!(empty.is_empty());

        save(&store, "ids", &vec!["a".to_string()]).unwrap();
        let ids: Vec<String> = load_or_default(&store, "ids").unwrap();
        assert_eq!(ids, vec!["a"]);

        store.delete("ids").unwrap();
        assert!(store.get("ids").unwrap().is_none());
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let store = MemoryStore::new();
        store.set("ids", Value::from(3)).unwrap();
        assert!(load_or_default::<Vec<String>, _>(&store, "ids").is_err());
    }
}
