use mediflow_core::error::{MediflowError, Result};
use mediflow_core::storage::PersistenceStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local [`PersistenceStore`] for previews, demos and tests.
///
/// Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryPersistenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryPersistenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> MediflowError {
    MediflowError::internal("in-memory store lock poisoned")
}

impl PersistenceStore for InMemoryPersistenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.remove(key);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        let next = apply(values.get(key).cloned())?;
        values.insert(key.to_string(), next);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryPersistenceStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let store = InMemoryPersistenceStore::new();
        store.set("k", "old").unwrap();

        let result = store.update("k", &mut |_| Err(MediflowError::internal("nope")));

        assert!(result.is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
    }
}
