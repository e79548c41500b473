//! Disk-backed key-value store.
//!
//! Each key is one JSON file in a single directory:
//!
//! ```text
//! storage/
//! ├── mediflow_history.json
//! └── mediflow_settings.json
//! ```

use crate::storage::AtomicFile;
use mediflow_core::error::{MediflowError, Result};
use mediflow_core::storage::PersistenceStore;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";

/// [`PersistenceStore`] backed by one atomically replaced file per key.
#[derive(Debug, Clone)]
pub struct FilePersistenceStore {
    dir: PathBuf,
}

impl FilePersistenceStore {
    /// Creates the store, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!("[FilePersistenceStore] Using storage directory {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(MediflowError::config(format!(
                "Invalid storage key '{}': only ASCII letters, digits, '_' and '-' are allowed",
                key
            )));
        }
        Ok(AtomicFile::new(
            self.dir.join(format!("{key}.{FILE_EXTENSION}")),
        ))
    }
}

impl PersistenceStore for FilePersistenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.file_for(key)?.load()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file_for(key)?.save(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file_for(key)?.remove()?;
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        self.file_for(key)?.update(|current| apply(current))
    }

    fn clear(&self) -> Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_value_file = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION);
            if is_value_file {
                AtomicFile::new(path).remove()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistenceStore::new(temp_dir.path()).unwrap();

        assert!(store.get("mediflow_history").unwrap().is_none());
    }

    #[test]
    fn test_set_is_visible_to_a_fresh_instance() {
        let temp_dir = TempDir::new().unwrap();
        FilePersistenceStore::new(temp_dir.path())
            .unwrap()
            .set("mediflow_settings", r#"{"theme":"dark"}"#)
            .unwrap();

        let reopened = FilePersistenceStore::new(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("mediflow_settings").unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistenceStore::new(temp_dir.path()).unwrap();

        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_update_sees_previous_value_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistenceStore::new(temp_dir.path()).unwrap();
        store.set("mediflow_history", "[1]").unwrap();

        store
            .update("mediflow_history", &mut |current| {
                assert_eq!(current.as_deref(), Some("[1]"));
                Ok("[2,1]".to_string())
            })
            .unwrap();

        let reopened = FilePersistenceStore::new(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("mediflow_history").unwrap().as_deref(),
            Some("[2,1]")
        );
    }

    #[test]
    fn test_clear_removes_only_value_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePersistenceStore::new(temp_dir.path()).unwrap();
        store.set("mediflow_history", "[]").unwrap();
        store.set("mediflow_settings", "{}").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep").unwrap();

        store.clear().unwrap();

        assert!(store.get("mediflow_history").unwrap().is_none());
        assert!(store.get("mediflow_settings").unwrap().is_none());
        assert!(temp_dir.path().join("notes.txt").exists());
    }
}
