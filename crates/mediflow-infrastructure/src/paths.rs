//! Unified path management for MediFlow files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mediflow/          # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/mediflow/     # Data directory
//! └── storage/                 # PersistenceStore files
//!     ├── mediflow_history.json
//!     └── mediflow_settings.json
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "mediflow";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for mediflow_core::MediflowError {
    fn from(err: PathError) -> Self {
        Self::config(err.to_string())
    }
}

/// Resolves MediFlow's directories.
///
/// With a base override every directory lives under that base, which keeps
/// tests away from the real home directory.
#[derive(Debug, Clone, Default)]
pub struct MediflowPaths {
    base_override: Option<PathBuf>,
}

impl MediflowPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the configuration directory (e.g. `~/.config/mediflow/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/mediflow/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory handed to `FilePersistenceStore`.
    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("storage"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override_scopes_all_paths() {
        let paths = MediflowPaths::new(Some(PathBuf::from("/tmp/mf")));

        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/mf/config/config.toml")
        );
        assert_eq!(
            paths.storage_dir().unwrap(),
            PathBuf::from("/tmp/mf/data/storage")
        );
    }
}
