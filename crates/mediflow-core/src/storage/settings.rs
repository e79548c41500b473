//! User settings persisted alongside the history.

use super::persistence::{PersistenceStore, SETTINGS_KEY, read_json, write_json};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Stored under `mediflow_settings` as `{ doctorName, theme, notifications }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Display name of the assistant persona.
    #[serde(default = "default_doctor_name")]
    pub doctor_name: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_doctor_name() -> String {
    "Dr. Emily Hartman".to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            doctor_name: default_doctor_name(),
            theme: Theme::default(),
            notifications: default_notifications(),
        }
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn PersistenceStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Returns the stored settings, or defaults if none were saved.
    pub fn load(&self) -> Result<Settings> {
        Ok(read_json(self.store.as_ref(), SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        write_json(self.store.as_ref(), SETTINGS_KEY, settings)?;
        tracing::info!("[SettingsStore] Settings saved");
        Ok(())
    }

    /// Wipes all local data, history included.
    pub fn clear_all_data(&self) -> Result<()> {
        tracing::warn!("[SettingsStore] Clearing all local data");
        self.store.clear()
    }
}
