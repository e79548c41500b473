//! Local persistence of history and settings.
//!
//! Stores here are written against the [`PersistenceStore`] capability; the
//! disk-backed implementation lives in `mediflow-infrastructure`.

mod history_store;
mod persistence;
mod settings;

pub use history_store::{HISTORY_CAPACITY, SessionHistoryStore};
pub use persistence::{
    HISTORY_KEY, PersistenceStore, SETTINGS_KEY, parse_json, read_json, write_json,
};
pub use settings::{Settings, SettingsStore, Theme};
