//! Consultation history entries.

use super::message::{Message, message_timestamp};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Maximum characters of the first message kept in `summary`.
pub const SUMMARY_CHARS: usize = 60;
/// Maximum characters of the latest message kept in `preview`.
pub const PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// One row of the persisted consultation history.
///
/// Field names are camelCase on disk to match the stored `mediflow_history` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in Unix milliseconds; strictly increasing per store.
    pub id: i64,
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local time of day, `HH:MM`.
    pub time: String,
    pub summary: String,
    pub preview: String,
    pub message_count: usize,
}

impl HistoryEntry {
    /// Summarizes a conversation at the moment an exchange completed.
    ///
    /// `summary` comes from the first message of the session and `preview`
    /// from the latest one. Returns `None` for an empty conversation.
    pub fn from_messages(messages: &[Message], at: &DateTime<Local>) -> Option<Self> {
        let first = messages.first()?;
        let latest = messages.last()?;

        Some(Self {
            id: at.timestamp_millis(),
            date: at.format("%Y-%m-%d").to_string(),
            time: message_timestamp(at),
            summary: truncate_with_ellipsis(&first.content, SUMMARY_CHARS),
            preview: truncate_with_ellipsis(&latest.content, PREVIEW_CHARS),
            message_count: messages.len(),
        })
    }

    /// Case-insensitive match on `summary`, plain substring match on `date`.
    pub fn matches(&self, filter: &str) -> bool {
        self.summary.to_lowercase().contains(&filter.to_lowercase()) || self.date.contains(filter)
    }
}

/// Keeps at most `max_chars` characters and always appends `...`.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
